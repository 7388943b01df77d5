//! OPL3 Backend Trait
//!
//! Defines a common interface for OPL3 chip implementations, allowing music
//! players (IMF, DRO, VGM, ...) to drive any backend through the same
//! register/sample calls.

use crate::Result;

/// Full-scale value used to normalize 16-bit samples.
const SAMPLE_SCALE: f32 = 32_768.0;

/// Common interface for OPL3 chip backends
///
/// Output is always interleaved stereo at the backend's configured sample
/// rate.
pub trait Opl3Backend: Send {
    /// Reinitialize all state and set the output sample rate
    fn reset(&mut self, sample_rate: u32) -> Result<()>;

    /// Apply a register write immediately
    ///
    /// # Arguments
    ///
    /// * `address` - Register address (0x000-0x1FF, bit 8 selects bank 1)
    /// * `value` - Value to write
    fn write_register(&mut self, address: u16, value: u8);

    /// Schedule a register write with emulated hardware latency
    fn write_register_buffered(&mut self, address: u16, value: u8);

    /// Advance by one output frame
    fn clock(&mut self);

    /// Most recent output frame, normalized to -1.0..1.0
    fn frame(&self) -> [f32; 2];

    /// Output sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// Generate interleaved stereo samples
    ///
    /// # Arguments
    ///
    /// * `frames` - Number of stereo frames to generate
    ///
    /// # Returns
    ///
    /// Vector of `2 * frames` samples (L, R, L, R, ...)
    fn generate_samples(&mut self, frames: usize) -> Vec<f32> {
        let mut samples = vec![0.0; frames * 2];
        self.generate_samples_into(&mut samples);
        samples
    }

    /// Generate interleaved stereo samples into a buffer
    ///
    /// Fills complete frames; a trailing odd sample is left untouched.
    fn generate_samples_into(&mut self, buffer: &mut [f32]) {
        for frame in buffer.chunks_exact_mut(2) {
            self.clock();
            frame.copy_from_slice(&self.frame());
        }
    }
}

/// Normalize a 16-bit sample to -1.0..1.0.
#[inline]
pub fn normalize_sample(sample: i16) -> f32 {
    sample as f32 / SAMPLE_SCALE
}
