//! Channel mixer.
//!
//! Sums channel outputs into the four DAC outputs (A/B front, C/D rear).
//! Outputs B and D are latched one sample after A and C, matching the
//! chip's serial DAC interface.

use crate::channel::Channel;
use crate::tables::NUM_CHANNELS;

/// Saturate a mix accumulator to the 16-bit output range.
#[inline]
pub fn clip_sample(sample: i32) -> i16 {
    sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Mix accumulators carried across native samples.
#[derive(Clone, Debug, Default)]
pub struct Mixer {
    buffer: [i32; 4],
}

impl Mixer {
    /// Create a mixer with cleared accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unclipped accumulators for A, B, C, D.
    #[inline]
    pub fn accumulators(&self) -> [i32; 4] {
        self.buffer
    }

    /// Mix one native sample.
    ///
    /// `sums` holds each channel's summed output taps. Returns A, B, C, D
    /// where B and D come from the previous call.
    pub fn mix(
        &mut self,
        sums: &[i32; NUM_CHANNELS],
        channels: &[Channel; NUM_CHANNELS],
        stereo_ext: bool,
    ) -> [i16; 4] {
        let delayed_b = clip_sample(self.buffer[1]);
        let delayed_d = clip_sample(self.buffer[3]);

        let mut front = 0i32;
        let mut rear = 0i32;
        for (&accm, channel) in sums.iter().zip(channels) {
            let weighted = if stereo_ext {
                (accm.wrapping_mul(channel.left_pan) >> 16) as i16
            } else {
                (accm & channel.output_mask[0] as i32) as i16
            };
            front += weighted as i32;
            rear += (accm & channel.output_mask[2] as i32) as i16 as i32;
        }
        self.buffer[0] = front;
        self.buffer[2] = rear;

        let mut front = 0i32;
        let mut rear = 0i32;
        for (&accm, channel) in sums.iter().zip(channels) {
            let weighted = if stereo_ext {
                (accm.wrapping_mul(channel.right_pan) >> 16) as i16
            } else {
                (accm & channel.output_mask[1] as i32) as i16
            };
            front += weighted as i32;
            rear += (accm & channel.output_mask[3] as i32) as i16 as i32;
        }
        self.buffer[1] = front;
        self.buffer[3] = rear;

        [
            clip_sample(self.buffer[0]),
            delayed_b,
            clip_sample(self.buffer[2]),
            delayed_d,
        ]
    }

    /// Clear the accumulators.
    pub fn reset(&mut self) {
        self.buffer = [0; 4];
    }
}
