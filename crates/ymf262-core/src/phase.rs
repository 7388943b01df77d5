//! Phase generator and noise source.

use crate::tables::MULTIPLIER_TABLE;

/// Per-operator phase accumulator.
///
/// The accumulator is 19 bits of fraction over a 10-bit waveform index;
/// [`output`](Self::output) is the index sampled before the latest advance.
#[derive(Clone, Debug, Default)]
pub struct PhaseGenerator {
    counter: u32,
    output: u16,
}

impl PhaseGenerator {
    /// Create a generator at phase zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Waveform index for the current sample.
    #[inline]
    pub fn output(&self) -> u16 {
        self.output
    }

    /// Replace the waveform index (rhythm-mode substitution).
    #[inline]
    pub fn override_output(&mut self, phase: u16) {
        self.output = phase;
    }

    /// Advance one native sample and return the pre-advance waveform index.
    ///
    /// `restart` zeroes the accumulator before the increment is applied.
    pub fn clock(&mut self, f_num: u16, block: u8, multiple: u8, restart: bool) -> u16 {
        let base = ((f_num as u32) << block) >> 1;
        let phase = (self.counter >> 9) as u16;
        if restart {
            self.counter = 0;
        }
        self.counter = self
            .counter
            .wrapping_add((base * MULTIPLIER_TABLE[(multiple & 0x0f) as usize]) >> 1);
        self.output = phase;
        phase
    }

    /// Zero the accumulator and output.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.output = 0;
    }
}

/// Vibrato LFO state shared by all operators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vibrato {
    /// Position on the 8-step triangle.
    pub position: u8,
    /// Depth shift: 0 for 14 cents, 1 for 7 cents.
    pub shift: u8,
}

impl Vibrato {
    /// Frequency number with the current vibrato offset applied.
    ///
    /// The offset scales with the top three bits of `f_num`.
    pub fn apply(self, f_num: u16) -> u16 {
        let mut range = ((f_num >> 7) & 0x07) as i16;
        if self.position & 0x03 == 0 {
            range = 0;
        } else if self.position & 0x01 != 0 {
            range >>= 1;
        }
        range >>= self.shift;
        if self.position & 0x04 != 0 {
            range = -range;
        }
        f_num.wrapping_add(range as u16)
    }
}

/// 23-bit noise LFSR (taps at bits 0 and 14).
///
/// Clocked once per operator phase step, so it advances 36 times per native
/// sample.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    state: u32,
}

impl NoiseGenerator {
    /// Seeded LFSR.
    pub fn new() -> Self {
        Self { state: 1 }
    }

    /// Current output bit.
    #[inline]
    pub fn bit(&self) -> u8 {
        (self.state & 0x01) as u8
    }

    /// Raw register contents.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Shift one step.
    #[inline]
    pub fn clock(&mut self) {
        let feedback = ((self.state >> 14) ^ self.state) & 0x01;
        self.state = (self.state >> 1) | (feedback << 22);
    }

    /// Restore the power-on seed.
    pub fn reset(&mut self) {
        self.state = 1;
    }
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}
