//! Rhythm (percussion) mode.
//!
//! Register 0xBD reassigns channels 6-8 to five drum voices. The hi-hat,
//! snare and top cymbal do not use their own phase directly: their waveform
//! index is a combinational function of phase bits latched from the hi-hat
//! and top-cymbal operators, mixed with the noise generator.

use bitflags::bitflags;

/// Operator index of the hi-hat.
pub const HIGH_HAT_SLOT: usize = 13;
/// Operator index of the snare drum.
pub const SNARE_DRUM_SLOT: usize = 16;
/// Operator index of the top cymbal.
pub const TOP_CYMBAL_SLOT: usize = 17;

bitflags! {
    /// Register 0xBD.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RhythmFlags: u8 {
        /// Hi-hat key-on.
        const HIGH_HAT = 0x01;
        /// Top cymbal key-on.
        const TOP_CYMBAL = 0x02;
        /// Tom-tom key-on.
        const TOM_TOM = 0x04;
        /// Snare drum key-on.
        const SNARE_DRUM = 0x08;
        /// Bass drum key-on.
        const BASS_DRUM = 0x10;
        /// Rhythm mode enable.
        const RHYTHM = 0x20;
        /// Vibrato depth 14 cents (7 cents when clear).
        const VIBRATO_DEPTH = 0x40;
        /// Tremolo depth 4.8 dB (1 dB when clear).
        const TREMOLO_DEPTH = 0x80;
    }
}

impl RhythmFlags {
    /// Decode a register value.
    pub fn from_register(value: u8) -> Self {
        Self::from_bits_truncate(value)
    }

    /// Whether channels 6-8 are in percussion mode.
    #[inline]
    pub fn is_rhythm_enabled(&self) -> bool {
        self.contains(Self::RHYTHM)
    }
}

/// Drum key bit and the operators it keys, as (channel, operator within channel).
pub const DRUM_KEYS: [(RhythmFlags, usize, &[usize]); 5] = [
    (RhythmFlags::HIGH_HAT, 7, &[0]),
    (RhythmFlags::TOP_CYMBAL, 8, &[1]),
    (RhythmFlags::TOM_TOM, 8, &[0]),
    (RhythmFlags::SNARE_DRUM, 7, &[1]),
    (RhythmFlags::BASS_DRUM, 6, &[0, 1]),
];

/// Phase bits latched for the percussion phase function.
#[derive(Clone, Debug, Default)]
pub struct RhythmLatch {
    hh_bit2: bool,
    hh_bit3: bool,
    hh_bit7: bool,
    hh_bit8: bool,
    tc_bit3: bool,
    tc_bit5: bool,
}

impl RhythmLatch {
    /// Create an empty latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture phase bits from `slot` after its phase step.
    ///
    /// The hi-hat bits are captured whether or not rhythm mode is on; the
    /// top-cymbal bits only while it is.
    pub fn capture(&mut self, slot: usize, phase: u16, rhythm: bool) {
        let bit = |n: u16| (phase >> n) & 0x01 != 0;
        match slot {
            HIGH_HAT_SLOT => {
                self.hh_bit2 = bit(2);
                self.hh_bit3 = bit(3);
                self.hh_bit7 = bit(7);
                self.hh_bit8 = bit(8);
            }
            TOP_CYMBAL_SLOT if rhythm => {
                self.tc_bit3 = bit(3);
                self.tc_bit5 = bit(5);
            }
            _ => {}
        }
    }

    /// Substituted waveform index for a percussion operator, if `slot` is one.
    pub fn phase_for(&self, slot: usize, noise: bool) -> Option<u16> {
        let rm_xor = (self.hh_bit2 ^ self.hh_bit7)
            | (self.hh_bit3 ^ self.tc_bit5)
            | (self.tc_bit3 ^ self.tc_bit5);
        match slot {
            HIGH_HAT_SLOT => {
                let low = if rm_xor ^ noise { 0xd0 } else { 0x34 };
                Some(((rm_xor as u16) << 9) | low)
            }
            SNARE_DRUM_SLOT => {
                Some(((self.hh_bit8 as u16) << 9) | (((self.hh_bit8 ^ noise) as u16) << 8))
            }
            TOP_CYMBAL_SLOT => Some(((rm_xor as u16) << 9) | 0x80),
            _ => None,
        }
    }
}
