//! Operator waveforms.
//!
//! All eight shapes are built from the quarter-wave log-sine ROM and converted
//! to linear amplitude through the exponent ROM. Negative half-waves are the
//! one's complement of the positive amplitude, as on the chip.

use crate::tables::{attenuation_to_amplitude, LOG_SIN_ROM};

/// Attenuation value that yields silence through the exponent ROM.
const SILENT: u16 = 0x1000;

/// Waveform select (register 0xE0, bits 0-2).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Full sine.
    #[default]
    Sine,
    /// Positive half of the sine, silent second half.
    HalfSine,
    /// Rectified sine.
    AbsSine,
    /// First and third quarter of the rectified sine.
    PulseSine,
    /// Double-speed sine on the first half period (OPL3 only).
    AlternatingSine,
    /// Double-speed rectified sine on the first half period (OPL3 only).
    CamelSine,
    /// Square (OPL3 only).
    Square,
    /// Logarithmic sawtooth (OPL3 only).
    LogSaw,
}

impl Waveform {
    /// Decode the three waveform bits.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => Self::Sine,
            1 => Self::HalfSine,
            2 => Self::AbsSine,
            3 => Self::PulseSine,
            4 => Self::AlternatingSine,
            5 => Self::CamelSine,
            6 => Self::Square,
            _ => Self::LogSaw,
        }
    }

    /// Register encoding of this waveform.
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Amplitude of the waveform at `phase` (10 bits used) with the
    /// operator's envelope attenuation applied.
    pub fn output(self, phase: u16, envelope: u16) -> i16 {
        let phase = phase & 0x3ff;
        let envelope = (envelope as u32) << 3;

        let (level, negate) = match self {
            Self::Sine => (quarter_wave(phase), phase & 0x200 != 0),
            Self::HalfSine => {
                let level = if phase & 0x200 != 0 {
                    SILENT
                } else {
                    quarter_wave(phase)
                };
                (level, false)
            }
            Self::AbsSine => (quarter_wave(phase), false),
            Self::PulseSine => {
                let level = if phase & 0x100 != 0 {
                    SILENT
                } else {
                    LOG_SIN_ROM[(phase & 0xff) as usize]
                };
                (level, false)
            }
            Self::AlternatingSine => (double_speed(phase), phase & 0x300 == 0x100),
            Self::CamelSine => (double_speed(phase), false),
            Self::Square => {
                let negate = phase & 0x200 != 0;
                return complement(attenuation_to_amplitude(envelope), negate);
            }
            Self::LogSaw => {
                let negate = phase & 0x200 != 0;
                let phase = if negate {
                    (phase & 0x1ff) ^ 0x1ff
                } else {
                    phase
                };
                (phase << 3, negate)
            }
        };

        complement(attenuation_to_amplitude(level as u32 + envelope), negate)
    }
}

/// Log-sine lookup mirrored across the quarter period.
#[inline]
fn quarter_wave(phase: u16) -> u16 {
    if phase & 0x100 != 0 {
        LOG_SIN_ROM[((phase & 0xff) ^ 0xff) as usize]
    } else {
        LOG_SIN_ROM[(phase & 0xff) as usize]
    }
}

#[inline]
fn double_speed(phase: u16) -> u16 {
    if phase & 0x200 != 0 {
        SILENT
    } else if phase & 0x80 != 0 {
        LOG_SIN_ROM[(((phase ^ 0xff) << 1) & 0xff) as usize]
    } else {
        LOG_SIN_ROM[((phase << 1) & 0xff) as usize]
    }
}

#[inline]
fn complement(amplitude: i16, negate: bool) -> i16 {
    if negate {
        !amplitude
    } else {
        amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_symmetry() {
        // Peak of the positive half and the complemented negative half.
        let peak = Waveform::Sine.output(0x100, 0);
        let trough = Waveform::Sine.output(0x300, 0);
        assert!(peak > 4000);
        assert_eq!(trough, !peak);
    }

    #[test]
    fn test_full_attenuation_is_silent() {
        for bits in 0..8 {
            let wave = Waveform::from_bits(bits);
            for phase in [0x000, 0x040, 0x080, 0x0c0] {
                assert_eq!(wave.output(phase, 0x1ff << 1), 0, "{wave:?} at {phase:#x}");
            }
        }
    }

    #[test]
    fn test_half_sine_second_half_silent() {
        assert_eq!(Waveform::HalfSine.output(0x280, 0), 0);
        assert!(Waveform::HalfSine.output(0x080, 0) > 0);
    }

    #[test]
    fn test_square_ignores_phase_magnitude() {
        let high = Waveform::Square.output(0x010, 0);
        assert_eq!(Waveform::Square.output(0x1f0, 0), high);
        assert_eq!(Waveform::Square.output(0x210, 0), !high);
    }

    #[test]
    fn test_waveform_bits_roundtrip() {
        for bits in 0..8 {
            assert_eq!(Waveform::from_bits(bits).bits(), bits);
        }
        assert_eq!(Waveform::from_bits(0x0f), Waveform::LogSaw);
    }
}
