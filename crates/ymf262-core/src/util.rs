//! Frequency helpers.

use crate::tables::NATIVE_SAMPLE_RATE;

/// Pitch in Hz of a channel's frequency number and block.
///
/// `f = f_num * 2^block * 49716 / 2^20`
pub fn fnum_to_frequency(f_num: u16, block: u8) -> f32 {
    let f_num = (f_num & 0x3ff) as f64;
    let block = (block & 0x07) as i32;
    (f_num * NATIVE_SAMPLE_RATE as f64 * 2f64.powi(block) / (1 << 20) as f64) as f32
}

/// Best frequency number and block for a pitch.
///
/// Picks the lowest block that fits, which keeps the most precision.
/// Returns `None` for pitches outside the chip's range.
pub fn frequency_to_fnum(hz: f32) -> Option<(u16, u8)> {
    if !hz.is_finite() || hz <= 0.0 {
        return None;
    }
    (0u8..8).find_map(|block| {
        let f_num = (hz as f64 * (1u64 << (20 - block as u32)) as f64 / NATIVE_SAMPLE_RATE as f64)
            .round();
        (1.0..=1023.0)
            .contains(&f_num)
            .then_some((f_num as u16, block))
    })
}

/// MIDI note number nearest to a frequency (A4 = 440 Hz = 69).
pub fn frequency_to_midi(freq: f32) -> Option<u8> {
    if !(8.0..=13_000.0).contains(&freq) {
        return None;
    }
    let midi = (12.0 * (freq / 440.0).log2() + 69.0).round() as i32;
    u8::try_from(midi).ok().filter(|&n| n <= 127)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fnum_to_frequency_a4() {
        // 0x244 at block 4 is the classic A4 setting
        assert_relative_eq!(fnum_to_frequency(0x244, 4), 440.0, max_relative = 0.002);
    }

    #[test]
    fn test_frequency_to_fnum_roundtrip() {
        for hz in [32.7f32, 110.0, 440.0, 1000.0, 3520.0] {
            let (f_num, block) = frequency_to_fnum(hz).expect("in range");
            assert!(f_num <= 1023);
            assert_relative_eq!(fnum_to_frequency(f_num, block), hz, max_relative = 0.01);
        }
    }

    #[test]
    fn test_frequency_to_fnum_out_of_range() {
        assert_eq!(frequency_to_fnum(0.0), None);
        assert_eq!(frequency_to_fnum(f32::NAN), None);
        assert_eq!(frequency_to_fnum(20_000.0), None);
    }

    #[test]
    fn test_nearest_midi_note() {
        assert_eq!(frequency_to_midi(440.0), Some(69));
        assert_eq!(frequency_to_midi(261.63), Some(60));
        assert_eq!(frequency_to_midi(2.0), None);
    }
}
