use approx::assert_relative_eq;
use ymf262::{ChannelType, Opl3, NATIVE_SAMPLE_RATE};

/// Operator register offsets within a bank, in slot order.
const SLOT_OFFSETS: [u16; 18] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x10, 0x11, 0x12,
    0x13, 0x14, 0x15,
];

/// Sustained full-volume sine with instant attack.
fn carrier(chip: &mut Opl3, offset: u16) {
    chip.write_register(0x20 + offset, 0x21);
    chip.write_register(0x40 + offset, 0x00);
    chip.write_register(0x60 + offset, 0xf0);
    chip.write_register(0x80 + offset, 0x0f);
}

/// Operator that never leaves maximum attenuation.
fn silent_modulator(chip: &mut Opl3, offset: u16) {
    chip.write_register(0x20 + offset, 0x21);
    chip.write_register(0x40 + offset, 0x3f);
}

/// A4 sine on channel 0, modulator silent.
fn a4_voice(chip: &mut Opl3) {
    silent_modulator(chip, 0x00);
    carrier(chip, 0x03);
    chip.write_register(0xa0, 0x44);
    chip.write_register(0xb0, 0x32);
}

fn rising_crossings(samples: impl Iterator<Item = i16>) -> usize {
    let mut previous = 0i16;
    let mut count = 0;
    for sample in samples {
        if previous < 0 && sample >= 0 {
            count += 1;
        }
        previous = sample;
    }
    count
}

#[test]
fn pitch_matches_frequency_number_at_native_rate() {
    let mut chip = Opl3::default();
    a4_voice(&mut chip);

    let crossings = rising_crossings((0..NATIVE_SAMPLE_RATE).map(|_| chip.generate()[0]));
    assert_relative_eq!(crossings as f64, 440.0, max_relative = 0.01);
}

#[test]
fn pitch_survives_resampling() {
    let mut chip = Opl3::new(44_100).unwrap();
    a4_voice(&mut chip);

    let crossings = rising_crossings((0..44_100).map(|_| chip.generate_resampled()[0]));
    assert_relative_eq!(crossings as f64, 440.0, max_relative = 0.01);
}

#[test]
fn native_rate_resampling_is_passthrough() {
    let mut direct = Opl3::default();
    let mut resampled = Opl3::new(NATIVE_SAMPLE_RATE).unwrap();
    a4_voice(&mut direct);
    a4_voice(&mut resampled);

    for i in 0..5000 {
        assert_eq!(direct.generate_4ch(), resampled.generate_4ch_resampled(), "frame {i}");
    }
}

#[test]
fn identical_register_streams_give_identical_output() {
    let script = |chip: &mut Opl3| {
        a4_voice(chip);
        chip.write_register(0xc0, 0x0e); // feedback 7
        chip.write_register(0xe3, 0x01);
        carrier(chip, 0x11); // hi-hat
        carrier(chip, 0x14); // snare
        chip.write_register(0xa7, 0x80);
        chip.write_register(0xb7, 0x09);
        chip.write_register(0xbd, 0xe9); // rhythm, deep trem/vib, HH + SD
    };

    let mut a = Opl3::default();
    let mut b = Opl3::default();
    script(&mut a);
    script(&mut b);
    for _ in 0..10_000 {
        assert_eq!(a.generate_4ch(), b.generate_4ch());
    }

    // A clone continues on the same trajectory
    let mut c = a.clone();
    for _ in 0..1000 {
        assert_eq!(a.generate_4ch(), c.generate_4ch());
    }
}

#[test]
fn reset_restores_power_on_behaviour() {
    let mut fresh = Opl3::default();
    let mut reused = Opl3::default();

    reused.write_register(0x105, 0x03);
    reused.write_register(0x104, 0x3f);
    a4_voice(&mut reused);
    for _ in 0..2000 {
        reused.generate();
    }
    reused.reset(NATIVE_SAMPLE_RATE).unwrap();

    a4_voice(&mut fresh);
    a4_voice(&mut reused);
    for _ in 0..2000 {
        assert_eq!(fresh.generate_4ch(), reused.generate_4ch());
    }
}

#[test]
fn output_clips_to_sixteen_bits() {
    let mut chip = Opl3::default();
    for bank in [0x000, 0x100] {
        for offset in SLOT_OFFSETS {
            carrier(&mut chip, bank + offset);
        }
        for n in 0..9 {
            chip.write_register(bank + 0xa0 + n, 0x44);
            chip.write_register(bank + 0xc0 + n, 0x01); // both operators audible
            chip.write_register(bank + 0xb0 + n, 0x32);
        }
    }

    let samples: Vec<i16> = (0..2000).map(|_| chip.generate()[0]).collect();
    assert_eq!(samples.iter().copied().max(), Some(i16::MAX));
    assert_eq!(samples.iter().copied().min(), Some(i16::MIN));
}

#[test]
fn right_output_lags_left_by_one_sample() {
    let mut chip = Opl3::default();
    a4_voice(&mut chip);

    let frames: Vec<[i16; 2]> = (0..500).map(|_| chip.generate()).collect();
    assert_eq!(frames[0][1], 0);
    for pair in frames.windows(2) {
        assert_eq!(pair[1][1], pair[0][0]);
    }
}

#[test]
fn bass_drum_doubles_the_carrier() {
    let setup = |chip: &mut Opl3| {
        silent_modulator(chip, 0x10);
        carrier(chip, 0x13);
        chip.write_register(0xa6, 0x44);
    };

    let mut melodic = Opl3::default();
    setup(&mut melodic);
    melodic.write_register(0xb6, 0x32);

    let mut drum = Opl3::default();
    setup(&mut drum);
    drum.write_register(0xb6, 0x12);
    drum.write_register(0xbd, 0x30);
    assert_eq!(drum.channel(6).unwrap().kind(), ChannelType::Drum);

    let mut heard = false;
    for _ in 0..2000 {
        let tone = melodic.generate()[0] as i32;
        let kick = drum.generate()[0] as i32;
        assert_eq!(kick, 2 * tone);
        heard |= tone != 0;
    }
    assert!(heard);
}

#[test]
fn four_op_voice_is_keyed_from_lower_channel() {
    let setup = |chip: &mut Opl3| {
        chip.write_register(0x105, 0x01);
        chip.write_register(0x104, 0x01);
        for offset in [0x00, 0x03, 0x08] {
            silent_modulator(chip, offset);
        }
        carrier(chip, 0x0b);
        chip.write_register(0xc0, 0x30);
        chip.write_register(0xc3, 0x30);
        chip.write_register(0xa0, 0x44);
    };

    let mut lower = Opl3::default();
    setup(&mut lower);
    lower.write_register(0xb0, 0x32);

    let mut upper = Opl3::default();
    setup(&mut upper);
    upper.write_register(0xb3, 0x32);

    let peak = |chip: &mut Opl3| {
        (0..2000)
            .map(|_| chip.generate()[0].unsigned_abs())
            .max()
            .unwrap_or(0)
    };
    assert!(peak(&mut lower) > 3000);
    assert!(peak(&mut upper) <= 1);
}

#[test]
fn stereo_extension_pans_hard_left() {
    let mut chip = Opl3::default();
    chip.write_register(0x105, 0x03);
    chip.write_register(0xc0, 0x30);
    chip.write_register(0xd0, 0x00);
    a4_voice(&mut chip);

    let frames: Vec<[i16; 2]> = (0..2000).map(|_| chip.generate()).collect();
    assert!(frames.iter().any(|f| f[0].unsigned_abs() > 3000));
    assert!(frames.iter().all(|f| f[1].unsigned_abs() <= 1));
}
