//! Benchmarks for the OPL3 sample loop
//!
//! Run with: cargo bench --bench chip -p ymf262

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use ymf262::{Opl3, Opl3Backend};

/// Operator register offsets of the nine bank-0 channels' carriers.
const CARRIERS: [u16; 9] = [0x03, 0x04, 0x05, 0x0b, 0x0c, 0x0d, 0x13, 0x14, 0x15];

/// Nine sounding 2-op voices on bank 0.
fn nine_voices(chip: &mut Opl3) {
    for (n, offset) in CARRIERS.iter().enumerate() {
        let n = n as u16;
        chip.write_register(0x20 + offset - 3, 0x21); // Modulator: sustain, MULT=1
        chip.write_register(0x40 + offset - 3, 0x20); // Modulator: moderate depth
        chip.write_register(0x60 + offset - 3, 0xf2);
        chip.write_register(0x20 + offset, 0x21); // Carrier: sustain, MULT=1
        chip.write_register(0x40 + offset, 0x08);
        chip.write_register(0x60 + offset, 0xf2);
        chip.write_register(0x80 + offset, 0x35);
        chip.write_register(0xc0 + n, 0x3c); // Feedback 6, FM
        chip.write_register(0xa0 + n, 0x44 + (n as u8) * 0x10);
        chip.write_register(0xb0 + n, 0x32); // Key on, block 4
    }
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    let mut chip = Opl3::default();
    nine_voices(&mut chip);

    for iterations in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            iterations,
            |b, &iterations| {
                b.iter(|| {
                    for _ in 0..iterations {
                        black_box(chip.generate());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_generate_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_stream");

    let mut chip = Opl3::new(44_100).expect("valid rate");
    nine_voices(&mut chip);

    for frames in [882, 4410, 44100].iter() {
        let mut buffer = vec![0i16; frames * 2];
        group.bench_with_input(BenchmarkId::from_parameter(frames), frames, |b, &frames| {
            b.iter(|| {
                chip.generate_stream(black_box(&mut buffer), frames)
                    .expect("buffer sized for frames");
            });
        });
    }

    group.finish();
}

fn bench_register_updates(c: &mut Criterion) {
    let mut chip = Opl3::default();

    c.bench_function("write_register", |b| {
        b.iter(|| {
            chip.write_register(black_box(0xa0), black_box(0x44));
            chip.write_register(black_box(0xb0), black_box(0x32));
            chip.write_register(black_box(0xc0), black_box(0x31));
            chip.write_register(black_box(0x104), black_box(0x3f));
            chip.write_register(black_box(0xbd), black_box(0x20));
        });
    });
}

fn bench_music_frame(c: &mut Criterion) {
    let mut chip = Opl3::new(44_100).expect("valid rate");
    nine_voices(&mut chip);

    c.bench_function("music_frame_735_samples", |b| {
        let mut note = 0u8;
        b.iter(|| {
            // Retrigger two voices through the write buffer, as a 60 Hz player would
            note = note.wrapping_add(1);
            chip.write_register_buffered(0xb0, 0x12);
            chip.write_register_buffered(0xa0, black_box(note));
            chip.write_register_buffered(0xb0, 0x32);
            chip.write_register_buffered(0xb1, 0x12);
            chip.write_register_buffered(0xb1, 0x32);

            for _ in 0..735 {
                black_box(chip.generate_resampled());
            }
        });
    });
}

fn bench_rhythm_mode(c: &mut Criterion) {
    let mut chip = Opl3::default();
    nine_voices(&mut chip);
    chip.write_register(0xbd, 0xff); // Rhythm on, all drums keyed, deep trem/vib

    c.bench_function("rhythm_mode", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(chip.generate());
            }
        });
    });
}

fn bench_four_op_stereo_ext(c: &mut Criterion) {
    let mut chip = Opl3::default();
    chip.write_register(0x105, 0x03); // OPL3 mode, stereo extension
    chip.write_register(0x104, 0x3f);
    nine_voices(&mut chip);
    for n in 0..9u16 {
        chip.write_register(0xd0 + n, (n as u8) * 0x20);
    }

    c.bench_function("four_op_stereo_ext", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(chip.generate_4ch());
            }
        });
    });
}

fn bench_backend_trait(c: &mut Criterion) {
    let mut chip = Opl3::new(48_000).expect("valid rate");
    nine_voices(&mut chip);

    c.bench_function("backend_generate_samples_960", |b| {
        b.iter(|| {
            black_box(Opl3Backend::generate_samples(&mut chip, 960));
        });
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_generate_stream,
    bench_register_updates,
    bench_music_frame,
    bench_rhythm_mode,
    bench_four_op_stereo_ext,
    bench_backend_trait
);
criterion_main!(benches);
