//! Benchmarks for the chord engine hot paths.
//!
//! Run with: cargo bench
//!
//! Key handling and playback ticks run on the UI thread between frames,
//! and the voice renderer runs inside the audio callback, so all of
//! these need to stay far below their respective deadlines (16ms frame
//! budget, ~1-10ms audio block budget at 48kHz).

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use chordloop::engine::ChordEngine;
use chordloop::synth::{ChordSynth, NullSynth, SynthMessage};
use chordloop::theory::{chord_tones, ChordMode, Pitch, PitchClass};
use chordloop::transport::ManualClock;

/// Common audio buffer sizes.
const BLOCK_SIZES: &[usize] = &[64, 256, 512];

fn bench_chord_tones(c: &mut Criterion) {
    let mut group = c.benchmark_group("theory/chord_tones");
    let base = Pitch::new(PitchClass::C, 4);

    for mode in [
        ChordMode::Root,
        ChordMode::MajorMinor,
        ChordMode::MajorMinor7,
        ChordMode::Diminished,
    ] {
        group.bench_function(format!("{mode:?}"), |b| {
            b.iter(|| chord_tones(black_box(mode), black_box(base)))
        });
    }
    group.finish();
}

fn bench_key_gesture(c: &mut Criterion) {
    c.bench_function("engine/key_down_up", |b| {
        let mut engine = ChordEngine::new(NullSynth, ManualClock::new());
        engine.key_down('e'); // seventh chords, the widest path
        engine.key_up('e');
        b.iter(|| {
            engine.key_down(black_box('a'));
            engine.clock_mut().advance(0.01);
            engine.key_up(black_box('a'));
            // keep the log from growing without bound across iterations
            if engine.log().len() >= 1024 {
                engine.clear_log();
            }
        })
    });
}

fn bench_playback_tick(c: &mut Criterion) {
    c.bench_function("engine/tick_64_slot_loop", |b| {
        let mut engine = ChordEngine::new(NullSynth, ManualClock::new());
        engine.key_down('w');
        for _ in 0..64 {
            engine.key_down('a');
            engine.clock_mut().advance(0.1);
            engine.key_up('a');
        }
        engine.play();
        b.iter(|| {
            engine.clock_mut().advance(0.001);
            engine.tick();
        })
    });
}

fn bench_render_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/render_block");

    for &size in BLOCK_SIZES {
        let mut rx = VecDeque::new();
        for note in [60u8, 64, 67, 71] {
            rx.push_back(SynthMessage::NoteOn { note, velocity: 100 });
        }
        let mut synth = ChordSynth::new(48_000.0, 16, rx);
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("seventh_chord", size), &size, |b, _| {
            b.iter(|| synth.render_block(black_box(&mut buffer)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_chord_tones,
    bench_key_gesture,
    bench_playback_tick,
    bench_render_block,
);
criterion_main!(benches);
