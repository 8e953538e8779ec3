//! Benchmarks for the scheduling and playhead hot paths.
//!
//! Run with: cargo bench
//!
//! Scheduling happens once per playback start, but the playhead tick runs at
//! display rate and voice rendering inside the audio callback, so both must
//! stay far below their frame deadlines.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tabsync::engine::{schedule, Playhead, LOOKAHEAD_SECONDS};
use tabsync::synth::Voice;
use tabsync::transcription::{Measure, Note, Section, TranscriptionResult};

fn piece(measures_per_section: usize, sections: usize) -> TranscriptionResult {
    let measure = Measure {
        chords: vec!["Em".to_owned()],
        notes: (0..8)
            .map(|i| Note {
                string: (i % 6 + 1) as u8,
                fret: (i % 12).to_string(),
                position: (i * 2) as u8,
                confidence: Some(0.9),
            })
            .collect(),
    };

    TranscriptionResult {
        title: "Bench".to_owned(),
        artist: None,
        key: None,
        tempo: Some(120.0),
        tuning: Some("E Standard".to_owned()),
        sections: (0..sections)
            .map(|i| Section {
                title: format!("Section {i}"),
                measures: vec![measure.clone(); measures_per_section],
            })
            .collect(),
        raw_text: None,
    }
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/schedule");

    for &measures in &[8usize, 32, 128] {
        let result = piece(measures, 4);
        group.bench_with_input(
            BenchmarkId::new("metronome", measures * 4),
            &result,
            |b, result| {
                b.iter(|| {
                    black_box(schedule(
                        black_box(result),
                        "E Standard",
                        true,
                        LOOKAHEAD_SECONDS,
                        0.0,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_playhead_tick(c: &mut Criterion) {
    let result = piece(64, 4);
    let plan = schedule(&result, "E Standard", false, LOOKAHEAD_SECONDS, 0.0);
    let playhead = Playhead::from_plan(&plan);

    c.bench_function("engine/playhead_tick", |b| {
        let mut now = 0.0f64;
        b.iter(|| {
            now += 1.0 / 60.0;
            black_box(playhead.tick(black_box(now)))
        })
    });
}

fn bench_voice_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("synth/voice");

    for &size in &[64usize, 256, 1024] {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("tone", size), &size, |b, _| {
            let mut voice = Voice::tone(329.63, 0, 1, 48_000.0);
            b.iter(|| {
                voice.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_schedule, bench_playhead_tick, bench_voice_render);
criterion_main!(benches);
