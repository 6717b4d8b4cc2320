//! Mascot controller benchmarks.
//!
//! The controller sits on an input-event path (pointer moves arrive at frame
//! rate), so every operation should stay well under a microsecond:
//!   request_applied .............. < 1μs
//!   request_deferred_coalesced ... < 1μs
//!   activity_throttled ........... < 100ns
//!   tick_burst_1000_events ....... < 200μs

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mascot_core::catalog::EmotionCatalog;
use mascot_core::config::MascotConfig;
use mascot_core::controller::MascotController;
use mascot_core::directive::extract_directive;
use mascot_core::emotion::Emotion;
use mascot_core::types::Timestamp;

fn make_controller() -> MascotController {
    MascotController::seeded(
        &MascotConfig::default(),
        Arc::new(EmotionCatalog::default()),
        7,
        Timestamp::ZERO,
    )
}

/// Benchmark: a request that preempts the displayed emotion.
fn bench_request_applied(c: &mut Criterion) {
    c.bench_function("request_applied", |b| {
        b.iter_batched(
            make_controller,
            |mut controller| {
                black_box(controller.request_emotion(
                    black_box(Emotion::Love),
                    None,
                    Timestamp::from_millis(10),
                ));
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: repeated low-priority requests coalescing in the debounce slot.
fn bench_request_deferred(c: &mut Criterion) {
    let mut controller = make_controller();
    controller.request_emotion(Emotion::Star, None, Timestamp::ZERO);
    let mut now = 0;

    c.bench_function("request_deferred_coalesced", |b| {
        b.iter(|| {
            now = (now + 1) % 999;
            black_box(controller.request_emotion_str(
                black_box("hellow"),
                None,
                Timestamp::from_millis(now),
            ));
        });
    });
}

/// Benchmark: activity signals inside the throttle window.
fn bench_activity_throttled(c: &mut Criterion) {
    let mut controller = make_controller();
    controller.notify_user_activity(Timestamp::from_millis(5_000));

    c.bench_function("activity_throttled", |b| {
        b.iter(|| black_box(controller.notify_user_activity(Timestamp::from_millis(5_500))));
    });
}

/// Benchmark: a chat-like burst of requests, activity, and ticks.
fn bench_tick_burst(c: &mut Criterion) {
    let emotions: Vec<Emotion> = Emotion::all().collect();

    c.bench_function("tick_burst_1000_events", |b| {
        b.iter_batched(
            make_controller,
            |mut controller| {
                for i in 0..1_000u64 {
                    let now = Timestamp::from_millis(i * 37);
                    let emotion = emotions[(i as usize * 7) % emotions.len()];
                    let hold = (i % 5 == 0).then(|| Duration::from_millis(400));
                    controller.request_emotion(emotion, hold, now);
                    controller.notify_user_activity(now);
                    black_box(controller.tick(now));
                }
                black_box(controller.snapshot());
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

/// Benchmark: directive extraction on a typical reply.
fn bench_directive(c: &mut Criterion) {
    let reply = "[ANIMATION: okay-done] All set! I pushed the fix and the build is green again.";
    c.bench_function("directive_extract", |b| {
        b.iter(|| black_box(extract_directive(black_box(reply))));
    });
}

criterion_group!(
    benches,
    bench_request_applied,
    bench_request_deferred,
    bench_activity_throttled,
    bench_tick_burst,
    bench_directive,
);
criterion_main!(benches);
