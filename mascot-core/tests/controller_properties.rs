//! Behavioural properties of the mascot emotion controller.
//!
//! Covers priority preemption, minimum-display coalescing, idle re-arming,
//! auto-revert, and teardown safety, plus the reference conversation scenario.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use mascot_core::catalog::EmotionCatalog;
use mascot_core::config::MascotConfig;
use mascot_core::controller::{MascotController, RequestOutcome, TransitionCause};
use mascot_core::emotion::Emotion;
use mascot_core::types::Timestamp;

fn ms(value: u64) -> Timestamp {
    Timestamp::from_millis(value)
}

fn controller_showing(greeting: Emotion, seed: u64) -> MascotController {
    let mut config = MascotConfig::default();
    config.timing.greeting = greeting;
    MascotController::seeded(&config, Arc::new(EmotionCatalog::default()), seed, Timestamp::ZERO)
}

fn arb_emotion() -> impl Strategy<Value = Emotion> {
    prop::sample::select(Emotion::all().collect::<Vec<_>>())
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn conversation_scenario() {
    let mut c = controller_showing(Emotion::Hellow, 1);
    assert_eq!(c.current(), Emotion::Hellow);

    // brainstorm (2) beats hellow (1)
    c.request_emotion_str("brainstorm", None, ms(0));
    assert_eq!(c.current(), Emotion::Brainstorm);

    // love (4) beats brainstorm (2) even 200ms in
    c.request_emotion_str("love", None, ms(200));
    assert_eq!(c.current(), Emotion::Love);

    // okay-done ties love and only 100ms have passed
    let outcome = c.request_emotion_str("okay-done", None, ms(300));
    assert_eq!(outcome, RequestOutcome::Deferred { until: ms(1_200) });
    assert_eq!(c.current(), Emotion::Love);

    assert!(c.tick(ms(1_199)).is_empty());
    assert_eq!(c.current(), Emotion::Love);

    let fired = c.tick(ms(1_200));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].from, Emotion::Love);
    assert_eq!(fired[0].to, Emotion::OkayDone);
    assert_eq!(fired[0].cause, TransitionCause::Deferred);
    assert_eq!(c.current(), Emotion::OkayDone);
}

// ---------------------------------------------------------------------------
// P4: auto-revert
// ---------------------------------------------------------------------------

#[test]
fn cry_with_hold_reverts_to_idle() {
    let mut c = controller_showing(Emotion::Hellow, 2);
    c.request_emotion_str("cry", Some(Duration::from_millis(4_000)), ms(0));
    assert_eq!(c.current(), Emotion::Cry);

    c.tick(ms(3_999));
    assert_eq!(c.current(), Emotion::Cry);

    let fired = c.tick(ms(4_000));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].cause, TransitionCause::AutoRevert);
    assert_eq!(c.current(), Emotion::Idle);
}

// ---------------------------------------------------------------------------
// P5: teardown safety
// ---------------------------------------------------------------------------

#[test]
fn no_mutation_after_teardown_with_all_slots_armed() {
    let mut c = controller_showing(Emotion::Hellow, 3);
    // auto-revert armed
    c.request_emotion(Emotion::Love, Some(Duration::from_millis(2_000)), ms(0));
    // debounce armed
    c.request_emotion(Emotion::Cry, None, ms(100));
    let before = c.snapshot();
    assert!(before.pending.is_some());
    assert!(before.revert_deadline.is_some());
    assert!(before.idle_deadline.is_some());

    c.teardown();
    let fired = c.tick(ms(100_000));

    assert!(fired.is_empty());
    assert_eq!(c.current(), Emotion::Love);
    assert_eq!(c.last_transition(), before.last_transition);
    let after = c.snapshot();
    assert!(after.pending.is_none());
    assert!(after.revert_deadline.is_none());
    assert!(after.idle_deadline.is_none());
    assert!(!after.alive);
}

// ---------------------------------------------------------------------------
// P1: priority preemption at any elapsed time
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn higher_priority_always_preempts(
        a in arb_emotion(),
        b in arb_emotion(),
        elapsed in 0..5_000u64,
    ) {
        let catalog = EmotionCatalog::default();
        prop_assume!(catalog.priority(b) > catalog.priority(a));

        let mut c = controller_showing(a, 11);
        let outcome = c.request_emotion(b, None, ms(elapsed));

        prop_assert!(matches!(outcome, RequestOutcome::Applied(Some(_))));
        prop_assert_eq!(c.current(), b);
        prop_assert_eq!(c.last_transition(), ms(elapsed));
    }
}

// ---------------------------------------------------------------------------
// P2: minimum display and coalescing
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rapid_low_priority_requests_coalesce_to_latest(
        a in arb_emotion(),
        b in arb_emotion(),
        c_emotion in arb_emotion(),
        t1 in 0..999u64,
        gap in 0..999u64,
    ) {
        let catalog = EmotionCatalog::default();
        prop_assume!(catalog.priority(b) <= catalog.priority(a));
        prop_assume!(catalog.priority(c_emotion) <= catalog.priority(a));
        let t2 = (t1 + gap).min(999);

        let mut c = controller_showing(a, 5);
        let first = c.request_emotion(b, None, ms(t1));
        let second = c.request_emotion(c_emotion, None, ms(t2));
        prop_assert_eq!(first, RequestOutcome::Deferred { until: ms(1_000) });
        prop_assert_eq!(second, RequestOutcome::Deferred { until: ms(1_000) });

        c.tick(ms(999));
        prop_assert_eq!(c.current(), a);

        let fired = c.tick(ms(1_000));
        prop_assert_eq!(c.current(), c_emotion);
        prop_assert!(fired.iter().all(|t| t.to != b || b == c_emotion));
    }
}

// ---------------------------------------------------------------------------
// P3: idle re-arm
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn activity_rearms_idle_countdown(activity_at in 0..50_000u64, seed in any::<u64>()) {
        let config = MascotConfig::default();
        let mut c = MascotController::seeded(
            &config,
            Arc::new(EmotionCatalog::default()),
            seed,
            Timestamp::ZERO,
        );
        // replaces the countdown armed at creation
        c.notify_user_activity(ms(activity_at));

        let deadline = activity_at + config.idle.timeout_ms;
        prop_assert!(c.tick(ms(deadline - 1)).is_empty());

        let fired = c.tick(ms(deadline));
        prop_assert_eq!(fired.len(), 1);
        prop_assert_eq!(fired[0].cause, TransitionCause::IdleDecay);
        prop_assert!(config.idle.variants.contains(&c.current()));
    }

    #[test]
    fn applied_request_rearms_idle_countdown(applied_at in 0..9_000u64, seed in any::<u64>()) {
        let config = MascotConfig::default();
        let mut c = MascotController::seeded(
            &config,
            Arc::new(EmotionCatalog::default()),
            seed,
            Timestamp::ZERO,
        );
        c.request_emotion(Emotion::Brainstorm, None, ms(applied_at));

        let deadline = applied_at + config.idle.timeout_ms;
        prop_assert!(c.tick(ms(deadline - 1)).is_empty());
        prop_assert_eq!(c.current(), Emotion::Brainstorm);

        c.tick(ms(deadline));
        prop_assert!(config.idle.variants.contains(&c.current()));
    }
}
