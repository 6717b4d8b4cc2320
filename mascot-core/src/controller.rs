//! Mascot Emotion Controller — priority arbitration, debounce, idle decay.
//!
//! The controller owns the displayed emotion and three independent timer
//! slots:
//!
//! | Slot        | Armed by                               | On fire                         |
//! |-------------|----------------------------------------|---------------------------------|
//! | debounce    | a request blocked by minimum display   | applies the latest such request |
//! | auto-revert | an applied request with a hold time    | returns to `idle`               |
//! | idle decay  | host activity or any applied request   | picks a random idle variant     |
//!
//! Arming a slot only ever replaces that slot's own predecessor.
//!
//! All operations take the current [`Timestamp`]; nothing here reads a clock
//! or blocks. Hosts call [`MascotController::tick`] whenever
//! [`MascotController::next_deadline`] is reached.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::EmotionCatalog;
use crate::config::MascotConfig;
use crate::emotion::Emotion;
use crate::timer::{TimerKind, TimerSlot};
use crate::types::Timestamp;

/// Why the displayed emotion changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransitionCause {
    /// A request applied immediately.
    Requested,
    /// A deferred request applied when the minimum display time elapsed.
    Deferred,
    /// A hold time expired and the mascot returned to `idle`.
    AutoRevert,
    /// Inactivity picked an ambient idle variant.
    IdleDecay,
}

/// A change of the displayed emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    /// Emotion shown before.
    pub from: Emotion,
    /// Emotion shown after.
    pub to: Emotion,
    /// When the change took effect.
    pub at: Timestamp,
    /// What triggered it.
    pub cause: TransitionCause,
}

/// Result of [`MascotController::request_emotion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Applied now. `None` when the emotion was already displayed.
    Applied(Option<Transition>),
    /// Held back until the current emotion has been visible long enough.
    Deferred {
        /// When the request will be applied unless superseded.
        until: Timestamp,
    },
    /// The controller has been torn down.
    Ignored,
}

/// Result of [`MascotController::notify_user_activity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOutcome {
    /// The idle countdown restarted.
    Rearmed {
        /// New idle deadline.
        idle_deadline: Timestamp,
    },
    /// Within the throttle window of the previous signal; nothing changed.
    Throttled,
    /// The controller has been torn down.
    Ignored,
}

/// A request waiting in the debounce slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingRequest {
    /// Emotion to apply.
    pub emotion: Emotion,
    /// Optional hold time before reverting to `idle`.
    pub hold: Option<Duration>,
}

/// Point-in-time view of controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Emotion on screen.
    pub displayed: Emotion,
    /// When `displayed` last changed.
    pub last_transition: Timestamp,
    /// Deferred request and when it applies.
    pub pending: Option<(Timestamp, PendingRequest)>,
    /// When the auto-revert fires.
    pub revert_deadline: Option<Timestamp>,
    /// When idle decay fires.
    pub idle_deadline: Option<Timestamp>,
    /// Whether `teardown` has not yet been called.
    pub alive: bool,
}

/// Owns the displayed emotion and decides how each request affects it.
pub struct MascotController {
    catalog: Arc<EmotionCatalog>,
    min_display: Duration,
    activity_throttle: Duration,
    idle_timeout: Duration,
    idle_variants: Vec<Emotion>,
    idle_repeat: bool,

    displayed: Emotion,
    last_transition: Timestamp,
    last_activity: Option<Timestamp>,

    debounce: TimerSlot<PendingRequest>,
    revert: TimerSlot<()>,
    idle: TimerSlot<()>,

    rng: Box<dyn RngCore + Send>,
    alive: bool,
}

impl MascotController {
    /// Create a controller showing the configured greeting, with an entropy-seeded RNG.
    ///
    /// The idle countdown starts immediately, as if the mount were activity.
    #[must_use]
    pub fn new(config: &MascotConfig, catalog: Arc<EmotionCatalog>, now: Timestamp) -> Self {
        Self::with_rng(config, catalog, Box::new(StdRng::from_entropy()), now)
    }

    /// Create a controller with a fixed RNG seed, for reproducible idle picks.
    #[must_use]
    pub fn seeded(config: &MascotConfig, catalog: Arc<EmotionCatalog>, seed: u64, now: Timestamp) -> Self {
        Self::with_rng(config, catalog, Box::new(StdRng::seed_from_u64(seed)), now)
    }

    /// Create a controller with an injected random source.
    #[must_use]
    pub fn with_rng(
        config: &MascotConfig,
        catalog: Arc<EmotionCatalog>,
        rng: Box<dyn RngCore + Send>,
        now: Timestamp,
    ) -> Self {
        let idle_variants = if config.idle.variants.is_empty() {
            vec![Emotion::Idle]
        } else {
            config.idle.variants.clone()
        };

        let mut controller = Self {
            catalog,
            min_display: config.timing.min_display(),
            activity_throttle: config.timing.activity_throttle(),
            idle_timeout: config.idle.timeout(),
            idle_variants,
            idle_repeat: config.idle.repeat,
            displayed: config.timing.greeting,
            last_transition: now,
            last_activity: None,
            debounce: TimerSlot::new(TimerKind::Debounce),
            revert: TimerSlot::new(TimerKind::AutoRevert),
            idle: TimerSlot::new(TimerKind::IdleDecay),
            rng,
            alive: true,
        };
        controller.rearm_idle(now);
        debug!(greeting = %controller.displayed, %now, "Mascot controller created");
        controller
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Emotion currently on screen.
    #[must_use]
    pub fn current(&self) -> Emotion {
        self.displayed
    }

    /// When the displayed emotion last changed.
    #[must_use]
    pub fn last_transition(&self) -> Timestamp {
        self.last_transition
    }

    /// Whether `teardown` has not yet been called.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// The catalog this controller arbitrates with.
    #[must_use]
    pub fn catalog(&self) -> &Arc<EmotionCatalog> {
        &self.catalog
    }

    /// Earliest pending timer deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.next_due().map(|(deadline, _)| deadline)
    }

    /// Point-in-time view of the controller.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            displayed: self.displayed,
            last_transition: self.last_transition,
            pending: self
                .debounce
                .deadline()
                .zip(self.debounce.payload().copied()),
            revert_deadline: self.revert.deadline(),
            idle_deadline: self.idle.deadline(),
            alive: self.alive,
        }
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Request a new emotion.
    ///
    /// A strictly higher priority than the displayed emotion applies at once.
    /// Otherwise the request applies at once only if the displayed emotion has
    /// been visible for the minimum display time; if not, it replaces any
    /// earlier deferred request and waits for the remainder of that time.
    ///
    /// `hold`, when positive, reverts to `idle` that long after the request
    /// applies.
    pub fn request_emotion(
        &mut self,
        emotion: Emotion,
        hold: Option<Duration>,
        now: Timestamp,
    ) -> RequestOutcome {
        if !self.alive {
            debug!(%emotion, "Request after teardown ignored");
            return RequestOutcome::Ignored;
        }

        let current = self.catalog.priority(self.displayed);
        let requested = self.catalog.priority(emotion);
        let elapsed = now.since(self.last_transition);

        if requested > current || elapsed >= self.min_display {
            if let Some(dropped) = self.debounce.cancel() {
                debug!(dropped = %dropped.emotion, %emotion, "Pending request superseded");
            }
            let transition = self.apply(emotion, hold, TransitionCause::Requested, now);
            return RequestOutcome::Applied(transition);
        }

        let until = now + (self.min_display - elapsed);
        if let Some(dropped) = self.debounce.arm(until, PendingRequest { emotion, hold }) {
            debug!(dropped = %dropped.emotion, %emotion, "Coalesced deferred request");
        }
        debug!(
            %emotion,
            requested,
            current,
            elapsed_ms = %elapsed.as_millis(),
            %until,
            "Request deferred by minimum display time"
        );
        RequestOutcome::Deferred { until }
    }

    /// Request an emotion by identifier; unknown identifiers degrade to `idle`.
    pub fn request_emotion_str(
        &mut self,
        id: &str,
        hold: Option<Duration>,
        now: Timestamp,
    ) -> RequestOutcome {
        self.request_emotion(Emotion::resolve(id), hold, now)
    }

    /// Register host activity (pointer, key, click).
    ///
    /// Restarts the idle countdown unless the previous signal was within the
    /// throttle window.
    pub fn notify_user_activity(&mut self, now: Timestamp) -> ActivityOutcome {
        if !self.alive {
            return ActivityOutcome::Ignored;
        }
        if let Some(last) = self.last_activity {
            if now.since(last) < self.activity_throttle {
                return ActivityOutcome::Throttled;
            }
        }
        self.last_activity = Some(now);
        let idle_deadline = self.rearm_idle(now);
        ActivityOutcome::Rearmed { idle_deadline }
    }

    /// Fire every timer due at `now`, in deadline order.
    ///
    /// Each timer fires at its own deadline, so a late tick replays the same
    /// sequence an on-time host would have seen.
    pub fn tick(&mut self, now: Timestamp) -> Vec<Transition> {
        let mut fired = Vec::new();
        if !self.alive {
            return fired;
        }

        while let Some((deadline, kind)) = self.next_due().filter(|(deadline, _)| *deadline <= now) {
            debug!(timer = kind.name(), %deadline, %now, "Timer fired");
            let transition = match kind {
                TimerKind::Debounce => self
                    .debounce
                    .take_due(deadline)
                    .and_then(|(at, pending)| {
                        self.apply(pending.emotion, pending.hold, TransitionCause::Deferred, at)
                    }),
                TimerKind::AutoRevert => self.revert.take_due(deadline).and_then(|(at, ())| {
                    self.set_displayed(Emotion::Idle, TransitionCause::AutoRevert, at)
                }),
                TimerKind::IdleDecay => self
                    .idle
                    .take_due(deadline)
                    .and_then(|(at, ())| self.fire_idle(at)),
            };
            fired.extend(transition);
        }
        fired
    }

    /// Cancel every timer and stop reacting.
    ///
    /// After teardown no operation mutates the displayed emotion.
    pub fn teardown(&mut self) {
        if !self.alive {
            warn!("Mascot controller torn down twice");
            return;
        }
        self.debounce.cancel();
        self.revert.cancel();
        self.idle.cancel();
        self.alive = false;
        info!(displayed = %self.displayed, "Mascot controller torn down");
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn next_due(&self) -> Option<(Timestamp, TimerKind)> {
        [
            self.debounce.deadline().map(|d| (d, TimerKind::Debounce)),
            self.revert.deadline().map(|d| (d, TimerKind::AutoRevert)),
            self.idle.deadline().map(|d| (d, TimerKind::IdleDecay)),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn apply(
        &mut self,
        emotion: Emotion,
        hold: Option<Duration>,
        cause: TransitionCause,
        now: Timestamp,
    ) -> Option<Transition> {
        let transition = self.set_displayed(emotion, cause, now);

        self.revert.cancel();
        if let Some(hold) = hold.filter(|hold| !hold.is_zero()) {
            self.revert.arm(now + hold, ());
        }

        // An applied request counts as activity.
        self.rearm_idle(now);
        transition
    }

    fn set_displayed(
        &mut self,
        emotion: Emotion,
        cause: TransitionCause,
        now: Timestamp,
    ) -> Option<Transition> {
        if emotion == self.displayed {
            return None;
        }
        let transition = Transition {
            from: self.displayed,
            to: emotion,
            at: now,
            cause,
        };
        self.displayed = emotion;
        self.last_transition = now;
        info!(from = %transition.from, to = %transition.to, ?cause, at = %now, "Mascot emotion changed");
        Some(transition)
    }

    fn rearm_idle(&mut self, now: Timestamp) -> Timestamp {
        let deadline = now + self.idle_timeout;
        self.idle.arm(deadline, ());
        deadline
    }

    fn fire_idle(&mut self, at: Timestamp) -> Option<Transition> {
        if self.debounce.is_armed() {
            debug!("Idle decay skipped, a deferred request is pending");
            self.rearm_idle(at);
            return None;
        }

        let variant = self
            .idle_variants
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Emotion::Idle);
        debug!(%variant, "Idle decay fired");

        if self.idle_repeat {
            self.rearm_idle(at);
        }
        self.set_displayed(variant, TransitionCause::IdleDecay, at)
    }
}

impl fmt::Debug for MascotController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MascotController")
            .field("displayed", &self.displayed)
            .field("last_transition", &self.last_transition)
            .field(self.debounce.kind().name(), &self.debounce.deadline())
            .field(self.revert.kind().name(), &self.revert.deadline())
            .field(self.idle.kind().name(), &self.idle.deadline())
            .field("alive", &self.alive)
            .finish_non_exhaustive()
    }
}
