//! Single-occupancy timer slots.
//!
//! A slot holds at most one deadline and its payload. Arming a slot replaces
//! whatever it held; cancelling empties it. The controller owns one slot per
//! timer kind, so two kinds never cancel each other.

use crate::types::Timestamp;

/// Which controller timer a slot belongs to.
///
/// The declaration order is the tie-break when several slots fall due at the
/// same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// Applies a deferred emotion request once the minimum display time passes.
    Debounce,
    /// Returns to `idle` after a one-shot reaction's hold time.
    AutoRevert,
    /// Picks an ambient idle variant after inactivity.
    IdleDecay,
}

impl TimerKind {
    /// Short name for logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Debounce => "debounce",
            Self::AutoRevert => "auto_revert",
            Self::IdleDecay => "idle_decay",
        }
    }
}

#[derive(Debug, Clone)]
struct Armed<T> {
    deadline: Timestamp,
    payload: T,
}

/// A timer slot holding zero or one pending deadline.
#[derive(Debug, Clone)]
pub struct TimerSlot<T> {
    kind: TimerKind,
    armed: Option<Armed<T>>,
}

impl<T> TimerSlot<T> {
    /// Create an empty slot.
    #[must_use]
    pub fn new(kind: TimerKind) -> Self {
        Self { kind, armed: None }
    }

    /// The kind of timer this slot holds.
    #[must_use]
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// Arm the slot, returning the payload it displaced, if any.
    pub fn arm(&mut self, deadline: Timestamp, payload: T) -> Option<T> {
        self.armed
            .replace(Armed { deadline, payload })
            .map(|previous| previous.payload)
    }

    /// Empty the slot, returning the payload it held, if any.
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|armed| armed.payload)
    }

    /// Pending deadline, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Timestamp> {
        self.armed.as_ref().map(|armed| armed.deadline)
    }

    /// Pending payload, if armed.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.armed.as_ref().map(|armed| &armed.payload)
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Whether the pending deadline has been reached at `now`.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.deadline().is_some_and(|deadline| deadline <= now)
    }

    /// Take the deadline and payload out of the slot if it is due at `now`.
    pub fn take_due(&mut self, now: Timestamp) -> Option<(Timestamp, T)> {
        if self.is_due(now) {
            self.armed.take().map(|armed| (armed.deadline, armed.payload))
        } else {
            None
        }
    }
}
