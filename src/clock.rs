//! Countdown clock for the meditation session.
//!
//! The clock is the only asynchronous piece of the timer. While armed it
//! produces one [`ClockTickMsg`] per second through bubbletea's tick command;
//! the owning [`Session`](crate::session::Session) turns each accepted message
//! into a one-second decrement and asks the clock for the next firing.
//!
//! # Cancellation
//!
//! bubbletea commands cannot be recalled once handed to the runtime, so the
//! clock cancels by invalidation instead. Every clock carries a unique id and
//! a generation tag. Arming and disarming both bump the tag, and a tick whose
//! id or tag does not match the clock's current values is dropped by
//! [`CountdownClock::accepts`]. A message scheduled before a pause, quit or
//! restart can therefore never decrement the session that follows.
//!
//! ```rust
//! use meditation_timer::clock::CountdownClock;
//!
//! let mut clock = CountdownClock::new();
//! assert!(!clock.is_armed());
//!
//! let _first = clock.arm();
//! let _second = clock.arm(); // replaces the pending firing of `_first`
//! assert!(clock.is_armed());
//!
//! clock.disarm();
//! clock.disarm(); // idempotent
//! assert!(!clock.is_armed());
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for clock instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Fixed period between firings.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Generates unique identifiers for clock instances.
///
/// Each session owns its own clock, so several sessions (for example in
/// tests) can run side by side without reacting to each other's ticks.
fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Message delivered once per interval while a clock is armed.
///
/// Only the clock that scheduled the message will accept it, and only if it
/// has not been re-armed or disarmed since.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockTickMsg {
    /// The unique identifier of the clock that scheduled this tick.
    pub id: i64,
    /// Generation of the clock at scheduling time. Private so that callers
    /// cannot forge a tick that passes [`CountdownClock::accepts`].
    tag: i64,
}

/// A cancellable one-second ticker owned by a single session.
#[derive(Debug, Clone)]
pub struct CountdownClock {
    id: i64,
    tag: i64,
    armed: bool,
    interval: Duration,
}

impl CountdownClock {
    /// Creates a disarmed clock with a fresh id.
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            armed: false,
            interval: TICK_INTERVAL,
        }
    }

    /// Returns the unique identifier of this clock.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Reports whether a firing is currently expected.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// The period between firings. Always one second.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arms the clock and returns the command for its first firing.
    ///
    /// Arming an already armed clock starts a new generation: the firing
    /// scheduled by the previous call is left to arrive but will be rejected,
    /// so at most one pending tick is ever honoured.
    pub fn arm(&mut self) -> Cmd {
        self.tag += 1;
        self.armed = true;
        tracing::trace!(clock = self.id, tag = self.tag, "clock armed");
        self.schedule()
    }

    /// Stops the clock. Any tick already in flight becomes stale.
    ///
    /// Calling this on a disarmed clock does nothing.
    pub fn disarm(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.tag += 1;
        tracing::trace!(clock = self.id, tag = self.tag, "clock disarmed");
    }

    /// Returns true if `msg` is the firing this clock is currently waiting for.
    pub fn accepts(&self, msg: &ClockTickMsg) -> bool {
        self.armed && msg.id == self.id && msg.tag == self.tag
    }

    /// Schedules the next firing of the current generation, if still armed.
    pub fn reschedule(&self) -> Option<Cmd> {
        if !self.armed {
            return None;
        }
        Some(self.schedule())
    }

    fn schedule(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;

        bubbletea_tick(self.interval, move |_| {
            Box::new(ClockTickMsg { id, tag }) as Msg
        })
    }

    /// The message the current generation would deliver.
    #[cfg(test)]
    pub(crate) fn pending_tick(&self) -> ClockTickMsg {
        ClockTickMsg {
            id: self.id,
            tag: self.tag,
        }
    }
}

impl Default for CountdownClock {
    fn default() -> Self {
        Self::new()
    }
}
