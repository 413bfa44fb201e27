//! The meditation session state machine.
//!
//! A [`Session`] is the single live entity of the timer. It owns the current
//! [`Mode`], the chosen length and the remaining-time counter, together with
//! the [`CountdownClock`] that drives it. All mutation happens through the
//! transition methods below; each one that changes `Running` status arms or
//! disarms the clock in the same call.
//!
//! | Operation              | Allowed from               | Result                 |
//! |------------------------|----------------------------|------------------------|
//! | `select_duration(d)`   | Idle, `d > 0`              | Idle                   |
//! | `start()`              | Idle                       | Running, clock armed   |
//! | `toggle_halt()`        | Running, Paused            | Paused / Running       |
//! | `quit()`               | Running, Paused, Finished  | Idle, clock disarmed   |
//! | tick (clock only)      | Running                    | Running or Finished    |
//! | `acknowledge_finish()` | Finished                   | Idle                   |
//!
//! Anything else is ignored rather than reported: out-of-mode calls can only
//! come from racing UI events.
//!
//! ```rust
//! use meditation_timer::session::{Mode, Session};
//!
//! let mut session = Session::new();
//! assert!(session.select_duration(10));
//! assert!(!session.select_duration(-5));
//!
//! let _tick = session.start().expect("start arms the clock");
//! assert_eq!(session.mode(), Mode::Running);
//! assert_eq!(session.snapshot().countdown_text(), "0:10");
//!
//! session.quit();
//! assert_eq!(session.mode(), Mode::Idle);
//! assert_eq!(session.remaining_seconds(), 10);
//! ```

use crate::clock::{ClockTickMsg, CountdownClock};
use bubbletea_rs::{Cmd, Msg};
use std::fmt;

/// Length of a session until the user picks another one: ten minutes.
pub const DEFAULT_DURATION_SECONDS: u32 = 600;

/// The phase a session is in. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Waiting for the user to choose a duration and start.
    #[default]
    Idle,
    /// Counting down.
    Running,
    /// Counting suspended; the remaining time is kept.
    Paused,
    /// The countdown reached zero.
    Finished,
}

impl Mode {
    /// Short lowercase name, used in logs and the status line.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "idle",
            Mode::Running => "running",
            Mode::Paused => "paused",
            Mode::Finished => "finished",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A read-only copy of the session state for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase.
    pub mode: Mode,
    /// Chosen session length in seconds. Always positive.
    pub selected_duration_seconds: u32,
    /// Seconds left; zero exactly when `mode` is [`Mode::Finished`].
    pub remaining_seconds: u32,
}

impl Snapshot {
    /// Remaining time as `minutes:seconds`, seconds padded to two digits.
    ///
    /// ```rust
    /// use meditation_timer::session::{Mode, Snapshot};
    ///
    /// let snap = Snapshot { mode: Mode::Running, selected_duration_seconds: 600, remaining_seconds: 65 };
    /// assert_eq!(snap.countdown_text(), "1:05");
    /// ```
    pub fn countdown_text(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    /// Elapsed share of the session, from 0.0 (just started) to 1.0 (finished).
    pub fn progress(&self) -> f64 {
        if self.selected_duration_seconds == 0 {
            return 1.0;
        }
        let elapsed = self
            .selected_duration_seconds
            .saturating_sub(self.remaining_seconds);
        (elapsed as f64 / self.selected_duration_seconds as f64).clamp(0.0, 1.0)
    }
}

/// Formats whole seconds as `m:ss`. Minutes are not capped at 59.
pub fn format_countdown(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Handle returned by [`Session::subscribe`], used to unsubscribe again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Snapshot) + Send>;

/// The meditation timer state machine and its countdown clock.
pub struct Session {
    mode: Mode,
    selected_duration_seconds: u32,
    remaining_seconds: u32,
    clock: CountdownClock,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Session {
    /// Creates an idle session with the default ten-minute duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_SECONDS)
    }

    /// Creates an idle session with the given duration.
    ///
    /// A zero duration falls back to [`DEFAULT_DURATION_SECONDS`] so the
    /// remaining-time counter is always meaningful.
    pub fn with_duration(seconds: u32) -> Self {
        let seconds = if seconds == 0 {
            DEFAULT_DURATION_SECONDS
        } else {
            seconds
        };
        Self {
            mode: Mode::Idle,
            selected_duration_seconds: seconds,
            remaining_seconds: seconds,
            clock: CountdownClock::new(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current phase.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Chosen session length in seconds.
    pub fn selected_duration_seconds(&self) -> u32 {
        self.selected_duration_seconds
    }

    /// Seconds left in the countdown.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Whether the session's clock currently expects a firing.
    pub fn clock_armed(&self) -> bool {
        self.clock.is_armed()
    }

    /// Id of the clock owned by this session.
    pub fn clock_id(&self) -> i64 {
        self.clock.id()
    }

    /// Copies the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.mode,
            selected_duration_seconds: self.selected_duration_seconds,
            remaining_seconds: self.remaining_seconds,
        }
    }

    /// Registers a callback invoked after every state change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Sets the session length. Only honoured while idle and for `seconds > 0`.
    ///
    /// Returns whether the selection was applied.
    pub fn select_duration(&mut self, seconds: i64) -> bool {
        if self.mode != Mode::Idle {
            tracing::debug!(mode = %self.mode, seconds, "select_duration ignored");
            return false;
        }
        let seconds = match u32::try_from(seconds) {
            Ok(s) if s > 0 => s,
            _ => {
                tracing::debug!(seconds, "select_duration rejected non-positive value");
                return false;
            }
        };

        self.selected_duration_seconds = seconds;
        self.remaining_seconds = seconds;
        tracing::debug!(seconds, "duration selected");
        self.notify();
        true
    }

    /// Begins the countdown from the full duration and arms the clock.
    ///
    /// Returns the command for the first tick, or `None` when not idle.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.mode != Mode::Idle {
            tracing::debug!(mode = %self.mode, "start ignored");
            return None;
        }

        self.remaining_seconds = self.selected_duration_seconds;
        self.mode = Mode::Running;
        let cmd = self.clock.arm();
        tracing::debug!(seconds = self.remaining_seconds, "session started");
        self.notify();
        Some(cmd)
    }

    /// Pauses a running session or resumes a paused one.
    ///
    /// Resuming re-arms the clock and returns its first tick command.
    pub fn toggle_halt(&mut self) -> Option<Cmd> {
        let cmd = match self.mode {
            Mode::Running => {
                self.mode = Mode::Paused;
                self.clock.disarm();
                tracing::debug!(remaining = self.remaining_seconds, "session paused");
                None
            }
            Mode::Paused => {
                self.mode = Mode::Running;
                tracing::debug!(remaining = self.remaining_seconds, "session resumed");
                Some(self.clock.arm())
            }
            Mode::Idle | Mode::Finished => {
                tracing::debug!(mode = %self.mode, "toggle_halt ignored");
                return None;
            }
        };
        self.notify();
        cmd
    }

    /// Abandons the session and returns to idle with the counter reset.
    pub fn quit(&mut self) {
        if self.mode == Mode::Idle {
            tracing::debug!("quit ignored while idle");
            return;
        }

        let from = self.mode;
        self.clock.disarm();
        self.reset_to_idle();
        tracing::debug!(%from, "session quit");
        self.notify();
    }

    /// Dismisses the completion screen and returns to idle.
    pub fn acknowledge_finish(&mut self) {
        if self.mode != Mode::Finished {
            tracing::debug!(mode = %self.mode, "acknowledge_finish ignored");
            return;
        }

        self.reset_to_idle();
        tracing::debug!("finish acknowledged");
        self.notify();
    }

    /// Routes a runtime message to the session.
    ///
    /// Clock ticks that belong to the current generation decrement the
    /// counter and yield the next tick command; everything else is ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let tick = msg.downcast_ref::<ClockTickMsg>()?;
        if !self.clock.accepts(tick) {
            tracing::trace!(clock = tick.id, "stale tick dropped");
            return None;
        }

        self.tick();
        self.clock.reschedule()
    }

    /// Applies one second of countdown. Reached only through accepted clock ticks.
    fn tick(&mut self) {
        if self.mode != Mode::Running {
            return;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.mode = Mode::Finished;
            self.clock.disarm();
            tracing::debug!(
                seconds = self.selected_duration_seconds,
                "session finished"
            );
        } else {
            tracing::trace!(remaining = self.remaining_seconds, "tick");
        }
        self.notify();
    }

    fn reset_to_idle(&mut self) {
        self.mode = Mode::Idle;
        self.remaining_seconds = self.selected_duration_seconds;
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("selected_duration_seconds", &self.selected_duration_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("clock", &self.clock)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn tick_msg(session: &Session) -> Msg {
        Box::new(session.clock.pending_tick()) as Msg
    }

    /// Delivers the tick the clock is currently waiting for.
    fn fire(session: &mut Session) -> Option<Cmd> {
        let msg = tick_msg(session);
        session.update(&msg)
    }

    fn assert_invariants(session: &Session) {
        assert_eq!(
            session.remaining_seconds() == 0,
            session.mode() == Mode::Finished,
            "remaining == 0 must coincide with Finished: {:?}",
            session
        );
        assert!(session.remaining_seconds() <= session.selected_duration_seconds());
        assert_eq!(session.clock_armed(), session.mode() == Mode::Running);
    }

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.selected_duration_seconds(), 600);
        assert_eq!(session.remaining_seconds(), 600);
        assert!(!session.clock_armed());
        assert_invariants(&session);
    }

    #[test]
    fn test_with_zero_duration_falls_back() {
        let session = Session::with_duration(0);
        assert_eq!(session.selected_duration_seconds(), DEFAULT_DURATION_SECONDS);
    }

    #[test]
    fn test_select_duration_rejects_non_positive() {
        let mut session = Session::new();
        let before = session.snapshot();

        assert!(!session.select_duration(-5));
        assert_eq!(session.snapshot(), before);

        assert!(!session.select_duration(0));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_select_duration_rejects_overflow() {
        let mut session = Session::new();
        assert!(!session.select_duration(i64::from(u32::MAX) + 1));
        assert_eq!(session.selected_duration_seconds(), 600);
    }

    #[test]
    fn test_select_duration_only_while_idle() {
        let mut session = Session::new();
        assert!(session.select_duration(10));
        assert_eq!(session.remaining_seconds(), 10);

        let _ = session.start();
        assert!(!session.select_duration(300));
        assert_eq!(session.selected_duration_seconds(), 10);

        let _ = session.toggle_halt();
        assert!(!session.select_duration(300));
        assert_eq!(session.selected_duration_seconds(), 10);
    }

    #[test]
    fn test_ten_second_countdown_finishes_on_tenth_tick() {
        let mut session = Session::new();
        session.select_duration(10);
        assert!(session.start().is_some());

        for _ in 0..9 {
            assert!(fire(&mut session).is_some());
            assert_invariants(&session);
        }
        assert_eq!(session.remaining_seconds(), 1);
        assert_eq!(session.mode(), Mode::Running);

        // The tenth tick finishes and does not schedule another.
        assert!(fire(&mut session).is_none());
        assert_eq!(session.remaining_seconds(), 0);
        assert_eq!(session.mode(), Mode::Finished);
        assert_invariants(&session);
    }

    #[test]
    fn test_toggle_halt_pair_preserves_remaining() {
        let mut session = Session::with_duration(30);
        let _ = session.start();
        fire(&mut session);
        fire(&mut session);
        assert_eq!(session.remaining_seconds(), 28);

        let stale = tick_msg(&session);
        assert!(session.toggle_halt().is_none());
        assert_eq!(session.mode(), Mode::Paused);
        assert!(!session.clock_armed());

        assert!(session.toggle_halt().is_some());
        assert_eq!(session.mode(), Mode::Running);
        assert_eq!(session.remaining_seconds(), 28);

        // The firing scheduled before the pause must not count.
        assert!(session.update(&stale).is_none());
        assert_eq!(session.remaining_seconds(), 28);

        // The fresh generation ticks exactly once per firing.
        fire(&mut session);
        assert_eq!(session.remaining_seconds(), 27);
    }

    #[test]
    fn test_paused_session_ignores_ticks() {
        let mut session = Session::with_duration(5);
        let _ = session.start();
        let msg = tick_msg(&session);
        session.toggle_halt();

        assert!(session.update(&msg).is_none());
        assert_eq!(session.remaining_seconds(), 5);
        assert_eq!(session.mode(), Mode::Paused);
    }

    #[test]
    fn test_quit_from_every_active_mode() {
        // Running
        let mut session = Session::with_duration(20);
        let _ = session.start();
        fire(&mut session);
        session.quit();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.remaining_seconds(), 20);
        assert_invariants(&session);

        // Paused
        let _ = session.start();
        fire(&mut session);
        session.toggle_halt();
        session.quit();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.remaining_seconds(), 20);
        assert_invariants(&session);

        // Finished
        session.select_duration(1);
        let _ = session.start();
        fire(&mut session);
        assert_eq!(session.mode(), Mode::Finished);
        session.quit();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.remaining_seconds(), 1);
        assert_invariants(&session);
    }

    #[test]
    fn test_quit_then_restart_rejects_old_ticks() {
        let mut session = Session::with_duration(10);
        let _ = session.start();
        let old = tick_msg(&session);
        session.quit();
        let _ = session.start();

        assert!(session.update(&old).is_none());
        assert_eq!(session.remaining_seconds(), 10);
    }

    #[test]
    fn test_finished_ignores_everything_but_ack_and_quit() {
        let mut session = Session::with_duration(1);
        let _ = session.start();
        let last = tick_msg(&session);
        session.update(&last);
        assert_eq!(session.mode(), Mode::Finished);
        let before = session.snapshot();

        assert!(session.start().is_none());
        assert!(session.toggle_halt().is_none());
        assert!(!session.select_duration(30));
        assert!(session.update(&last).is_none());
        assert_eq!(session.snapshot(), before);
        assert!(!session.clock_armed());

        session.acknowledge_finish();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.remaining_seconds(), 1);
    }

    #[test]
    fn test_invalid_mode_calls_are_noops() {
        let mut session = Session::new();
        let before = session.snapshot();

        assert!(session.toggle_halt().is_none());
        session.quit();
        session.acknowledge_finish();
        assert_eq!(session.snapshot(), before);

        let _ = session.start();
        assert!(session.start().is_none());
        session.acknowledge_finish();
        assert_eq!(session.mode(), Mode::Running);
    }

    #[test]
    fn test_non_tick_messages_are_ignored() {
        let mut session = Session::with_duration(3);
        let _ = session.start();
        let msg: Msg = Box::new("not a tick");
        assert!(session.update(&msg).is_none());
        assert_eq!(session.remaining_seconds(), 3);
    }

    #[test]
    fn test_sessions_do_not_share_ticks() {
        let mut a = Session::with_duration(10);
        let mut b = Session::with_duration(10);
        assert_ne!(a.clock_id(), b.clock_id());
        let _ = a.start();
        let _ = b.start();

        let from_a = tick_msg(&a);
        assert!(b.update(&from_a).is_none());
        assert_eq!(b.remaining_seconds(), 10);
        assert!(a.update(&from_a).is_some());
        assert_eq!(a.remaining_seconds(), 9);
    }

    #[test]
    fn test_observers_see_each_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut session = Session::with_duration(2);
        let id = session.subscribe(move |snap| sink.lock().unwrap().push(*snap));

        let _ = session.start();
        fire(&mut session);
        session.toggle_halt(); // Running -> Paused
        session.start(); // ignored, no notification

        {
            let seen = seen.lock().unwrap();
            let modes: Vec<Mode> = seen.iter().map(|s| s.mode).collect();
            assert_eq!(modes, vec![Mode::Running, Mode::Running, Mode::Paused]);
            assert_eq!(seen[1].remaining_seconds, 1);
        }

        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.quit();
        assert_eq!(seen.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_countdown_text() {
        assert_eq!(format_countdown(600), "10:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(3600), "60:00");
    }

    #[test]
    fn test_progress() {
        let snap = Snapshot {
            mode: Mode::Running,
            selected_duration_seconds: 10,
            remaining_seconds: 10,
        };
        assert_eq!(snap.progress(), 0.0);

        let half = Snapshot {
            remaining_seconds: 5,
            ..snap
        };
        assert!((half.progress() - 0.5).abs() < f64::EPSILON);

        let done = Snapshot {
            mode: Mode::Finished,
            remaining_seconds: 0,
            ..snap
        };
        assert_eq!(done.progress(), 1.0);
    }

    /// Small xorshift generator so the sequences below are reproducible.
    struct Rng(u64);

    impl Rng {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        fn below(&mut self, n: u64) -> u64 {
            self.next() % n
        }
    }

    #[test]
    fn test_random_operation_sequences_keep_invariants() {
        for seed in 1..=200u64 {
            let mut rng = Rng(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let mut session = Session::with_duration(1 + rng.below(5) as u32);
            let mut old_ticks: Vec<ClockTickMsg> = Vec::new();

            for step in 0..300 {
                match rng.below(7) {
                    0 => {
                        let seconds = rng.below(26) as i64 - 5;
                        let applied = session.select_duration(seconds);
                        assert_eq!(applied, seconds > 0 && session.mode() == Mode::Idle);
                    }
                    1 => {
                        old_ticks.push(session.clock.pending_tick());
                        let _ = session.start();
                    }
                    2 => {
                        old_ticks.push(session.clock.pending_tick());
                        let _ = session.toggle_halt();
                    }
                    3 => {
                        old_ticks.push(session.clock.pending_tick());
                        session.quit();
                    }
                    4 => session.acknowledge_finish(),
                    5 => {
                        let _ = fire(&mut session);
                    }
                    _ => {
                        if old_ticks.is_empty() {
                            continue;
                        }
                        let i = rng.below(old_ticks.len() as u64) as usize;
                        let tick = old_ticks[i].clone();
                        let before = session.snapshot();
                        let live = session.mode() == Mode::Running
                            && tick == session.clock.pending_tick();
                        let msg: Msg = Box::new(tick);
                        let _ = session.update(&msg);
                        if !live {
                            assert_eq!(
                                session.snapshot(),
                                before,
                                "stale tick changed state (seed {seed}, step {step})"
                            );
                        }
                    }
                }
                assert_invariants(&session);
            }
        }
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::default(), Mode::Idle);
        assert_eq!(Mode::Paused.to_string(), "paused");
        assert_eq!(Mode::Finished.label(), "finished");
    }
}
