#![warn(missing_docs)]

//! # meditation-timer
//!
//! A single-screen meditation countdown for the terminal, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs). The user picks a
//! duration, starts the countdown, can halt and resume or abandon it, and is
//! shown a completion screen when it reaches zero.
//!
//! ## Overview
//!
//! The behaviour lives in two small pieces that know nothing about the
//! terminal:
//!
//! - [`session::Session`]: the state machine (`Idle`, `Running`, `Paused`,
//!   `Finished`) and its remaining-time counter.
//! - [`clock::CountdownClock`]: the cancellable one-second ticker the session
//!   arms while running.
//!
//! Everything else is presentation following the Elm Architecture:
//! [`duration::DurationSelector`] picks the length, [`app::App`] routes keys
//! to session transitions and draws the screens, and [`help`] renders the
//! key hints.
//!
//! ## Driving a session
//!
//! ```rust
//! use meditation_timer::prelude::*;
//!
//! let mut session = Session::new();
//! session.select_duration(10);
//!
//! // `start` hands back the command for the first tick; a bubbletea
//! // program would return it from `update`.
//! let first_tick = session.start();
//! assert!(first_tick.is_some());
//! assert_eq!(session.mode(), Mode::Running);
//!
//! let paused = session.toggle_halt();
//! assert!(paused.is_none());
//! assert_eq!(session.mode(), Mode::Paused);
//!
//! session.quit();
//! assert_eq!(session.snapshot().countdown_text(), "0:10");
//! ```
//!
//! ## Observing changes
//!
//! ```rust
//! use meditation_timer::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let modes = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&modes);
//!
//! let mut session = Session::new();
//! session.subscribe(move |snap: &Snapshot| sink.lock().unwrap().push(snap.mode));
//! let _ = session.start();
//! session.quit();
//!
//! assert_eq!(*modes.lock().unwrap(), vec![Mode::Running, Mode::Idle]);
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod help;
pub mod key;
pub mod logging;
pub mod progress;
pub mod session;

pub use app::App;
pub use clock::{ClockTickMsg, CountdownClock};
pub use config::{parse_duration, Cli, Config};
pub use duration::{DurationSelector, Preset};
pub use error::{Error, Result};
pub use help::Model as HelpModel;
pub use key::{
    matches, new_binding, with_disabled, with_help, with_keys, with_keys_str, Binding,
    Help as KeyHelp, KeyMap, KeyPress,
};
pub use progress::Model as Progress;
pub use session::{format_countdown, Mode, Session, Snapshot, SubscriptionId};

/// Everything needed to embed or drive a timer.
pub mod prelude {
    pub use crate::app::App;
    pub use crate::clock::{ClockTickMsg, CountdownClock};
    pub use crate::duration::{DurationSelector, Preset};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::session::{format_countdown, Mode, Session, Snapshot, SubscriptionId};
}
