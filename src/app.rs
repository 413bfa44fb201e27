//! The bubbletea program: key routing and the three screens.
//!
//! [`App`] is a thin shell around a [`Session`]. Key presses become session
//! transitions, clock ticks are forwarded untouched, and `view` draws the
//! screen variant for the current [`Mode`]:
//!
//! - **Idle**: heading, the duration selector and a start hint.
//! - **Running / Paused**: the `m:ss` countdown, an elapsed bar and the
//!   halt/resume and quit controls.
//! - **Finished**: a "Complete" badge that returns home when acknowledged.

use crate::config::{self, Config};
use crate::duration::{DurationSelector, SelectorKeyMap};
use crate::help;
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::progress;
use crate::session::{Mode, Session};
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Key bindings of the app. Which ones are enabled depends on the mode.
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Begin a session (idle).
    pub start: key::Binding,
    /// Pause or resume (running, paused).
    pub halt: key::Binding,
    /// Abandon the session, or leave the program when idle.
    pub quit: key::Binding,
    /// Dismiss the completion screen.
    pub acknowledge: key::Binding,
    /// Toggle the expanded help.
    pub help: key::Binding,
    /// Leave the program from anywhere.
    pub force_quit: key::Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            start: key::new_binding(vec![
                key::with_keys_str(&["enter", " "]),
                key::with_help("enter", "begin"),
            ]),
            halt: key::new_binding(vec![
                key::with_keys_str(&[" ", "h"]),
                key::with_help("space/h", "halt"),
            ]),
            quit: key::new_binding(vec![
                key::with_keys_str(&["q", "esc"]),
                key::with_help("q", "exit"),
            ]),
            acknowledge: key::new_binding(vec![
                key::with_keys_str(&["enter", " "]),
                key::with_help("enter", "home"),
            ]),
            help: key::new_binding(vec![
                key::with_keys_str(&["?"]),
                key::with_help("?", "more"),
            ]),
            force_quit: key::new_binding(vec![
                key::with_keys_str(&["ctrl+c"]),
                key::with_help("ctrl+c", "exit"),
            ]),
        }
    }
}

impl AppKeyMap {
    /// Enables the bindings that apply to `mode` and relabels the toggles.
    pub fn sync(&mut self, mode: Mode) {
        self.start.set_enabled(mode == Mode::Idle);
        self.halt
            .set_enabled(matches!(mode, Mode::Running | Mode::Paused));
        self.acknowledge.set_enabled(mode == Mode::Finished);

        match mode {
            Mode::Paused => self.halt.set_help("space/h", "resume"),
            _ => self.halt.set_help("space/h", "halt"),
        }
        match mode {
            Mode::Idle => self.quit.set_help("q", "exit"),
            Mode::Running | Mode::Paused => self.quit.set_help("q", "quit"),
            Mode::Finished => self.quit.set_help("q", "home"),
        }
    }
}

/// Help for one screen: the selector keys when idle plus the app keys.
struct ScreenKeys<'a> {
    app: &'a AppKeyMap,
    selector: Option<&'a SelectorKeyMap>,
}

impl KeyMapTrait for ScreenKeys<'_> {
    fn short_help(&self) -> Vec<&key::Binding> {
        let mut bindings = Vec::new();
        if let Some(selector) = self.selector {
            bindings.extend(selector.short_help());
        }
        bindings.extend([
            &self.app.start,
            &self.app.halt,
            &self.app.acknowledge,
            &self.app.quit,
            &self.app.help,
        ]);
        bindings
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        let mut groups = Vec::new();
        if let Some(selector) = self.selector {
            groups.extend(selector.full_help());
        }
        groups.push(vec![&self.app.start, &self.app.halt, &self.app.acknowledge]);
        groups.push(vec![&self.app.quit, &self.app.force_quit, &self.app.help]);
        groups
    }
}

/// Colours and text styles of the screens.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Idle heading.
    pub heading: Style,
    /// Secondary text such as "Select duration".
    pub label: Style,
    /// The start hint button.
    pub button: Style,
    /// The countdown digits.
    pub countdown: Style,
    /// "Halted" marker shown while paused.
    pub paused: Style,
    /// The completion badge.
    pub complete: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            heading: Style::new().foreground(Color::from("#F5F5F5")).bold(true),
            label: Style::new().foreground(Color::from("#F5F5F5")),
            button: Style::new()
                .foreground(Color::from("#F5F5F5"))
                .background(Color::from("#5DA271"))
                .padding(0, 3, 0, 3),
            countdown: Style::new().foreground(Color::from("#FFE28A")).bold(true),
            paused: Style::new().foreground(Color::from("#9AA0BC")).italic(true),
            complete: Style::new()
                .foreground(Color::from("#F5F5F5"))
                .background(Color::from("#5DA271"))
                .bold(true)
                .padding(2, 6, 2, 6)
                .border_style(lipgloss::normal_border())
                .border_top(true)
                .border_bottom(true)
                .border_left(true)
                .border_right(true),
        }
    }
}

/// The meditation timer program.
#[derive(Debug)]
pub struct App {
    session: Session,
    selector: DurationSelector,
    /// Key bindings.
    pub keymap: AppKeyMap,
    /// Help line.
    pub help: help::Model,
    /// Elapsed-time bar.
    pub progress: progress::Model,
    /// Screen styles.
    pub styles: Styles,
    width: usize,
    height: usize,
}

impl App {
    /// Builds the app from validated configuration.
    pub fn new(config: &Config) -> Self {
        let selector = DurationSelector::with_presets(&config.presets)
            .with_selected_seconds(config.initial_duration_seconds);
        let session = Session::with_duration(selector.selected_seconds());

        let mut keymap = AppKeyMap::default();
        keymap.sync(session.mode());

        Self {
            session,
            selector,
            keymap,
            help: help::Model::new(),
            progress: progress::Model::new(),
            styles: Styles::default(),
            width: 0,
            height: 0,
        }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access, e.g. to subscribe an observer.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The duration selector.
    pub fn selector(&self) -> &DurationSelector {
        &self.selector
    }

    /// Handles one runtime message.
    pub fn handle(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            self.width = size.width as usize;
            self.height = size.height as usize;
            self.help.width = self.width;
            return None;
        }

        let cmd = if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg, &msg)
        } else {
            self.session.update(&msg)
        };
        self.keymap.sync(self.session.mode());
        cmd
    }

    fn handle_key(&mut self, key_msg: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        if self.keymap.force_quit.matches(key_msg) {
            tracing::info!(mode = %self.session.mode(), "exiting");
            return Some(bubbletea_rs::quit());
        }
        if self.keymap.help.matches(key_msg) {
            self.help.show_all = !self.help.show_all;
            return None;
        }

        match self.session.mode() {
            Mode::Idle => {
                if self.keymap.start.matches(key_msg) {
                    return self.session.start();
                }
                if self.keymap.quit.matches(key_msg) {
                    tracing::info!("exiting");
                    return Some(bubbletea_rs::quit());
                }
                if let Some(seconds) = self.selector.update(msg) {
                    self.session.select_duration(i64::from(seconds));
                }
                None
            }
            Mode::Running | Mode::Paused => {
                if self.keymap.halt.matches(key_msg) {
                    return self.session.toggle_halt();
                }
                if self.keymap.quit.matches(key_msg) {
                    self.session.quit();
                }
                None
            }
            Mode::Finished => {
                if self.keymap.acknowledge.matches(key_msg) {
                    self.session.acknowledge_finish();
                } else if self.keymap.quit.matches(key_msg) {
                    self.session.quit();
                }
                None
            }
        }
    }

    /// Renders the screen for the current mode.
    pub fn render(&self) -> String {
        let body = match self.session.mode() {
            Mode::Idle => self.idle_view(),
            Mode::Running | Mode::Paused => self.countdown_view(),
            Mode::Finished => self.finished_view(),
        };

        let selector = (self.session.mode() == Mode::Idle).then_some(&self.selector.keymap);
        let help = self.help.view(&ScreenKeys {
            app: &self.keymap,
            selector,
        });

        let content = format!("{}\n\n\n{}", body, help);
        center(&content, self.width, self.height)
    }

    fn idle_view(&self) -> String {
        [
            self.styles.heading.render("Meditation Timer"),
            String::new(),
            self.styles.label.render("Select duration:"),
            String::new(),
            self.selector.view(),
            String::new(),
            self.styles.button.render("Start Meditation"),
        ]
        .join("\n")
    }

    fn countdown_view(&self) -> String {
        let snapshot = self.session.snapshot();
        let status = if snapshot.mode == Mode::Paused {
            self.styles.paused.render("halted")
        } else {
            String::new()
        };

        [
            self.styles.countdown.render(&snapshot.countdown_text()),
            String::new(),
            self.progress.view_as(snapshot.progress()),
            status,
        ]
        .join("\n")
    }

    fn finished_view(&self) -> String {
        self.styles.complete.render("Complete")
    }
}

/// Centres each line of `content` in a `width` x `height` area.
///
/// A zero dimension leaves that axis untouched.
fn center(content: &str, width: usize, height: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();

    let top = height.saturating_sub(lines.len()) / 2;
    let mut out = "\n".repeat(top);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let pad = width.saturating_sub(lipgloss::width_visible(line)) / 2;
        out.push_str(&" ".repeat(pad));
        out.push_str(line);
    }
    out
}

impl BubbleTeaModel for App {
    fn init() -> (Self, Option<Cmd>) {
        let config = config::current();
        tracing::info!(
            duration = config.initial_duration_seconds,
            presets = ?config.presets,
            "starting"
        );
        (App::new(&config), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.handle(msg)
    }

    fn view(&self) -> String {
        self.render()
    }
}
