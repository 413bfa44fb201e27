//! Key bindings and the help they advertise.
//!
//! A [`Binding`] groups the keys that trigger one action together with the
//! short text shown in the help line. Bindings are built with the small
//! option functions in this module:
//!
//! ```rust
//! use meditation_timer::key::{new_binding, with_help, with_keys_str};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let start = new_binding(vec![
//!     with_keys_str(&["enter", " "]),
//!     with_help("enter", "begin"),
//! ]);
//!
//! let enter = KeyMsg { key: KeyCode::Enter, modifiers: KeyModifiers::NONE };
//! assert!(start.matches(&enter));
//! assert_eq!(start.help().desc, "begin");
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};

/// Text shown for a binding in the help view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// How the key is written, e.g. `"←/h"`.
    pub key: String,
    /// What it does, e.g. `"shorter"`.
    pub desc: String,
}

/// A single key press, optionally with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key code.
    pub code: KeyCode,
    /// Modifiers that must be held. `NONE` matches only unmodified presses.
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    fn matches(&self, msg: &KeyMsg) -> bool {
        if self.code != msg.key {
            return false;
        }
        // Shift is implied by upper-case characters and is not required to match.
        let held = msg.modifiers - KeyModifiers::SHIFT;
        held == self.modifiers - KeyModifiers::SHIFT
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }
}

/// Keys that trigger one action, plus their help text.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

/// Option applied by [`new_binding`].
pub type BindingOpt = Box<dyn FnOnce(&mut Binding)>;

/// Builds a binding from a list of options.
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding::default();
    for opt in opts {
        opt(&mut binding);
    }
    binding
}

/// Sets the keys of a binding.
pub fn with_keys(keys: Vec<KeyPress>) -> BindingOpt {
    Box::new(move |b: &mut Binding| b.keys = keys)
}

/// Sets the keys of a binding from their names, such as `"enter"`,
/// `"left"`, `"ctrl+c"` or single characters.
///
/// Unknown names are skipped.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    let parsed: Vec<KeyPress> = keys.iter().filter_map(|k| parse_key(k)).collect();
    Box::new(move |b: &mut Binding| b.keys = parsed)
}

/// Sets the help text of a binding.
pub fn with_help(key: &str, desc: &str) -> BindingOpt {
    let help = Help {
        key: key.to_string(),
        desc: desc.to_string(),
    };
    Box::new(move |b: &mut Binding| b.help = help)
}

/// Starts the binding disabled.
pub fn with_disabled() -> BindingOpt {
    Box::new(|b: &mut Binding| b.disabled = true)
}

impl Binding {
    /// Returns true if the binding is enabled and `msg` is one of its keys.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(msg))
    }

    /// Whether the binding responds to keys and shows up in help.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Replaces the help text, e.g. to relabel a toggle.
    pub fn set_help(&mut self, key: &str, desc: &str) {
        self.help = Help {
            key: key.to_string(),
            desc: desc.to_string(),
        };
    }

    /// Help text for the binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Keys that trigger the binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }
}

/// Anything that can list its bindings for the help view.
pub trait KeyMap {
    /// Bindings for the single-line help.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for the expanded help.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Returns true if `msg` matches any of the given bindings.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

fn parse_key(name: &str) -> Option<KeyPress> {
    if let Some(rest) = name.strip_prefix("ctrl+") {
        let mut press = parse_key(rest)?;
        press.modifiers |= KeyModifiers::CONTROL;
        return Some(press);
    }
    if let Some(rest) = name.strip_prefix("alt+") {
        let mut press = parse_key(rest)?;
        press.modifiers |= KeyModifiers::ALT;
        return Some(press);
    }

    let code = match name {
        "enter" => KeyCode::Enter,
        "esc" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pgup" => KeyCode::PageUp,
        "pgdown" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyMsg {
        KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_with_keys_str_parses_names() {
        let b = new_binding(vec![with_keys_str(&["left", "h", "space", "ctrl+c", "bogus"])]);
        assert_eq!(b.keys().len(), 4);
        assert!(b.matches(&press(KeyCode::Left)));
        assert!(b.matches(&press(KeyCode::Char('h'))));
        assert!(b.matches(&press(KeyCode::Char(' '))));
        assert!(!b.matches(&press(KeyCode::Char('c'))));
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
        }));
    }

    #[test]
    fn test_shift_is_ignored() {
        let b = new_binding(vec![with_keys_str(&["?"])]);
        assert!(b.matches(&KeyMsg {
            key: KeyCode::Char('?'),
            modifiers: KeyModifiers::SHIFT,
        }));
    }

    #[test]
    fn test_disabled_binding_never_matches() {
        let mut b = new_binding(vec![with_keys_str(&["q"]), with_disabled()]);
        assert!(!b.enabled());
        assert!(!b.matches(&press(KeyCode::Char('q'))));

        b.set_enabled(true);
        assert!(b.matches(&press(KeyCode::Char('q'))));
    }

    #[test]
    fn test_binding_without_keys_is_disabled() {
        let b = new_binding(vec![with_help("x", "nothing")]);
        assert!(!b.enabled());
    }

    #[test]
    fn test_matches_any() {
        let a = new_binding(vec![with_keys_str(&["a"])]);
        let b = new_binding(vec![with_keys(vec![KeyCode::Esc.into()])]);
        assert!(matches(&press(KeyCode::Esc), &[&a, &b]));
        assert!(!matches(&press(KeyCode::Enter), &[&a, &b]));
    }
}
