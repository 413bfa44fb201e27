//! Duration picker shown on the idle screen.
//!
//! Holds a fixed, ordered list of [`Preset`]s and a cursor over them. Moving
//! the cursor selects the preset under it immediately, the way a row of
//! buttons would. The core only ever sees the resulting number of seconds.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Durations offered when none are configured: 10 seconds, 5, 10 and 15 minutes.
pub const DEFAULT_PRESETS: [u32; 4] = [10, 5 * 60, 10 * 60, 15 * 60];

/// One selectable session length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Length in seconds. Always positive.
    pub seconds: u32,
    /// Button text, e.g. `"10 sec"` or `"5 min"`.
    pub label: String,
}

impl Preset {
    /// Creates a preset with a label derived from `seconds`.
    pub fn new(seconds: u32) -> Self {
        Self {
            seconds,
            label: label_for(seconds),
        }
    }
}

/// Human label for a duration.
///
/// Whole minutes read `"N min"`, anything under a minute `"N sec"`, and the
/// rest `"XmYs"`.
pub fn label_for(seconds: u32) -> String {
    match (seconds / 60, seconds % 60) {
        (0, s) => format!("{} sec", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{}m{:02}s", m, s),
    }
}

/// Key bindings for moving the selection.
#[derive(Debug, Clone)]
pub struct SelectorKeyMap {
    /// Select the previous preset.
    pub prev: key::Binding,
    /// Select the next preset.
    pub next: key::Binding,
}

impl Default for SelectorKeyMap {
    fn default() -> Self {
        Self {
            prev: key::new_binding(vec![
                key::with_keys_str(&["left", "h"]),
                key::with_help("←/h", "shorter"),
            ]),
            next: key::new_binding(vec![
                key::with_keys_str(&["right", "l"]),
                key::with_help("→/l", "longer"),
            ]),
        }
    }
}

impl KeyMapTrait for SelectorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev, &self.next]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev, &self.next]]
    }
}

/// Styles for the preset row.
#[derive(Debug, Clone)]
pub struct Styles {
    /// An unselected preset.
    pub item: Style,
    /// The selected preset.
    pub selected: Style,
    /// Space between presets.
    pub gap: String,
}

impl Default for Styles {
    fn default() -> Self {
        let base = Style::new().padding(0, 2, 0, 2);
        Self {
            item: base
                .clone()
                .foreground(Color::from("#1E2749"))
                .background(Color::from("#5DA271")),
            selected: base
                .foreground(Color::from("#1E2749"))
                .background(Color::from("#FFE28A"))
                .bold(true),
            gap: "  ".to_string(),
        }
    }
}

/// The duration selector.
#[derive(Debug, Clone)]
pub struct DurationSelector {
    presets: Vec<Preset>,
    cursor: usize,
    /// Key bindings.
    pub keymap: SelectorKeyMap,
    /// Rendering styles.
    pub styles: Styles,
}

impl DurationSelector {
    /// Creates a selector over [`DEFAULT_PRESETS`], with 10 minutes selected.
    pub fn new() -> Self {
        Self::with_presets(&DEFAULT_PRESETS).with_selected_seconds(600)
    }

    /// Creates a selector over the given lengths, sorted and de-duplicated.
    ///
    /// Zero-second entries are dropped. If nothing remains, the defaults are
    /// used instead. The first preset starts selected.
    pub fn with_presets(seconds: &[u32]) -> Self {
        let mut values: Vec<u32> = seconds.iter().copied().filter(|s| *s > 0).collect();
        if values.is_empty() {
            values = DEFAULT_PRESETS.to_vec();
        }
        values.sort_unstable();
        values.dedup();

        Self {
            presets: values.into_iter().map(Preset::new).collect(),
            cursor: 0,
            keymap: SelectorKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Selects the preset with `seconds`, adding it in order if it is not offered.
    pub fn with_selected_seconds(mut self, seconds: u32) -> Self {
        if seconds == 0 {
            return self;
        }
        let index = match self.presets.binary_search_by_key(&seconds, |p| p.seconds) {
            Ok(i) => i,
            Err(i) => {
                self.presets.insert(i, Preset::new(seconds));
                i
            }
        };
        self.cursor = index;
        self
    }

    /// The offered presets, shortest first.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Index of the selected preset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The selected preset.
    pub fn selected(&self) -> &Preset {
        &self.presets[self.cursor]
    }

    /// Length of the selected preset in seconds.
    pub fn selected_seconds(&self) -> u32 {
        self.selected().seconds
    }

    /// Selects the next preset, wrapping to the first.
    pub fn next(&mut self) -> u32 {
        self.cursor = (self.cursor + 1) % self.presets.len();
        self.selected_seconds()
    }

    /// Selects the previous preset, wrapping to the last.
    pub fn prev(&mut self) -> u32 {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .unwrap_or(self.presets.len() - 1);
        self.selected_seconds()
    }

    /// Selects the preset at `index`. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) -> Option<u32> {
        if index >= self.presets.len() {
            return None;
        }
        self.cursor = index;
        Some(self.selected_seconds())
    }

    /// Handles selection keys: the left/right bindings and digits `1`-`9`.
    ///
    /// Returns the newly selected length when the key chose a preset.
    pub fn update(&mut self, msg: &Msg) -> Option<u32> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.next.matches(key_msg) {
            return Some(self.next());
        }
        if self.keymap.prev.matches(key_msg) {
            return Some(self.prev());
        }
        if let KeyCode::Char(c) = key_msg.key {
            let digit = c.to_digit(10)?;
            if digit >= 1 {
                return self.select_index(digit as usize - 1);
            }
        }
        None
    }

    /// Renders the presets as a row of buttons.
    pub fn view(&self) -> String {
        let buttons: Vec<String> = self
            .presets
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let style = if i == self.cursor {
                    &self.styles.selected
                } else {
                    &self.styles.item
                };
                style.clone().render(&p.label)
            })
            .collect();

        let mut parts: Vec<&str> = Vec::with_capacity(buttons.len() * 2);
        for (i, b) in buttons.iter().enumerate() {
            if i > 0 {
                parts.push(self.styles.gap.as_str());
            }
            parts.push(b.as_str());
        }
        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }
}

impl Default for DurationSelector {
    fn default() -> Self {
        Self::new()
    }
}
