//! Help line for the timer screens.
//!
//! Renders the bindings of a [`KeyMap`] either as a single line
//! (`"enter begin • q quit"`) or, when `show_all` is set, as columns of
//! `key description` rows. Output that would exceed `width` is cut off and
//! replaced by an ellipsis.

use crate::key::{self, KeyMap};
use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Styles applied to the pieces of the help view.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the truncation marker.
    pub ellipsis: Style,
    /// Key column in the short view.
    pub short_key: Style,
    /// Description in the short view.
    pub short_desc: Style,
    /// Separator between short items.
    pub short_separator: Style,
    /// Key column in the full view.
    pub full_key: Style,
    /// Description in the full view.
    pub full_desc: Style,
    /// Gap between full-view columns.
    pub full_separator: Style,
}

impl Default for Styles {
    fn default() -> Self {
        use lipgloss::AdaptiveColor;

        let key_style = Style::new().foreground(AdaptiveColor {
            Light: "#3E6B4B",
            Dark: "#8FC79F",
        });
        let desc_style = Style::new().foreground(AdaptiveColor {
            Light: "#6A7090",
            Dark: "#9AA0BC",
        });
        let sep_style = Style::new().foreground(AdaptiveColor {
            Light: "#B9BCCB",
            Dark: "#4A5173",
        });

        Self {
            ellipsis: sep_style.clone(),
            short_key: key_style.clone(),
            short_desc: desc_style.clone(),
            short_separator: sep_style.clone(),
            full_key: key_style,
            full_desc: desc_style,
            full_separator: sep_style,
        }
    }
}

/// The help view.
#[derive(Debug, Clone)]
pub struct Model {
    /// Show the full, multi-column help instead of the single line.
    pub show_all: bool,
    /// Maximum width in cells. Zero means unlimited.
    pub width: usize,

    /// Text placed between items of the short view.
    pub short_separator: String,
    /// Text placed between columns of the full view.
    pub full_separator: String,
    /// Marker shown when items were cut off.
    pub ellipsis: String,

    /// Styles for the rendered pieces.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            show_all: false,
            width: 0,
            short_separator: " • ".to_string(),
            full_separator: "    ".to_string(),
            ellipsis: "…".to_string(),
            styles: Styles::default(),
        }
    }
}

impl Model {
    /// Creates a help view with default styles and no width limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the width limit.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Renders short or full help for `keymap` depending on `show_all`.
    pub fn view<K: KeyMap>(&self, keymap: &K) -> String {
        if self.show_all {
            self.full_help_view(keymap.full_help())
        } else {
            self.short_help_view(keymap.short_help())
        }
    }

    /// Renders bindings on one line, skipping disabled ones.
    pub fn short_help_view(&self, bindings: Vec<&key::Binding>) -> String {
        let separator = self
            .styles
            .short_separator
            .clone()
            .inline(true)
            .render(&self.short_separator);
        let entries: Vec<String> = bindings
            .into_iter()
            .filter(|b| b.enabled())
            .map(|b| self.entry(&self.styles.short_key, &self.styles.short_desc, b))
            .collect();

        let (count, used) = self.fitting(&entries, lipgloss::width_visible(&separator));
        let mut line = entries[..count].join(separator.as_str());
        if count < entries.len() {
            line.push_str(&self.ellipsis_tail(used));
        }
        line
    }

    /// Renders groups of bindings as side-by-side columns.
    pub fn full_help_view(&self, groups: Vec<Vec<&key::Binding>>) -> String {
        let separator = self
            .styles
            .full_separator
            .clone()
            .inline(true)
            .render(&self.full_separator);
        let columns: Vec<String> = groups
            .iter()
            .filter(|g| should_render_column(g))
            .map(|group| {
                group
                    .iter()
                    .filter(|b| b.enabled())
                    .map(|b| self.entry(&self.styles.full_key, &self.styles.full_desc, b))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();

        let (count, used) = self.fitting(&columns, lipgloss::width_visible(&separator));
        let mut parts: Vec<&str> = Vec::with_capacity(count * 2 + 1);
        for column in &columns[..count] {
            if !parts.is_empty() {
                parts.push(separator.as_str());
            }
            parts.push(column.as_str());
        }
        let tail = if count < columns.len() {
            self.ellipsis_tail(used)
        } else {
            String::new()
        };
        if !tail.is_empty() {
            parts.push(tail.as_str());
        }

        lipgloss::join_horizontal(lipgloss::TOP, &parts)
    }

    fn entry(&self, key_style: &Style, desc_style: &Style, binding: &key::Binding) -> String {
        let help = binding.help();
        format!(
            "{} {}",
            key_style.clone().inline(true).render(&help.key),
            desc_style.clone().inline(true).render(&help.desc)
        )
    }

    /// How many leading `blocks` fit in `width` when joined by a `gap`-wide
    /// separator, and the width they take up.
    fn fitting(&self, blocks: &[String], gap: usize) -> (usize, usize) {
        let mut used = 0;
        for (i, block) in blocks.iter().enumerate() {
            let needed = lipgloss::width_visible(block) + if i == 0 { 0 } else { gap };
            if self.width > 0 && used + needed > self.width {
                return (i, used);
            }
            used += needed;
        }
        (blocks.len(), used)
    }

    /// The marker appended after `used` cells of kept output, or nothing if
    /// it would not fit either.
    fn ellipsis_tail(&self, used: usize) -> String {
        let marker = self
            .styles
            .ellipsis
            .clone()
            .inline(true)
            .render(&self.ellipsis);
        let tail = format!(" {}", marker);
        if used + lipgloss::width_visible(&tail) < self.width {
            tail
        } else {
            String::new()
        }
    }
}

/// A column is drawn only if at least one of its bindings is enabled.
pub fn should_render_column(bindings: &[&key::Binding]) -> bool {
    bindings.iter().any(|b| b.enabled())
}
