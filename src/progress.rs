//! Elapsed-time bar for the countdown screen.
//!
//! A static bar: it is redrawn from the session snapshot on every tick, so
//! no animation state is kept here.
//!
//! ```rust
//! use meditation_timer::progress::Model;
//! use lipgloss_extras::lipgloss;
//!
//! let bar = Model::new().with_width(10).without_percentage();
//! assert_eq!(lipgloss::strip_ansi(&bar.view_as(0.5)), "█████░░░░░");
//! ```

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

const DEFAULT_WIDTH: usize = 30;

/// The progress bar.
#[derive(Debug, Clone)]
pub struct Model {
    /// Total width in cells, percentage text included.
    pub width: usize,
    /// Character for the filled part.
    pub full: char,
    /// Character for the empty part.
    pub empty: char,
    /// Colour of the filled part.
    pub full_color: String,
    /// Colour of the empty part.
    pub empty_color: String,
    /// Append ` NN%` after the bar.
    pub show_percentage: bool,
    /// Style of the percentage text.
    pub percentage_style: Style,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            full: '█',
            empty: '░',
            full_color: "#5DA271".to_string(),
            empty_color: "#3A4466".to_string(),
            show_percentage: true,
            percentage_style: Style::new(),
        }
    }
}

impl Model {
    /// A bar with the default width and colours.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total width.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Hides the percentage text.
    pub fn without_percentage(mut self) -> Self {
        self.show_percentage = false;
        self
    }

    /// Renders the bar filled to `percent` (clamped to 0.0..=1.0).
    pub fn view_as(&self, percent: f64) -> String {
        let percent = percent.clamp(0.0, 1.0);
        let percent_view = self.percentage_view(percent);
        let percent_width = lipgloss::width_visible(&percent_view);

        format!("{}{}", self.bar_view(percent, percent_width), percent_view)
    }

    fn bar_view(&self, percent: f64, text_width: usize) -> String {
        let total = self.width.saturating_sub(text_width);
        let filled = ((total as f64) * percent).round() as usize;
        let filled = filled.min(total);

        let full = Style::new()
            .foreground(Color::from(self.full_color.as_str()))
            .render(&self.full.to_string());
        let empty = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());

        let mut result = full.repeat(filled);
        result.push_str(&empty.repeat(total - filled));
        result
    }

    fn percentage_view(&self, percent: f64) -> String {
        if !self.show_percentage {
            return String::new();
        }
        let text = format!(" {:3.0}%", percent * 100.0);
        self.percentage_style.render(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_is_constant() {
        let bar = Model::new().with_width(20);
        for p in [0.0, 0.33, 0.5, 1.0] {
            assert_eq!(lipgloss::width_visible(&bar.view_as(p)), 20);
        }
    }

    #[test]
    fn test_fill_follows_percent() {
        let bar = Model::new().with_width(10).without_percentage();
        assert_eq!(lipgloss::strip_ansi(&bar.view_as(0.0)), "░░░░░░░░░░");
        assert_eq!(lipgloss::strip_ansi(&bar.view_as(1.0)), "██████████");
        assert_eq!(lipgloss::strip_ansi(&bar.view_as(2.0)), "██████████");
    }

    #[test]
    fn test_percentage_text() {
        let bar = Model::new().with_width(15);
        let out = lipgloss::strip_ansi(&bar.view_as(0.5));
        assert!(out.ends_with(" 50%"), "{out}");
    }

    #[test]
    fn test_too_narrow_for_bar() {
        let bar = Model::new().with_width(2);
        let out = lipgloss::strip_ansi(&bar.view_as(0.5));
        assert_eq!(out, "  50%");
    }
}
