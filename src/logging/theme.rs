//! Colors for the simple log format.

use crate::logging::Level;
use console::Style;

/// Styles applied to field blocks, by level.
#[derive(Debug, Clone)]
pub struct LogTheme {
    /// Style for info blocks (green).
    pub info: Style,
    /// Style for warning blocks (bright red).
    pub warn: Style,
    /// Style for error blocks (red).
    pub error: Style,
}

impl Default for LogTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl LogTheme {
    /// Create the colored theme.
    pub fn new() -> Self {
        Self {
            info: Style::new().green(),
            warn: Style::new().red().bright(),
            error: Style::new().red(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            info: Style::new(),
            warn: Style::new(),
            error: Style::new(),
        }
    }

    /// Style for a given level.
    pub fn style(&self, level: Level) -> &Style {
        match level {
            Level::Info => &self.info,
            Level::Warn => &self.warn,
            Level::Error => &self.error,
        }
    }

    /// Apply the level's style to `text`.
    pub fn paint(&self, level: Level, text: &str) -> String {
        self.style(level).apply_to(text).to_string()
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_leaves_text_untouched() {
        let theme = LogTheme::plain();
        assert_eq!(theme.paint(Level::Error, "boom"), "boom");
        assert_eq!(theme.paint(Level::Info, "fine"), "fine");
    }

    #[test]
    fn forced_colors_wrap_text_in_escapes() {
        let theme = LogTheme {
            info: Style::new().green().force_styling(true),
            ..LogTheme::plain()
        };
        let painted = theme.paint(Level::Info, "ok");
        assert!(painted.contains("\u{1b}["));
        assert!(painted.contains("ok"));
    }

    #[test]
    fn style_selects_by_level() {
        let theme = LogTheme::new();
        assert_eq!(
            theme.style(Level::Warn).apply_to("x").force_styling(true).to_string(),
            Style::new().red().bright().force_styling(true).apply_to("x").to_string()
        );
    }
}
