//! Formatting and output helpers.
//!
//! We try to handle both textual output and interactive output (output to a
//! "TTY"). In the case of interactive output, we render with prettier non-ASCII
//! characters and with colors, using shell-specific escape codes.

use std::fmt::Display;

use console::{style, StyledObject};

/// Glyphs to use for rendering status lines.
#[derive(Clone, Debug)]
pub struct Glyphs {
    /// Whether or not ANSI escape codes should be emitted (e.g. to render
    /// color).
    pub should_write_ansi_escape_codes: bool,

    /// Prefix for a line reporting an error.
    pub error_prefix: &'static str,
}

impl Glyphs {
    /// Make the `Glyphs` object appropriate for `stdout`.
    pub fn detect() -> Self {
        if console::user_attended() {
            Glyphs::pretty()
        } else {
            Glyphs::text()
        }
    }

    /// Glyphs used for output to a text file or non-TTY.
    pub fn text() -> Self {
        Glyphs {
            should_write_ansi_escape_codes: false,
            error_prefix: "Error:",
        }
    }

    /// Glyphs used for output to a TTY.
    pub fn pretty() -> Self {
        Glyphs {
            should_write_ansi_escape_codes: true,
            error_prefix: "Error:",
        }
    }

    fn apply<D: Display>(&self, object: StyledObject<D>) -> StyledObject<D> {
        object.force_styling(self.should_write_ansi_escape_codes)
    }

    /// Render an error line, e.g. `Error: <message>`.
    pub fn render_error(&self, message: impl Display) -> String {
        format!(
            "{} {}",
            self.apply(style(self.error_prefix).red().bold()),
            message
        )
    }

    /// Render a line reporting a completed action.
    pub fn render_success(&self, message: impl Display) -> String {
        self.apply(style(message).green()).to_string()
    }

    /// Render a value the user is expected to copy, such as a repository name.
    pub fn render_emphasis(&self, value: impl Display) -> String {
        self.apply(style(value).bold()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_glyphs_write_no_escape_codes() {
        let glyphs = Glyphs::text();
        assert_eq!(glyphs.render_error("boom"), "Error: boom");
        assert_eq!(glyphs.render_success("done"), "done");
        assert_eq!(glyphs.render_emphasis("me/shift"), "me/shift");
    }

    #[test]
    fn test_pretty_glyphs_write_escape_codes() {
        let glyphs = Glyphs::pretty();
        let rendered = glyphs.render_error("boom");
        assert!(rendered.contains('\u{1b}'), "{rendered:?}");
        assert_eq!(console::strip_ansi_codes(&rendered), "Error: boom");
    }
}
