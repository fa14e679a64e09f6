//! Message styling.

use console::Style;

/// Kind of a styled line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Header,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Success => Style::new().green(),
            Tone::Warning => Style::new().yellow(),
            Tone::Error => Style::new().red().bold(),
            Tone::Header => Style::new().cyan().bold(),
        }
    }

    fn decorate(self, msg: &str) -> String {
        match self {
            Tone::Success => format!("✓ {}", msg),
            Tone::Warning => format!("⚠ {}", msg),
            Tone::Error => format!("✗ {}", msg),
            Tone::Header => format!("-- {} --", msg),
        }
    }
}

/// Applies [`Tone`]s to messages.
///
/// A colored palette leaves the final say to `console`, which honors
/// `NO_COLOR`, non-TTY streams and `--no-color`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Palette {
    plain: bool,
}

impl Palette {
    pub fn colored() -> Self {
        Self { plain: false }
    }

    /// Never emits escape codes.
    pub fn plain() -> Self {
        Self { plain: true }
    }

    pub fn paint(&self, tone: Tone, msg: &str) -> String {
        let text = tone.decorate(msg);
        if self.plain {
            text
        } else {
            tone.style().apply_to(text).to_string()
        }
    }
}
