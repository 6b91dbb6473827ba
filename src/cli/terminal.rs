//! Coloured console output.

use owo_colors::{OwoColorize, Style};

/// The meaning a piece of output carries.
#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Pass,
    Fail,
    Warn,
    Muted,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Pass => Style::new().green().bold(),
            Self::Fail => Style::new().red().bold(),
            Self::Warn => Style::new().yellow(),
            Self::Muted => Style::new().dimmed(),
        }
    }
}

/// Whether stdout can render colours.
pub fn colour_enabled() -> bool {
    supports_color::on_cached(supports_color::Stream::Stdout).is_some()
}

pub trait Colorize {
    /// Style the text for `tone`, or return it unchanged without colour
    /// support.
    fn paint(&self, tone: Tone) -> String;

    fn pass(&self) -> String {
        self.paint(Tone::Pass)
    }

    fn fail(&self) -> String {
        self.paint(Tone::Fail)
    }

    fn warn(&self) -> String {
        self.paint(Tone::Warn)
    }

    fn muted(&self) -> String {
        self.paint(Tone::Muted)
    }
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn paint(&self, tone: Tone) -> String {
        let text = self.as_ref();
        if colour_enabled() {
            text.style(tone.style()).to_string()
        } else {
            text.to_string()
        }
    }
}

/// A tick or a cross.
pub fn verdict(valid: bool) -> String {
    if valid { "✓".pass() } else { "✗".fail() }
}
