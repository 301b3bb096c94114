//! Color service: maps palette names to ANSI escape sequences.
//!
//! Enablement is resolved once from an explicit [`ColorChoice`] and the
//! `NO_COLOR` convention, then carried by value. Nothing here reads or writes
//! process-wide color state, so `colored`'s global override is never touched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Environment variable that disables color when present, whatever its value.
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const RESET: &str = "\x1b[0m";

/// The fixed palette accepted in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Cyan,
    Green,
    Blue,
    Magenta,
    Yellow,
    Red,
    White,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Cyan,
        Color::Green,
        Color::Blue,
        Color::Magenta,
        Color::Yellow,
        Color::Red,
        Color::White,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Color::Cyan => "cyan",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::White => "white",
        }
    }

    /// Case-insensitive palette lookup.
    pub fn from_name(name: &str) -> Option<Color> {
        let name = name.trim();
        Color::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// The statusline uses the bright variants throughout.
    fn ansi(self) -> colored::Color {
        match self {
            Color::Cyan => colored::Color::BrightCyan,
            Color::Green => colored::Color::BrightGreen,
            Color::Blue => colored::Color::BrightBlue,
            Color::Magenta => colored::Color::BrightMagenta,
            Color::Yellow => colored::Color::BrightYellow,
            Color::Red => colored::Color::BrightRed,
            Color::White => colored::Color::BrightWhite,
        }
    }

    /// Start sequence, e.g. `ESC[96m` for cyan.
    pub fn start_sequence(self) -> String {
        format!("\x1b[{}m", self.ansi().to_fg_str())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied override. `Auto` defers to the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorService {
    enabled: bool,
}

impl ColorService {
    /// Resolve enablement against the live process environment.
    pub fn new(choice: ColorChoice) -> Self {
        Self::resolve(choice, std::env::var_os(NO_COLOR_ENV).is_some())
    }

    /// Precedence: explicit override, then the `NO_COLOR` signal, then enabled.
    pub fn resolve(choice: ColorChoice, no_color_env: bool) -> Self {
        let enabled = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => !no_color_env,
        };
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn colorize(&self, text: &str, color: Color) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{}{}", color.start_sequence(), text, RESET)
    }

    /// Name-based variant. Unknown names degrade to plain text.
    pub fn colorize_named(&self, text: &str, name: &str) -> String {
        match Color::from_name(name) {
            Some(color) => self.colorize(text, color),
            None => text.to_string(),
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }
}
