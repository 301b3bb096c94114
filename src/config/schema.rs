use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::fields::FieldRegistry;

pub const MIN_PROGRESS_BAR_WIDTH: u32 = 5;
pub const MAX_PROGRESS_BAR_WIDTH: u32 = 50;
pub const DEFAULT_PROGRESS_BAR_WIDTH: u32 = 10;

/// Color keys that are not field names.
pub const COLOR_KEY_BAR_FILLED: &str = "progress_bar_filled";
pub const COLOR_KEY_BAR_EMPTY: &str = "progress_bar_empty";
pub const COLOR_KEY_SEPARATOR: &str = "separator";

/// Fields hidden until the user opts in.
const HIDDEN_BY_DEFAULT: [&str; 3] = ["duration", "lines_changed", "output_style"];

pub const DEFAULT_FIELD_ORDER: [&str; 16] = [
    "current_dir",
    "git_branch",
    "model",
    "version",
    "output_style",
    "python_version",
    "datetime",
    "context_remaining",
    "duration",
    "tokens",
    "cost",
    "lines_changed",
    "cpu_usage",
    "memory_usage",
    "battery",
    "python_venv",
];

const DEFAULT_ICONS: [(&str, &str); 14] = [
    ("directory", "📁"),
    ("git_branch", "🌿"),
    ("model", "🤖"),
    ("version", "📟"),
    ("context", "🧠"),
    ("cost", "💰"),
    ("tokens", "📊"),
    ("duration", "⌛"),
    ("style", "🎨"),
    ("cpu", "💻"),
    ("memory", "🧮"),
    ("battery", "🔋"),
    ("python", "🐍"),
    ("datetime", "🕐"),
];

const DEFAULT_COLORS: [(&str, Color); 19] = [
    ("current_dir", Color::Cyan),
    ("git_branch", Color::Green),
    ("model", Color::Blue),
    ("version", Color::Magenta),
    ("context_remaining", Color::Yellow),
    ("cost", Color::Red),
    ("tokens", Color::Cyan),
    ("duration", Color::Magenta),
    ("output_style", Color::Blue),
    ("lines_changed", Color::Cyan),
    ("cpu_usage", Color::Blue),
    ("memory_usage", Color::Magenta),
    ("battery", Color::Green),
    ("python_version", Color::Yellow),
    ("python_venv", Color::Cyan),
    ("datetime", Color::White),
    (COLOR_KEY_BAR_FILLED, Color::Green),
    (COLOR_KEY_BAR_EMPTY, Color::White),
    (COLOR_KEY_SEPARATOR, Color::White),
];

/// Schema default for a color key. Keys outside the schema fall back to white.
pub fn default_color_for(key: &str) -> Color {
    DEFAULT_COLORS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, c)| *c)
        .unwrap_or(Color::White)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Compact,
    #[serde(alias = "large")]
    Verbose,
}

impl DisplayMode {
    /// Accepts `compact`, `verbose` and the legacy `large` alias.
    pub fn from_name(name: &str) -> Option<DisplayMode> {
        match name {
            "compact" => Some(DisplayMode::Compact),
            "verbose" | "large" => Some(DisplayMode::Verbose),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Compact => "compact",
            DisplayMode::Verbose => "verbose",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings governing which fields appear, in what order, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub display_mode: DisplayMode,
    pub visible_fields: BTreeMap<String, bool>,
    pub field_order: Vec<String>,
    pub icons: BTreeMap<String, String>,
    pub colors: BTreeMap<String, Color>,
    pub show_progress_bars: bool,
    pub progress_bar_width: u32,
    pub enable_colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_mode: DisplayMode::default(),
            visible_fields: default_visible_fields(),
            field_order: DEFAULT_FIELD_ORDER.iter().map(|s| s.to_string()).collect(),
            icons: DEFAULT_ICONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            colors: DEFAULT_COLORS
                .iter()
                .map(|(k, c)| (k.to_string(), *c))
                .collect(),
            show_progress_bars: true,
            progress_bar_width: DEFAULT_PROGRESS_BAR_WIDTH,
            enable_colors: true,
        }
    }
}

fn default_visible_fields() -> BTreeMap<String, bool> {
    FieldRegistry::builtin()
        .names()
        .map(|name| (name.to_string(), !HIDDEN_BY_DEFAULT.contains(&name)))
        .collect()
}

impl Config {
    /// Missing entries count as hidden.
    pub fn is_visible(&self, field: &str) -> bool {
        self.visible_fields.get(field).copied().unwrap_or(false)
    }

    pub fn is_verbose(&self) -> bool {
        self.display_mode == DisplayMode::Verbose
    }

    /// Empty string means "no icon".
    pub fn icon(&self, key: &str) -> &str {
        self.icons.get(key).map(String::as_str).unwrap_or("")
    }

    /// Configured color, else the schema default for the key.
    pub fn color(&self, key: &str) -> Color {
        self.colors
            .get(key)
            .copied()
            .unwrap_or_else(|| default_color_for(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display_mode, DisplayMode::Compact);
        assert_eq!(config.progress_bar_width, 10);
        assert!(config.show_progress_bars);
        assert!(config.enable_colors);
        assert!(config.is_visible("model"));
        assert!(!config.is_visible("duration"));
        assert!(!config.is_visible("output_style"));
    }

    #[test]
    fn test_default_order_covers_registry() {
        let registry = FieldRegistry::builtin();
        assert_eq!(DEFAULT_FIELD_ORDER.len(), registry.len());
        for name in registry.names() {
            assert!(DEFAULT_FIELD_ORDER.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_every_field_has_default_color_and_icon() {
        let config = Config::default();
        for def in FieldRegistry::builtin().iter() {
            assert!(config.colors.contains_key(def.color_key), "{}", def.color_key);
            assert!(!config.icon(def.icon_key).is_empty(), "{}", def.icon_key);
        }
    }

    #[test]
    fn test_color_falls_back_to_schema_default() {
        let mut config = Config::default();
        config.colors.remove("cost");
        assert_eq!(config.color("cost"), Color::Red);
        assert_eq!(config.color("not_a_key"), Color::White);
    }

    #[test]
    fn test_unknown_visibility_is_hidden() {
        assert!(!Config::default().is_visible("warp_drive"));
    }

    #[test]
    fn test_display_mode_alias() {
        assert_eq!(DisplayMode::from_name("large"), Some(DisplayMode::Verbose));
        let mode: DisplayMode = serde_json::from_str("\"large\"").unwrap();
        assert_eq!(mode, DisplayMode::Verbose);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"verbose\"");
    }
}
