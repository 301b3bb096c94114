use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Subcommand};
use serde_json::{Map, Value};

use cc_statusline::config::{merge_with_defaults, validate, Config, ConfigStore, Validated};
use cc_statusline::fields::FieldRegistry;

use crate::cli::output;

/// Scalar settings that `config set` may change.
const SETTABLE_KEYS: [&str; 4] = [
    "display_mode",
    "show_progress_bars",
    "progress_bar_width",
    "enable_colors",
];

#[derive(ClapArgs)]
pub struct Args {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Print the config file path
    Path,

    /// Write the default configuration if no file exists
    Init,

    /// Overwrite the config file with defaults
    Reset,

    /// Report every problem found in the config file
    Validate,

    /// Set a scalar setting
    Set {
        /// One of display_mode, show_progress_bars, progress_bar_width, enable_colors
        key: String,

        /// New value, e.g. `verbose`, `false` or `20`
        value: String,
    },

    /// Show or hide a field
    Toggle {
        /// Field name, e.g. `git_branch`
        field: String,
    },

    /// Change an icon; an empty glyph removes it
    Icon {
        /// Icon key, e.g. `directory` or `cpu`
        key: String,

        /// Replacement glyph
        glyph: String,
    },

    /// Change the color of a field, the separator or a progress bar segment
    Color {
        /// Color key, e.g. `model` or `separator`
        key: String,

        /// One of cyan, green, blue, magenta, yellow, red, white
        #[arg(id = "color_name", value_name = "COLOR")]
        color: String,
    },

    /// Move a field to a 1-based position in the display order
    Move {
        /// Field name, e.g. `cost`
        field: String,

        /// New position; values past the end move the field last
        position: usize,
    },
}

pub fn run(args: Args) -> Result<()> {
    let mut store = ConfigStore::discover().context("failed to locate config file")?;

    match args.command {
        ConfigCommand::Show => {
            let json = serde_json::to_string_pretty(store.load())
                .context("failed to serialize configuration")?;
            println!("{}", json);
        }
        ConfigCommand::Path => println!("{}", store.path().display()),
        ConfigCommand::Init => {
            if store.ensure_exists().context("failed to write config file")? {
                output::success(&format!("Created {}", store.path().display()));
            } else {
                output::info(&format!("{} already exists", store.path().display()));
            }
        }
        ConfigCommand::Reset => {
            store.reset().context("failed to write config file")?;
            output::success(&format!("Reset {} to defaults", store.path().display()));
        }
        ConfigCommand::Validate => run_validate(&store),
        ConfigCommand::Set { key, value } => run_set(&mut store, &key, &value)?,
        ConfigCommand::Toggle { field } => run_toggle(&mut store, &field)?,
        ConfigCommand::Icon { key, glyph } => {
            let updated = apply_icon(store.load(), &key, &glyph)?;
            store.save(&updated).context("failed to write config file")?;
            output::success(&format!("icon {} = '{}'", key, glyph));
        }
        ConfigCommand::Color { key, color } => {
            let updated = apply_color(store.load(), &key, &color)?;
            store.save(&updated).context("failed to write config file")?;
            output::success(&format!("color {} = {}", key, color));
        }
        ConfigCommand::Move { field, position } => {
            let updated = apply_move(store.load(), &field, position)?;
            store.save(&updated).context("failed to write config file")?;
            output::success(&format!("{} moved to position {}", field, position));
        }
    }
    Ok(())
}

fn run_validate(store: &ConfigStore) {
    let Validated { warnings, .. } = store.read();
    if warnings.is_empty() {
        output::success(&format!("{} is valid", store.path().display()));
        return;
    }
    output::header(&format!("{}:", store.path().display()));
    for warning in &warnings {
        output::warning(warning);
    }
}

/// Parse a CLI value as JSON when possible (`20`, `false`), else as a string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Apply `key = raw` to `config`, rejecting values validation would replace.
fn apply_setting(config: &Config, key: &str, raw: &str) -> Result<Config> {
    if !SETTABLE_KEYS.contains(&key) {
        bail!(
            "unknown setting '{}' (expected one of: {})",
            key,
            SETTABLE_KEYS.join(", ")
        );
    }

    let mut doc = to_document(config)?;
    doc.insert(key.to_string(), parse_value(raw));
    revalidate(doc, key)
}

fn to_document(config: &Config) -> Result<Map<String, Value>> {
    match serde_json::to_value(config).context("failed to serialize configuration")? {
        Value::Object(map) => Ok(map),
        _ => bail!("configuration did not serialize to an object"),
    }
}

/// Run an edited document back through merge and validation, refusing any
/// edit the validator would have to correct.
fn revalidate(doc: Map<String, Value>, what: &str) -> Result<Config> {
    let Validated { config, warnings } = validate(&merge_with_defaults(Value::Object(doc)));
    if let Some(warning) = warnings.first() {
        bail!("invalid value for {}: {}", what, warning);
    }
    Ok(config)
}

/// Set `doc[section][key] = value` on an object-valued setting.
fn set_entry(doc: &mut Map<String, Value>, section: &str, key: &str, value: Value) {
    if let Some(Value::Object(entries)) = doc.get_mut(section) {
        entries.insert(key.to_string(), value);
    }
}

fn apply_icon(config: &Config, key: &str, glyph: &str) -> Result<Config> {
    if !Config::default().icons.contains_key(key) {
        bail!("unknown icon key '{}'", key);
    }
    let mut doc = to_document(config)?;
    set_entry(&mut doc, "icons", key, Value::String(glyph.to_string()));
    revalidate(doc, key)
}

fn apply_color(config: &Config, key: &str, color: &str) -> Result<Config> {
    if !Config::default().colors.contains_key(key) {
        bail!("unknown color key '{}'", key);
    }
    let mut doc = to_document(config)?;
    set_entry(&mut doc, "colors", key, Value::String(color.to_string()));
    revalidate(doc, key)
}

fn apply_move(config: &Config, field: &str, position: usize) -> Result<Config> {
    let def = FieldRegistry::builtin().resolve(field)?;
    if position == 0 {
        bail!("positions start at 1");
    }

    let mut order: Vec<String> = config
        .field_order
        .iter()
        .filter(|name| name.as_str() != def.name())
        .cloned()
        .collect();
    let index = (position - 1).min(order.len());
    order.insert(index, def.name().to_string());

    let mut doc = to_document(config)?;
    doc.insert("field_order".to_string(), Value::from(order));
    revalidate(doc, "field_order")
}

fn run_set(store: &mut ConfigStore, key: &str, raw: &str) -> Result<()> {
    let updated = apply_setting(store.load(), key, raw)?;
    store.save(&updated).context("failed to write config file")?;
    output::success(&format!("{} = {}", key, raw));
    Ok(())
}

fn run_toggle(store: &mut ConfigStore, field: &str) -> Result<()> {
    let def = FieldRegistry::builtin().resolve(field)?;

    let mut updated = store.load().clone();
    let visible = !updated.is_visible(def.name());
    updated.visible_fields.insert(def.name().to_string(), visible);
    store.save(&updated).context("failed to write config file")?;

    let state = if visible { "shown" } else { "hidden" };
    output::success(&format!("{} is now {}", def.name(), state));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cc_statusline::config::DisplayMode;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("20"), Value::from(20));
        assert_eq!(parse_value("false"), Value::Bool(false));
        assert_eq!(parse_value("verbose"), Value::String("verbose".into()));
    }

    #[test]
    fn test_apply_setting() {
        let config = Config::default();
        let updated = apply_setting(&config, "display_mode", "verbose").unwrap();
        assert_eq!(updated.display_mode, DisplayMode::Verbose);

        let updated = apply_setting(&config, "progress_bar_width", "20").unwrap();
        assert_eq!(updated.progress_bar_width, 20);

        let updated = apply_setting(&config, "enable_colors", "false").unwrap();
        assert!(!updated.enable_colors);
    }

    #[test]
    fn test_apply_setting_rejects_bad_values() {
        let config = Config::default();
        assert!(apply_setting(&config, "progress_bar_width", "100").is_err());
        assert!(apply_setting(&config, "display_mode", "huge").is_err());
        assert!(apply_setting(&config, "icons", "{}").is_err());
    }

    #[test]
    fn test_apply_icon() {
        let config = Config::default();
        let updated = apply_icon(&config, "cpu", "C").unwrap();
        assert_eq!(updated.icon("cpu"), "C");
        let updated = apply_icon(&config, "directory", "").unwrap();
        assert_eq!(updated.icon("directory"), "");
        assert!(apply_icon(&config, "nope", "x").is_err());
    }

    #[test]
    fn test_apply_color() {
        let config = Config::default();
        let updated = apply_color(&config, "separator", "cyan").unwrap();
        assert_eq!(updated.color("separator"), cc_statusline::color::Color::Cyan);
        assert!(apply_color(&config, "model", "purple").is_err());
        assert!(apply_color(&config, "nope", "red").is_err());
    }

    #[test]
    fn test_apply_move() {
        let config = Config::default();
        let updated = apply_move(&config, "cost", 1).unwrap();
        assert_eq!(updated.field_order[0], "cost");
        assert_eq!(updated.field_order.len(), config.field_order.len());

        let updated = apply_move(&config, "current_dir", 99).unwrap();
        assert_eq!(updated.field_order.last().map(String::as_str), Some("current_dir"));

        assert!(apply_move(&config, "cost", 0).is_err());
        assert!(apply_move(&config, "bogus", 1).is_err());
    }
}
