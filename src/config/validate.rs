//! Two independent steps applied to a loaded document:
//!
//! * [`merge_with_defaults`] is structural. It fills absent top-level keys and,
//!   for object-valued keys, absent sub-keys, one level deep.
//! * [`validate`] is semantic. It checks enums, ranges and the palette key by
//!   key, replacing bad values with defaults and recording a warning for each.
//!
//! Neither step fails: a bad key never invalidates the rest of the document.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::color::Color;
use crate::fields::FieldRegistry;

use super::schema::{
    default_color_for, Config, DisplayMode, MAX_PROGRESS_BAR_WIDTH, MIN_PROGRESS_BAR_WIDTH,
};

/// A sanitized configuration plus what had to be corrected to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub config: Config,
    pub warnings: Vec<String>,
}

fn default_document() -> Map<String, Value> {
    match serde_json::to_value(Config::default()) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Fill gaps in `loaded` from the default configuration.
///
/// A non-object document is replaced wholesale by the defaults. Existing
/// values are never overwritten, even when they have the wrong type; that is
/// left to [`validate`].
pub fn merge_with_defaults(loaded: Value) -> Value {
    let defaults = default_document();
    let Value::Object(mut doc) = loaded else {
        return Value::Object(defaults);
    };

    for (key, default) in defaults {
        match doc.get_mut(&key) {
            None => {
                doc.insert(key, default);
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(sub) = default {
                    for (sub_key, sub_default) in sub {
                        existing.entry(sub_key).or_insert(sub_default);
                    }
                }
            }
            Some(_) => {}
        }
    }

    Value::Object(doc)
}

/// Sanitize a raw configuration document.
pub fn validate(raw: &Value) -> Validated {
    let mut warnings = Vec::new();
    let empty = Map::new();
    let doc = match raw {
        Value::Object(map) => map,
        other => {
            warnings.push(format!(
                "configuration must be an object, got {}; using defaults",
                describe(Some(other))
            ));
            &empty
        }
    };

    let defaults = Config::default();
    let config = Config {
        display_mode: display_mode(doc.get("display_mode"), &mut warnings),
        visible_fields: visible_fields(doc.get("visible_fields"), &defaults, &mut warnings),
        field_order: field_order(doc.get("field_order"), &mut warnings),
        icons: icons(doc.get("icons"), &defaults, &mut warnings),
        colors: colors(doc.get("colors"), &defaults, &mut warnings),
        show_progress_bars: flag(
            "show_progress_bars",
            doc.get("show_progress_bars"),
            defaults.show_progress_bars,
            &mut warnings,
        ),
        progress_bar_width: progress_bar_width(
            doc.get("progress_bar_width"),
            defaults.progress_bar_width,
            &mut warnings,
        ),
        enable_colors: flag(
            "enable_colors",
            doc.get("enable_colors"),
            defaults.enable_colors,
            &mut warnings,
        ),
    };

    Validated { config, warnings }
}

/// Re-validate an already typed configuration, e.g. before saving.
pub fn sanitize(config: &Config) -> Validated {
    match serde_json::to_value(config) {
        Ok(value) => validate(&value),
        Err(e) => Validated {
            config: Config::default(),
            warnings: vec![format!("could not serialize configuration: {}", e)],
        },
    }
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "(missing)".to_string(),
        Some(Value::String(s)) => format!("'{}'", s),
        Some(other) => other.to_string(),
    }
}

fn display_mode(value: Option<&Value>, warnings: &mut Vec<String>) -> DisplayMode {
    match value.and_then(Value::as_str).and_then(DisplayMode::from_name) {
        Some(mode) => mode,
        None => {
            let default = DisplayMode::default();
            warnings.push(format!(
                "Invalid display_mode {}, using default '{}'",
                describe(value),
                default
            ));
            default
        }
    }
}

fn progress_bar_width(value: Option<&Value>, default: u32, warnings: &mut Vec<String>) -> u32 {
    let Some(value) = value else {
        return default;
    };

    let range = u64::from(MIN_PROGRESS_BAR_WIDTH)..=u64::from(MAX_PROGRESS_BAR_WIDTH);
    match value.as_u64().filter(|w| range.contains(w)) {
        Some(width) => width as u32,
        None => {
            warnings.push(format!(
                "Invalid progress_bar_width {}, must be between {} and {}. Using default {}",
                describe(Some(value)),
                MIN_PROGRESS_BAR_WIDTH,
                MAX_PROGRESS_BAR_WIDTH,
                default
            ));
            default
        }
    }
}

fn flag(key: &str, value: Option<&Value>, default: bool, warnings: &mut Vec<String>) -> bool {
    match value {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warnings.push(format!(
                "Invalid {} {}, expected true or false. Using default {}",
                key,
                describe(Some(other)),
                default
            ));
            default
        }
    }
}

fn colors(
    value: Option<&Value>,
    defaults: &Config,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, Color> {
    let map = match value {
        None => return defaults.colors.clone(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            warnings.push(format!(
                "Invalid colors {}, expected an object. Using defaults",
                describe(Some(other))
            ));
            return defaults.colors.clone();
        }
    };

    map.iter()
        .map(|(key, raw)| {
            let color = match serde_json::from_value::<Color>(raw.clone()) {
                Ok(color) => color,
                Err(_) => {
                    let fallback = default_color_for(key);
                    warnings.push(format!(
                        "Invalid color {} for field '{}', using default '{}'",
                        describe(Some(raw)),
                        key,
                        fallback
                    ));
                    fallback
                }
            };
            (key.clone(), color)
        })
        .collect()
}

fn icons(
    value: Option<&Value>,
    defaults: &Config,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, String> {
    let map = match value {
        None => return defaults.icons.clone(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            warnings.push(format!(
                "Invalid icons {}, expected an object. Using defaults",
                describe(Some(other))
            ));
            return defaults.icons.clone();
        }
    };

    let mut out = BTreeMap::new();
    for (key, raw) in map {
        match raw {
            Value::String(glyph) => {
                out.insert(key.clone(), glyph.clone());
            }
            other => {
                warnings.push(format!(
                    "Invalid icon {} for '{}', expected a string",
                    describe(Some(other)),
                    key
                ));
                if let Some(glyph) = defaults.icons.get(key) {
                    out.insert(key.clone(), glyph.clone());
                }
            }
        }
    }
    out
}

fn visible_fields(
    value: Option<&Value>,
    defaults: &Config,
    warnings: &mut Vec<String>,
) -> BTreeMap<String, bool> {
    let map = match value {
        None => return defaults.visible_fields.clone(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            warnings.push(format!(
                "Invalid visible_fields {}, expected an object. Using defaults",
                describe(Some(other))
            ));
            return defaults.visible_fields.clone();
        }
    };

    let registry = FieldRegistry::builtin();
    let mut out = BTreeMap::new();
    for (name, raw) in map {
        if !registry.contains(name) {
            tracing::debug!(field = %name, "ignoring visibility for unknown field");
            continue;
        }
        match raw {
            Value::Bool(visible) => {
                out.insert(name.clone(), *visible);
            }
            other => {
                let fallback = defaults.is_visible(name);
                warnings.push(format!(
                    "Invalid visibility {} for field '{}', using default {}",
                    describe(Some(other)),
                    name,
                    fallback
                ));
                out.insert(name.clone(), fallback);
            }
        }
    }
    out
}

fn field_order(value: Option<&Value>, warnings: &mut Vec<String>) -> Vec<String> {
    let registry = FieldRegistry::builtin();
    let items = match value {
        None => return Config::default().field_order,
        Some(Value::Array(items)) => items,
        Some(other) => {
            warnings.push(format!(
                "Invalid field_order {}, expected a list. Using default order",
                describe(Some(other))
            ));
            return Config::default().field_order;
        }
    };

    let mut seen = HashSet::new();
    let mut order = Vec::with_capacity(registry.len());
    let mut invalid = Vec::new();
    let mut duplicates = Vec::new();

    for item in items {
        match item.as_str().and_then(|name| registry.get(name)) {
            Some(def) => {
                if seen.insert(def.name()) {
                    order.push(def.name().to_string());
                } else {
                    duplicates.push(def.name());
                }
            }
            None => invalid.push(match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }

    if !invalid.is_empty() {
        warnings.push(format!(
            "Invalid field names in field_order: {}",
            invalid.join(", ")
        ));
    }
    if !duplicates.is_empty() {
        warnings.push(format!(
            "Duplicate field names in field_order: {}",
            duplicates.join(", ")
        ));
    }

    // Newly introduced fields must never be hidden by an old saved order.
    for name in registry.names() {
        if seen.insert(name) {
            tracing::debug!(field = name, "appending missing field to field_order");
            order.push(name.to_string());
        }
    }

    order
}
