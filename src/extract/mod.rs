//! Turns the host's JSON session snapshot into [`ExtractedData`].

mod collectors;
mod command;
pub mod git;
pub mod system;

pub use collectors::{Collectors, Offline, SystemCollectors};

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::Config;
use crate::data::{DataKey, ExtractedData};
use crate::error::{Result, StatuslineError};

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Fields filled purely by [`Collectors`], independent of the input.
const PROBED: [DataKey; 6] = [
    DataKey::CpuUsage,
    DataKey::MemoryUsage,
    DataKey::Battery,
    DataKey::PythonVersion,
    DataKey::PythonVenv,
    DataKey::Datetime,
];

/// Session snapshot piped by the host on each redraw.
///
/// Every field is optional, and a field of the wrong type is treated as
/// absent rather than failing the whole document.
#[derive(Debug, Deserialize, Default)]
pub struct SessionInput {
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<ModelInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_window: Option<ContextWindow>,
    #[serde(default, deserialize_with = "lenient")]
    pub workspace: Option<Workspace>,
    #[serde(default, deserialize_with = "lenient")]
    pub cost: Option<CostInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub output_style: Option<OutputStyle>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ModelInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ContextWindow {
    #[serde(default, deserialize_with = "lenient")]
    pub remaining_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_output_tokens: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Workspace {
    #[serde(default, deserialize_with = "lenient")]
    pub current_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct CostInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_duration_ms: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_lines_added: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_lines_removed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputStyle {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Parse the input document. It must be a JSON object.
pub fn parse_input(input: &str) -> Result<SessionInput> {
    let value: Value = serde_json::from_str(input)
        .map_err(|e| StatuslineError::InvalidInput(format!("Failed to parse JSON input: {}", e)))?;
    if !value.is_object() {
        return Err(StatuslineError::InvalidInput(
            "expected a JSON object at the top level".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(|e| StatuslineError::InvalidInput(e.to_string()))
}

/// Build the per-invocation data map.
///
/// Collectors only run for fields the configuration shows, since several of
/// them spawn processes or sleep.
pub fn extract(input: &SessionInput, config: &Config, collectors: &dyn Collectors) -> ExtractedData {
    let mut data = ExtractedData::new();

    if let Some(model) = &input.model {
        if let Some(name) = model.id.as_ref().or(model.display_name.as_ref()) {
            data.insert(DataKey::Model, name.as_str());
        }
    }

    if let Some(version) = &input.version {
        data.insert(DataKey::Version, version.as_str());
    }

    extract_context(input, &mut data);
    extract_workspace(input, config, collectors, &mut data);
    extract_cost(input, &mut data);

    if let Some(name) = input.output_style.as_ref().and_then(|s| s.name.as_ref()) {
        data.insert(DataKey::OutputStyle, name.as_str());
    }

    for key in PROBED {
        if !config.is_visible(key.as_str()) {
            continue;
        }
        let value = match key {
            DataKey::CpuUsage => collectors.cpu_usage(),
            DataKey::MemoryUsage => collectors.memory_usage(),
            DataKey::Battery => collectors.battery(),
            DataKey::PythonVersion => collectors.python_version(),
            DataKey::PythonVenv => collectors.python_venv(),
            DataKey::Datetime => collectors.datetime(),
            _ => None,
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            data.insert(key, value);
        }
    }

    tracing::debug!(fields = ?data.keys().collect::<Vec<_>>(), "extracted data");
    data
}

fn extract_context(input: &SessionInput, data: &mut ExtractedData) {
    let Some(window) = &input.context_window else {
        return;
    };

    if let Some(pct) = window.remaining_percentage.filter(|p| p.is_finite()) {
        data.insert(DataKey::ContextRemaining, pct.trunc() as i64);
    }

    if let Some(tokens) = sum_counts(window.total_input_tokens, window.total_output_tokens) {
        data.insert(DataKey::Tokens, tokens);
    }
}

fn extract_workspace(
    input: &SessionInput,
    config: &Config,
    collectors: &dyn Collectors,
    data: &mut ExtractedData,
) {
    let Some(cwd) = input.workspace.as_ref().and_then(|w| w.current_dir.as_ref()) else {
        return;
    };

    let path = Path::new(cwd);
    let dir_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| cwd.clone());
    data.insert(DataKey::CurrentDir, dir_name);

    if !config.is_visible(DataKey::GitBranch.as_str()) {
        return;
    }
    if let Some(branch) = collectors.git_branch(path) {
        let mut parts = vec![branch];
        parts.extend(collectors.git_status(path));
        parts.extend(collectors.pr_status(path));
        data.insert(DataKey::GitBranch, parts.join(" "));
    }
}

fn extract_cost(input: &SessionInput, data: &mut ExtractedData) {
    let Some(cost) = &input.cost else {
        return;
    };

    if let Some(usd) = cost.total_cost_usd {
        data.insert(DataKey::Cost, usd);
    }

    if let Some(ms) = cost.total_duration_ms.and_then(|ms| i64::try_from(ms).ok()) {
        data.insert(DataKey::Duration, ms);

        if ms > 0 {
            let ms = ms as f64;
            if let Some(usd) = cost.total_cost_usd.filter(|c| *c != 0.0) {
                data.insert(DataKey::CostPerHour, usd / (ms / MS_PER_HOUR));
            }
            if let Some(tokens) = data.get(DataKey::Tokens).and_then(|t| t.as_f64()) {
                data.insert(DataKey::TokensPerMinute, (tokens / (ms / MS_PER_MINUTE)) as i64);
            }
        }
    }

    if let Some(lines) = sum_counts(cost.total_lines_added, cost.total_lines_removed) {
        data.insert(DataKey::LinesChanged, lines);
    }
}

/// Sum of two optional counters. `None` when both are zero or absent, or when
/// the total does not fit an `i64`.
fn sum_counts(a: Option<u64>, b: Option<u64>) -> Option<i64> {
    let total = a.unwrap_or(0).checked_add(b.unwrap_or(0))?;
    i64::try_from(total).ok().filter(|t| *t > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FieldValue;

    struct Fixed;

    impl Collectors for Fixed {
        fn git_branch(&self, _cwd: &Path) -> Option<String> {
            Some("main".into())
        }
        fn git_status(&self, _cwd: &Path) -> Option<String> {
            Some("●".into())
        }
        fn cpu_usage(&self) -> Option<String> {
            Some("12%".into())
        }
        fn datetime(&self) -> Option<String> {
            Some("2026-01-02 03:04:05".into())
        }
    }

    fn sample() -> SessionInput {
        parse_input(
            r#"{
                "model": {"id": "claude-x", "display_name": "Claude X"},
                "version": "1.0.85",
                "context_window": {
                    "remaining_percentage": 85.7,
                    "total_input_tokens": 600,
                    "total_output_tokens": 400
                },
                "workspace": {"current_dir": "/home/u/proj"},
                "cost": {
                    "total_cost_usd": 1.5,
                    "total_duration_ms": 1800000,
                    "total_lines_added": 10,
                    "total_lines_removed": 5
                },
                "output_style": {"name": "default"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_rejects_malformed_and_non_objects() {
        assert!(matches!(parse_input("not json"), Err(StatuslineError::InvalidInput(_))));
        assert!(matches!(parse_input(""), Err(StatuslineError::InvalidInput(_))));
        assert!(matches!(parse_input("[1]"), Err(StatuslineError::InvalidInput(_))));
        assert!(parse_input("{}").is_ok());
    }

    #[test]
    fn test_wrong_types_are_absent() {
        let input = parse_input(r#"{"version": 3, "model": "flat", "cost": {"total_cost_usd": "x"}}"#)
            .unwrap();
        assert!(input.version.is_none());
        assert!(input.model.is_none());
        assert!(input.cost.unwrap().total_cost_usd.is_none());
    }

    #[test]
    fn test_extract_full_document() {
        let data = extract(&sample(), &Config::default(), &Fixed);
        assert_eq!(data.get(DataKey::Model), Some(&FieldValue::from("claude-x")));
        assert_eq!(data.get(DataKey::Version), Some(&FieldValue::from("1.0.85")));
        assert_eq!(data.get(DataKey::ContextRemaining), Some(&FieldValue::Int(85)));
        assert_eq!(data.get(DataKey::Tokens), Some(&FieldValue::Int(1000)));
        assert_eq!(data.get(DataKey::CurrentDir), Some(&FieldValue::from("proj")));
        assert_eq!(data.get(DataKey::GitBranch), Some(&FieldValue::from("main ●")));
        assert_eq!(data.get(DataKey::Cost), Some(&FieldValue::Float(1.5)));
        assert_eq!(data.get(DataKey::Duration), Some(&FieldValue::Int(1_800_000)));
        assert_eq!(data.get(DataKey::CostPerHour), Some(&FieldValue::Float(3.0)));
        assert_eq!(data.get(DataKey::TokensPerMinute), Some(&FieldValue::Int(33)));
        assert_eq!(data.get(DataKey::LinesChanged), Some(&FieldValue::Int(15)));
        assert_eq!(data.get(DataKey::OutputStyle), Some(&FieldValue::from("default")));
        assert_eq!(data.get(DataKey::CpuUsage), Some(&FieldValue::from("12%")));
        assert!(data.contains(DataKey::Datetime));
        assert!(!data.contains(DataKey::Battery));
    }

    #[test]
    fn test_model_display_name_fallback() {
        let input = parse_input(r#"{"model": {"display_name": "Opus"}}"#).unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert_eq!(data.get(DataKey::Model), Some(&FieldValue::from("Opus")));
    }

    #[test]
    fn test_rates_absent_without_duration() {
        let input = parse_input(
            r#"{"cost": {"total_cost_usd": 2.0, "total_duration_ms": 0},
                "context_window": {"total_input_tokens": 5}}"#,
        )
        .unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert!(data.contains(DataKey::Duration));
        assert!(!data.contains(DataKey::CostPerHour));
        assert!(!data.contains(DataKey::TokensPerMinute));
    }

    #[test]
    fn test_zero_cost_has_no_rate() {
        let input =
            parse_input(r#"{"cost": {"total_cost_usd": 0.0, "total_duration_ms": 1000}}"#).unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert!(data.contains(DataKey::Cost));
        assert!(!data.contains(DataKey::CostPerHour));
    }

    #[test]
    fn test_hidden_fields_skip_collectors() {
        let mut config = Config::default();
        config.visible_fields.insert("git_branch".into(), false);
        config.visible_fields.insert("cpu_usage".into(), false);
        let data = extract(&sample(), &config, &Fixed);
        assert!(!data.contains(DataKey::GitBranch));
        assert!(!data.contains(DataKey::CpuUsage));
        assert!(data.contains(DataKey::CurrentDir));
    }

    #[test]
    fn test_token_sum_overflow_is_absent() {
        let input = parse_input(&format!(
            r#"{{"context_window": {{"total_input_tokens": {}, "total_output_tokens": 1}}}}"#,
            u64::MAX
        ))
        .unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert!(!data.contains(DataKey::Tokens));
    }

    #[test]
    fn test_out_of_range_counts_are_absent() {
        let input = parse_input(
            r#"{"context_window": {"total_input_tokens": 9300000000000000000},
                "cost": {"total_duration_ms": 10000000000000000000,
                         "total_cost_usd": 1.0,
                         "total_lines_added": 18446744073709551615,
                         "total_lines_removed": 1}}"#,
        )
        .unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert!(!data.contains(DataKey::Tokens));
        assert!(!data.contains(DataKey::Duration));
        assert!(!data.contains(DataKey::CostPerHour));
        assert!(!data.contains(DataKey::TokensPerMinute));
        assert!(!data.contains(DataKey::LinesChanged));
        assert_eq!(data.get(DataKey::Cost), Some(&FieldValue::Float(1.0)));
    }

    #[test]
    fn test_large_counts_stay_positive() {
        let input = parse_input(
            r#"{"context_window": {"total_input_tokens": 9000000000000000000},
                "cost": {"total_duration_ms": 60000}}"#,
        )
        .unwrap();
        let data = extract(&input, &Config::default(), &Offline);
        assert_eq!(
            data.get(DataKey::Tokens),
            Some(&FieldValue::Int(9_000_000_000_000_000_000))
        );
        let tpm = data.get(DataKey::TokensPerMinute).and_then(FieldValue::as_i64).unwrap();
        assert!(tpm > 0);
    }

    #[test]
    fn test_empty_document() {
        let data = extract(&parse_input("{}").unwrap(), &Config::default(), &Offline);
        assert!(data.is_empty());
    }
}
