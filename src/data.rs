//! Extracted data: the flat, per-invocation mapping from field name to value.
//!
//! The key set is closed. Every displayable field has a key, plus the derived
//! rate keys that metric fields read as companions.

use std::collections::BTreeMap;
use std::fmt;

/// Every key that may appear in [`ExtractedData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataKey {
    Model,
    Version,
    ContextRemaining,
    Tokens,
    CurrentDir,
    GitBranch,
    Cost,
    Duration,
    LinesChanged,
    OutputStyle,
    CpuUsage,
    MemoryUsage,
    Battery,
    PythonVersion,
    PythonVenv,
    Datetime,
    // Derived from two or more raw inputs.
    CostPerHour,
    TokensPerMinute,
}

impl DataKey {
    pub const ALL: [DataKey; 18] = [
        DataKey::Model,
        DataKey::Version,
        DataKey::ContextRemaining,
        DataKey::Tokens,
        DataKey::CurrentDir,
        DataKey::GitBranch,
        DataKey::Cost,
        DataKey::Duration,
        DataKey::LinesChanged,
        DataKey::OutputStyle,
        DataKey::CpuUsage,
        DataKey::MemoryUsage,
        DataKey::Battery,
        DataKey::PythonVersion,
        DataKey::PythonVenv,
        DataKey::Datetime,
        DataKey::CostPerHour,
        DataKey::TokensPerMinute,
    ];

    /// The stable snake_case name used in configuration and input documents.
    pub fn as_str(self) -> &'static str {
        match self {
            DataKey::Model => "model",
            DataKey::Version => "version",
            DataKey::ContextRemaining => "context_remaining",
            DataKey::Tokens => "tokens",
            DataKey::CurrentDir => "current_dir",
            DataKey::GitBranch => "git_branch",
            DataKey::Cost => "cost",
            DataKey::Duration => "duration",
            DataKey::LinesChanged => "lines_changed",
            DataKey::OutputStyle => "output_style",
            DataKey::CpuUsage => "cpu_usage",
            DataKey::MemoryUsage => "memory_usage",
            DataKey::Battery => "battery",
            DataKey::PythonVersion => "python_version",
            DataKey::PythonVenv => "python_venv",
            DataKey::Datetime => "datetime",
            DataKey::CostPerHour => "cost_per_hour",
            DataKey::TokensPerMinute => "tokens_per_minute",
        }
    }

    pub fn from_name(name: &str) -> Option<DataKey> {
        DataKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw extracted value. Absence is modelled by the key not being present.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view. Floats are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            FieldValue::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

/// Immutable-for-the-call mapping produced once per invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedData {
    values: BTreeMap<DataKey, FieldValue>,
}

impl ExtractedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: DataKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: DataKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn insert(&mut self, key: DataKey, value: impl Into<FieldValue>) {
        self.values.insert(key, value.into());
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, key: DataKey, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = DataKey> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in DataKey::ALL {
            assert_eq!(DataKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(DataKey::from_name("nope"), None);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(FieldValue::Float(2.9).as_i64(), Some(2));
        assert_eq!(FieldValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::from("42").as_i64(), Some(42));
        assert_eq!(FieldValue::from("abc").as_f64(), None);
        assert_eq!(FieldValue::Float(f64::NAN).as_i64(), None);
    }

    #[test]
    fn test_builder_inserts() {
        let data = ExtractedData::new()
            .with(DataKey::Model, "m1")
            .with(DataKey::Tokens, 1000_i64);
        assert_eq!(data.len(), 2);
        assert_eq!(data.get(DataKey::Model), Some(&FieldValue::from("m1")));
        assert!(!data.contains(DataKey::Cost));
    }
}
