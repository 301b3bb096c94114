use crate::data::DataKey;
use crate::error::{Result, StatuslineError};

use super::{FieldDef, Line, MetricFormat, Rate, RateFormat, RenderKind};

const fn simple(
    key: DataKey,
    icon_key: &'static str,
    color_key: &'static str,
    line: Line,
    label: &'static str,
) -> FieldDef {
    FieldDef {
        key,
        icon_key,
        color_key,
        line,
        label,
        kind: RenderKind::Simple,
    }
}

/// Every field, in canonical order.
pub static FIELDS: [FieldDef; 16] = [
    simple(DataKey::Model, "model", "model", Line::Identity, "Model:"),
    simple(DataKey::Version, "version", "version", Line::Identity, "Version:"),
    FieldDef {
        key: DataKey::ContextRemaining,
        icon_key: "context",
        color_key: "context_remaining",
        line: Line::Status,
        label: "Context remaining:",
        kind: RenderKind::Percentage,
    },
    FieldDef {
        key: DataKey::Tokens,
        icon_key: "tokens",
        color_key: "tokens",
        line: Line::Metrics,
        label: "Tokens:",
        kind: RenderKind::Metric {
            format: MetricFormat::Count("tok"),
            rate: Some(Rate {
                key: DataKey::TokensPerMinute,
                format: RateFormat::TokensPerMinute,
            }),
        },
    },
    simple(DataKey::CurrentDir, "directory", "current_dir", Line::Identity, "Directory:"),
    simple(DataKey::GitBranch, "git_branch", "git_branch", Line::Identity, "Git branch:"),
    FieldDef {
        key: DataKey::Cost,
        icon_key: "cost",
        color_key: "cost",
        line: Line::Metrics,
        label: "Cost:",
        kind: RenderKind::Metric {
            format: MetricFormat::Currency,
            rate: Some(Rate {
                key: DataKey::CostPerHour,
                format: RateFormat::CurrencyPerHour,
            }),
        },
    },
    FieldDef {
        key: DataKey::Duration,
        icon_key: "duration",
        color_key: "duration",
        line: Line::Status,
        label: "Duration:",
        kind: RenderKind::Duration,
    },
    // Shares the tokens icon by default.
    FieldDef {
        key: DataKey::LinesChanged,
        icon_key: "tokens",
        color_key: "lines_changed",
        line: Line::Metrics,
        label: "Lines changed:",
        kind: RenderKind::Metric {
            format: MetricFormat::Count("lines"),
            rate: None,
        },
    },
    simple(DataKey::OutputStyle, "style", "output_style", Line::Identity, "Style:"),
    simple(DataKey::CpuUsage, "cpu", "cpu_usage", Line::Metrics, "CPU:"),
    simple(DataKey::MemoryUsage, "memory", "memory_usage", Line::Metrics, "Memory:"),
    simple(DataKey::Battery, "battery", "battery", Line::Metrics, "Battery:"),
    simple(DataKey::PythonVersion, "python", "python_version", Line::Identity, "Python:"),
    simple(DataKey::PythonVenv, "python", "python_venv", Line::Metrics, "Venv:"),
    simple(DataKey::Datetime, "datetime", "datetime", Line::Identity, "Time:"),
];

/// Lookup over the static catalogue.
#[derive(Debug, Clone, Copy)]
pub struct FieldRegistry {
    fields: &'static [FieldDef],
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldRegistry {
    pub const fn builtin() -> Self {
        Self { fields: &FIELDS }
    }

    pub fn get(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Like [`get`](Self::get), but a miss is an error naming the field.
    /// For callers resolving a single field outside the formatting loop.
    pub fn resolve(&self, name: &str) -> Result<&'static FieldDef> {
        self.get(name).ok_or_else(|| StatuslineError::FieldNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static FieldDef> {
        self.fields.iter()
    }

    /// Field names in canonical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(FieldDef::name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
