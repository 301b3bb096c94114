//! Field catalogue and render strategies.
//!
//! A field is one independently visible, orderable unit of the statusline.
//! The set of fields and the set of render strategies are both closed: the
//! catalogue is a `static` table and strategies are an exhaustively matched
//! enum.

mod registry;
mod render;

pub use registry::{FieldRegistry, FIELDS};
pub use render::{humanize_duration, progress_bar, BAR_EMPTY, BAR_FILLED};

use crate::data::DataKey;

/// Display line a field is bucketed into. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Line {
    Identity,
    Status,
    Metrics,
}

impl Line {
    pub const ALL: [Line; 3] = [Line::Identity, Line::Status, Line::Metrics];

    pub fn index(self) -> usize {
        match self {
            Line::Identity => 0,
            Line::Status => 1,
            Line::Metrics => 2,
        }
    }
}

/// How a metric's primary value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricFormat {
    /// `$1.50`
    Currency,
    /// Integer followed by a unit, e.g. `1000 tok`.
    Count(&'static str),
}

/// How a metric's companion rate is printed, inside parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateFormat {
    /// `($3.00/h)`
    CurrencyPerHour,
    /// `(2500 tpm)`
    TokensPerMinute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    pub key: DataKey,
    pub format: RateFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Value used as-is.
    Simple,
    /// Integer percent with a bracketed progress bar.
    Percentage,
    /// Milliseconds humanized to `ms`/`s`/`m`/`h m`.
    Duration,
    /// Formatted primary value with an optional companion rate.
    Metric {
        format: MetricFormat,
        rate: Option<Rate>,
    },
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub key: DataKey,
    pub icon_key: &'static str,
    pub color_key: &'static str,
    pub line: Line,
    pub label: &'static str,
    pub kind: RenderKind,
}

impl FieldDef {
    pub fn name(&self) -> &'static str {
        self.key.as_str()
    }
}
