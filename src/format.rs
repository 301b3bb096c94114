//! Statusline formatter: renders the configured fields and lays them out on
//! up to three lines.

use crate::color::ColorService;
use crate::config::{Config, COLOR_KEY_SEPARATOR};
use crate::data::ExtractedData;
use crate::fields::{FieldRegistry, Line};

/// Gap between fields on the same line.
pub const FIELD_SEPARATOR: &str = "  ";

#[derive(Debug, Clone, Copy)]
pub struct Formatter {
    registry: FieldRegistry,
    colors: ColorService,
}

impl Formatter {
    pub fn new(colors: ColorService) -> Self {
        Self::with_registry(FieldRegistry::builtin(), colors)
    }

    pub fn with_registry(registry: FieldRegistry, colors: ColorService) -> Self {
        Self { registry, colors }
    }

    /// Rendered fields bucketed by line, in `field_order` within each bucket.
    ///
    /// Hidden fields, names missing from the registry and fields with no data
    /// are skipped.
    pub fn buckets(&self, data: &ExtractedData, config: &Config, verbose: bool) -> [Vec<String>; 3] {
        let mut buckets: [Vec<String>; 3] = Default::default();

        for name in &config.field_order {
            if !config.is_visible(name) {
                continue;
            }
            let Some(field) = self.registry.get(name) else {
                tracing::debug!(field = %name, "skipping unknown field");
                continue;
            };

            let rendered = field.render(data, config, verbose, &self.colors);
            if rendered.is_empty() {
                continue;
            }
            buckets[field.line.index()].push(rendered);
        }

        buckets
    }

    /// Identity, Status and Metrics lines joined by newlines. Empty lines are
    /// omitted, so the result has between zero and three lines.
    pub fn format(&self, data: &ExtractedData, config: &Config, verbose: bool) -> String {
        let separator = self
            .colors
            .colorize(FIELD_SEPARATOR, config.color(COLOR_KEY_SEPARATOR));

        let buckets = self.buckets(data, config, verbose);
        Line::ALL
            .iter()
            .map(|line| &buckets[line.index()])
            .filter(|fields| !fields.is_empty())
            .map(|fields| fields.join(&separator))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One-shot convenience over [`Formatter::format`].
pub fn format_statusline(
    data: &ExtractedData,
    config: &Config,
    verbose: bool,
    colors: ColorService,
) -> String {
    Formatter::new(colors).format(data, config, verbose)
}
