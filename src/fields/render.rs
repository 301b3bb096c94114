use crate::color::ColorService;
use crate::config::{Config, COLOR_KEY_BAR_EMPTY, COLOR_KEY_BAR_FILLED, COLOR_KEY_SEPARATOR};
use crate::data::{ExtractedData, FieldValue};

use super::{FieldDef, MetricFormat, RateFormat, RenderKind};

pub const BAR_FILLED: char = '=';
pub const BAR_EMPTY: char = '-';

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MINUTES_PER_HOUR: i64 = 60;

impl FieldDef {
    /// Icon and colorized value. Empty when the field has no data.
    pub fn render_compact(
        &self,
        data: &ExtractedData,
        config: &Config,
        colors: &ColorService,
    ) -> String {
        self.render(data, config, false, colors)
    }

    /// Icon, colorized label and colorized value. Empty when the field has no data.
    pub fn render_verbose(
        &self,
        data: &ExtractedData,
        config: &Config,
        colors: &ColorService,
    ) -> String {
        self.render(data, config, true, colors)
    }

    pub fn render(
        &self,
        data: &ExtractedData,
        config: &Config,
        verbose: bool,
        colors: &ColorService,
    ) -> String {
        let Some(value) = self.value_text(data) else {
            return String::new();
        };

        let mut out = self.compose(&value, config, verbose, colors);

        if self.kind == RenderKind::Percentage {
            let percent = data.get(self.key).and_then(FieldValue::as_i64).unwrap_or(0);
            if let Some(bar) = progress_bar(percent, config, colors) {
                out.push(' ');
                out.push_str(&bar);
            }
        }

        out
    }

    /// The plain display value, before icons, labels or color.
    pub fn value_text(&self, data: &ExtractedData) -> Option<String> {
        let value = data.get(self.key)?;
        match self.kind {
            RenderKind::Simple => {
                let text = value.to_string();
                (!text.is_empty()).then_some(text)
            }
            RenderKind::Percentage => value.as_i64().map(|p| format!("{}%", p)),
            RenderKind::Duration => value.as_i64().map(humanize_duration),
            RenderKind::Metric { format, rate } => {
                let mut text = format_metric(value, format)?;
                if let Some(rate) = rate {
                    if let Some(rate_text) = data.get(rate.key).and_then(|v| format_rate(v, rate.format)) {
                        text.push(' ');
                        text.push_str(&rate_text);
                    }
                }
                Some(text)
            }
        }
    }

    fn compose(&self, value: &str, config: &Config, verbose: bool, colors: &ColorService) -> String {
        let value = colors.colorize(value, config.color(self.color_key));
        let body = if verbose {
            let label = colors.colorize(self.label, config.color(COLOR_KEY_SEPARATOR));
            format!("{} {}", label, value)
        } else {
            value
        };

        let icon = config.icon(self.icon_key);
        if icon.is_empty() {
            body
        } else {
            format!("{} {}", icon, body)
        }
    }
}

fn format_metric(value: &FieldValue, format: MetricFormat) -> Option<String> {
    match format {
        MetricFormat::Currency => value.as_f64().map(|v| format!("${:.2}", v)),
        MetricFormat::Count(unit) => value.as_i64().map(|v| format!("{} {}", v, unit)),
    }
}

fn format_rate(value: &FieldValue, format: RateFormat) -> Option<String> {
    match format {
        RateFormat::CurrencyPerHour => value.as_f64().map(|v| format!("(${:.2}/h)", v)),
        RateFormat::TokensPerMinute => value.as_i64().map(|v| format!("({} tpm)", v)),
    }
}

/// Humanize a millisecond count. Branches are evaluated in order, so
/// `59_999` renders as `60.0s` rather than `1m`.
pub fn humanize_duration(ms: i64) -> String {
    if ms < MS_PER_SECOND {
        return format!("{}ms", ms);
    }

    let seconds = ms as f64 / MS_PER_SECOND as f64;
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }

    let minutes = ms / MS_PER_MINUTE;
    let hours = minutes / MINUTES_PER_HOUR;
    if hours > 0 {
        format!("{}h {}m", hours, minutes % MINUTES_PER_HOUR)
    } else {
        format!("{}m", minutes)
    }
}

/// Bracketed bar of `progress_bar_width` glyphs, or `None` when bars are off.
/// Percent is clamped to 0..=100 for the bar only.
pub fn progress_bar(percent: i64, config: &Config, colors: &ColorService) -> Option<String> {
    if !config.show_progress_bars {
        return None;
    }

    let width = config.progress_bar_width as usize;
    let percent = percent.clamp(0, 100) as usize;
    let filled = percent * width / 100;
    let empty = width - filled;

    let bracket = config.color(COLOR_KEY_SEPARATOR);
    Some(format!(
        "{}{}{}{}",
        colors.colorize("[", bracket),
        colors.colorize(
            &BAR_FILLED.to_string().repeat(filled),
            config.color(COLOR_KEY_BAR_FILLED)
        ),
        colors.colorize(
            &BAR_EMPTY.to_string().repeat(empty),
            config.color(COLOR_KEY_BAR_EMPTY)
        ),
        colors.colorize("]", bracket),
    ))
}
