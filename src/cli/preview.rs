use anyhow::{Context, Result};
use clap::Args as ClapArgs;

use cc_statusline::config::ConfigStore;
use cc_statusline::data::{DataKey, ExtractedData};
use cc_statusline::fields::FieldRegistry;
use cc_statusline::format::Formatter;

use super::Display;

#[derive(ClapArgs)]
pub struct Args {
    /// Render only this field
    pub field: Option<String>,
}

/// Representative values for every key, so each field has something to show.
pub fn sample_data() -> ExtractedData {
    ExtractedData::new()
        .with(DataKey::Model, "claude-sonnet-4")
        .with(DataKey::Version, "1.0.85")
        .with(DataKey::ContextRemaining, 72_i64)
        .with(DataKey::Tokens, 48_250_i64)
        .with(DataKey::CurrentDir, "my-project")
        .with(DataKey::GitBranch, "main")
        .with(DataKey::Cost, 1.27)
        .with(DataKey::Duration, 1_530_000_i64)
        .with(DataKey::LinesChanged, 214_i64)
        .with(DataKey::OutputStyle, "default")
        .with(DataKey::CpuUsage, "23%")
        .with(DataKey::MemoryUsage, "6.4GB")
        .with(DataKey::Battery, "81%")
        .with(DataKey::PythonVersion, "3.12.4")
        .with(DataKey::PythonVenv, ".venv")
        .with(DataKey::Datetime, "2025-01-01 12:00:00")
        .with(DataKey::CostPerHour, 2.99)
        .with(DataKey::TokensPerMinute, 1_892_i64)
}

pub fn run(args: Args, display: Display) -> Result<()> {
    let mut store = ConfigStore::discover().context("failed to locate config file")?;
    let config = store.load().clone();
    let colors = display.colors(&config);
    let verbose = display.verbose(&config);
    let data = sample_data();

    let out = match args.field {
        Some(name) => FieldRegistry::builtin()
            .resolve(&name)?
            .render(&data, &config, verbose, &colors),
        None => Formatter::new(colors).format(&data, &config, verbose),
    };
    println!("{}", out);
    Ok(())
}
