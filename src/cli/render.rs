use std::io::Read;

use anyhow::{Context, Result};

use cc_statusline::config::ConfigStore;
use cc_statusline::extract::SystemCollectors;

use super::Display;

/// Read the session snapshot from stdin and print the statusline.
///
/// A missing or broken config never aborts the render; a broken snapshot
/// does, with a non-zero exit.
pub fn run(display: Display) -> Result<()> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read session JSON from stdin")?;

    let mut store = ConfigStore::discover().context("failed to locate config file")?;
    let config = store.load().clone();

    let colors = display.colors(&config);
    let verbose = display.verbose(&config);
    let collectors = SystemCollectors::new(colors);

    let line = cc_statusline::render(&input, &config, verbose, colors, &collectors)?;
    if !line.is_empty() {
        println!("{}", line);
    }
    Ok(())
}
