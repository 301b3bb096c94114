//! Multi-line statusline renderer for a coding-assistant host.
//!
//! The host pipes a JSON session snapshot on stdin; the pipeline extracts a
//! flat data map from it, renders every visible field through its strategy,
//! and groups the fragments into up to three lines.

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod extract;
pub mod fields;
pub mod format;

use color::ColorService;
use config::Config;
use error::Result;
use extract::Collectors;

/// Parse, extract and format one snapshot.
pub fn render(
    input: &str,
    config: &Config,
    verbose: bool,
    colors: ColorService,
    collectors: &dyn Collectors,
) -> Result<String> {
    let session = extract::parse_input(input)?;
    let data = extract::extract(&session, config, collectors);
    Ok(format::format_statusline(&data, config, verbose, colors))
}
