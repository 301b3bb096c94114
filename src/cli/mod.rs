pub mod config;
pub mod output;
pub mod preview;
pub mod render;

use clap::{Parser, Subcommand};

use cc_statusline::color::{ColorChoice, ColorService};
use cc_statusline::config::Config;

/// Multi-line statusline for Claude Code sessions
///
/// With no subcommand, reads the session JSON on stdin and prints the
/// statusline on stdout.
#[derive(Parser)]
#[command(name = "cc-statusline", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// When to emit ANSI colors
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    pub color: ColorChoice,

    /// Force verbose (labelled) output for this call
    #[arg(long, conflicts_with = "compact", global = true)]
    pub verbose: bool,

    /// Force compact output for this call
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect or edit the configuration file
    Config(config::Args),

    /// Render sample data with the current configuration
    Preview(preview::Args),
}

/// Per-call display options shared by the rendering commands.
#[derive(Debug, Clone, Copy)]
pub struct Display {
    pub color: ColorChoice,
    pub verbose: Option<bool>,
}

impl Display {
    pub fn from_cli(cli: &Cli) -> Self {
        let verbose = match (cli.verbose, cli.compact) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Self {
            color: cli.color,
            verbose,
        }
    }

    /// An explicit `--color` wins, then `enable_colors`, then `NO_COLOR`.
    pub fn colors(&self, config: &Config) -> ColorService {
        match self.color {
            ColorChoice::Auto if !config.enable_colors => ColorService::plain(),
            choice => ColorService::new(choice),
        }
    }

    pub fn verbose(&self, config: &Config) -> bool {
        self.verbose.unwrap_or_else(|| config.is_verbose())
    }
}

/// Initialize tracing to stderr from `LOG_LEVEL` (default `warn`).
pub fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let filter = match log_level.to_lowercase().as_str() {
        "off" => "off",
        "error" => "error",
        "warn" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        other => {
            eprintln!(
                "warning: unknown log level '{}', defaulting to 'warn'",
                other
            );
            "warn"
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
