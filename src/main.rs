mod cli;

use clap::Parser;

use cli::{output, Cli, Command, Display};

fn main() {
    cli::init_tracing();

    let cli = Cli::parse();
    let display = Display::from_cli(&cli);

    let result = match cli.command {
        None => cli::render::run(display),
        Some(Command::Config(args)) => cli::config::run(args),
        Some(Command::Preview(args)) => cli::preview::run(args, display),
    };

    if let Err(e) = result {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
