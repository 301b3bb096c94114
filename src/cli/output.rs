//! Human-facing messages for the config commands. Always stderr, so stdout
//! stays reserved for the statusline and `config show`/`path` data.

use colored::{ColoredString, Colorize};

fn emit(prefix: ColoredString, msg: &str) {
    eprintln!("{} {}", prefix, msg);
}

/// Print a success message to stderr with a green checkmark prefix.
pub fn success(msg: &str) {
    emit("✓".green(), msg);
}

/// Print a warning message to stderr with a yellow warning prefix.
pub fn warning(msg: &str) {
    emit("⚠".yellow(), msg);
}

/// Print an error message to stderr with a red cross prefix.
pub fn error(msg: &str) {
    emit("✗".red(), msg);
}

/// Print an informational message to stderr with a blue info prefix.
pub fn info(msg: &str) {
    emit("ℹ".blue(), msg);
}

/// Print a bold header/section title to stderr.
pub fn header(msg: &str) {
    eprintln!("{}", msg.bold());
}
