//! Subprocess helpers shared by the collectors.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use wait_timeout::ChildExt;

/// Run `program args...` and return its stdout, or `None` if it cannot be
/// spawned, exits non-zero, or is still running after `timeout` (in which case
/// it is killed).
pub fn run_with_timeout(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null());
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().ok()?;

    // Drain stdout on a separate thread so a chatty child cannot block on a
    // full pipe while we wait for exit.
    let mut stdout = child.stdout.take()?;
    let reader = std::thread::spawn(move || {
        let mut buf = String::new();
        stdout.read_to_string(&mut buf).ok().map(|_| buf)
    });

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            tracing::debug!(program, ?timeout, "command timed out");
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "failed waiting on command");
            return None;
        }
    };

    if !status.success() {
        return None;
    }
    reader.join().ok().flatten()
}

/// First non-empty trimmed line of `text`.
pub fn first_line(text: &str) -> Option<String> {
    let line = text.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// `<cmd> --version`, first line of stdout.
pub fn command_version(cmd: &str, timeout: Duration) -> Option<String> {
    run_with_timeout(cmd, &["--version"], None, timeout).and_then(|out| first_line(&out))
}
