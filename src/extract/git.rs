//! Git branch, working-tree and pull-request collectors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::color::{Color, ColorService};

use super::command::{first_line, run_with_timeout};

const GIT_TIMEOUT: Duration = Duration::from_millis(500);
const GH_TIMEOUT: Duration = Duration::from_secs(2);
const HEAD_REF_PREFIX: &str = "ref: refs/heads/";
const DETACHED_HASH_LEN: usize = 7;

/// Current branch, or the short hash when HEAD is detached.
///
/// Reads `.git/HEAD` directly (following a `gitdir:` pointer for worktrees)
/// and falls back to `git rev-parse` for anything else, e.g. a subdirectory.
pub fn branch(cwd: &Path) -> Option<String> {
    read_head(cwd).or_else(|| {
        run_with_timeout(
            "git",
            &["rev-parse", "--abbrev-ref", "HEAD"],
            Some(cwd),
            GIT_TIMEOUT,
        )
        .and_then(|out| first_line(&out))
    })
}

fn read_head(cwd: &Path) -> Option<String> {
    let mut git_dir = cwd.join(".git");
    if git_dir.is_file() {
        let pointer = std::fs::read_to_string(&git_dir).ok()?;
        let target = PathBuf::from(pointer.trim().strip_prefix("gitdir: ")?);
        git_dir = if target.is_absolute() {
            target
        } else {
            cwd.join(target)
        };
    }
    let head = std::fs::read_to_string(git_dir.join("HEAD")).ok()?;
    parse_head(&head)
}

pub fn parse_head(contents: &str) -> Option<String> {
    let contents = contents.trim();
    if contents.is_empty() {
        return None;
    }
    match contents.strip_prefix(HEAD_REF_PREFIX) {
        Some(branch) => Some(branch.to_string()),
        None => Some(contents.chars().take(DETACHED_HASH_LEN).collect()),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStatus {
    pub ahead: u32,
    pub behind: u32,
    pub dirty: bool,
}

/// Parse `git status --porcelain=v1 --branch`.
pub fn parse_status(output: &str) -> TreeStatus {
    let mut status = TreeStatus::default();
    for line in output.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            if let Some((_, tracking)) = header.split_once(" [") {
                for part in tracking.trim_end_matches(']').split(", ") {
                    if let Some(n) = part.strip_prefix("ahead ") {
                        status.ahead = n.trim().parse().unwrap_or(0);
                    } else if let Some(n) = part.strip_prefix("behind ") {
                        status.behind = n.trim().parse().unwrap_or(0);
                    }
                }
            }
        } else if !line.trim().is_empty() {
            status.dirty = true;
        }
    }
    status
}

/// `↑N` green, `↓N` red, `●` yellow; `None` when clean and in sync.
pub fn render_status(status: TreeStatus, colors: &ColorService) -> Option<String> {
    let mut out = String::new();
    if status.ahead > 0 {
        out.push_str(&colors.colorize(&format!("↑{}", status.ahead), Color::Green));
    }
    if status.behind > 0 {
        out.push_str(&colors.colorize(&format!("↓{}", status.behind), Color::Red));
    }
    if status.dirty {
        out.push_str(&colors.colorize("●", Color::Yellow));
    }
    (!out.is_empty()).then_some(out)
}

pub fn status(cwd: &Path, colors: &ColorService) -> Option<String> {
    let output = run_with_timeout(
        "git",
        &["status", "--porcelain=v1", "--branch"],
        Some(cwd),
        GIT_TIMEOUT,
    )?;
    render_status(parse_status(&output), colors)
}

#[derive(Debug, Deserialize)]
struct PullRequest {
    number: u64,
    state: String,
}

pub fn parse_pr(json: &str) -> Option<String> {
    let pr: PullRequest = serde_json::from_str(json).ok()?;
    Some(format!("#{} {}", pr.number, pr.state.to_lowercase()))
}

/// Pull request for the current branch via `gh`, when it is installed.
pub fn pr_status(cwd: &Path) -> Option<String> {
    if which::which("gh").is_err() {
        return None;
    }
    let out = run_with_timeout(
        "gh",
        &["pr", "view", "--json", "number,state"],
        Some(cwd),
        GH_TIMEOUT,
    )?;
    parse_pr(&out)
}
