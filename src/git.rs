// src/git.rs
//! Commit dates from the local git history, for commit-dated copyright notices.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Datelike, FixedOffset};
use std::{path::Path, process::Command};

/// Year of the last commit touching `path`.
///
/// # Errors
/// Returns error if git can't be run or exits non-zero.
/// `Ok(None)` for files with no history (new or untracked).
pub fn last_commit_year(path: &Path) -> Result<Option<i32>> {
    let output = Command::new("git")
        .args(["log", "-1", "--format=%cI", "--"])
        .arg(path)
        .output()
        .context("Failed to run git log")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git log failed for {}: {}", path.display(), stderr.trim());
    }

    parse_commit_year(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `%cI` (strict ISO 8601) output. Empty output means no commit.
pub fn parse_commit_year(raw: &str) -> Result<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let dt: DateTime<FixedOffset> = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("unexpected commit date {raw:?}"))?;
    Ok(Some(dt.year()))
}
