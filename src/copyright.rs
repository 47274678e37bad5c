// src/copyright.rs
//! Copyright header maintenance.
//!
//! Rules for the first line of each file:
//! - not a `//` comment                  -> prepend our notice
//! - third-party notice (Epic)           -> prepend ours, keep theirs below
//! - engine template placeholder         -> replace it
//! - `// StartCopyrightNotice` block     -> rewrite the line inside the block
//! - older `// Copyright ...` of ours    -> replace it
//!
//! Files emitted by the header tool are skipped.

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use std::{fs, path::Path};

use crate::{config::CopyrightConfig, git, scan};

const BOM: char = '\u{feff}';
const START_BLOCK: &str = "// StartCopyrightNotice";

/// Result of rewriting one file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Tool-generated file; leave untouched.
    Generated,
    Updated(String),
}

/// Notice lines for `year`, already commented.
pub fn notice(year: i32, template: &str) -> Vec<String> {
    vec![format!("// {}", template.replace("{year}", &year.to_string()))]
}

pub fn rewrite(text: &str, notice: &[String], cfg: &CopyrightConfig) -> Rewrite {
    let (bom, body) = match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();

    if !cfg.generated_marker.is_empty()
        && lines.iter().take(cfg.generated_scan_lines).any(|l| l.contains(cfg.generated_marker.as_str()))
    {
        return Rewrite::Generated;
    }

    let eol_cr = body.contains("\r\n");
    let notice: Vec<String> = notice
        .iter()
        .map(|l| if eol_cr { format!("{l}\r") } else { l.clone() })
        .collect();

    // split() always yields at least one element
    let first = lines[0].trim_end_matches('\r').to_string();

    if !first.starts_with("//") || cfg.preserved.iter().any(|p| first.contains(p.as_str())) {
        lines.splice(0..0, notice);
    } else if cfg.placeholders.iter().any(|p| first.contains(p.as_str())) {
        lines.splice(0..1, notice);
    } else if first.starts_with(START_BLOCK) {
        if lines.len() > 1 {
            lines.splice(1..2, notice);
        } else {
            lines.extend(notice);
        }
    } else if first.starts_with("// Copyright") {
        lines.splice(0..1, notice);
    }

    let mut out = lines.join("\n");
    if bom {
        out.insert(0, BOM);
    }
    Rewrite::Updated(out)
}

/* =============================== Year selection =============================== */

/// Which year goes into the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPolicy {
    Fixed(i32),
    /// Year of each file's last commit; `first_publish` is a floor.
    Commit { fallback: i32, first_publish: Option<i32> },
}

impl YearPolicy {
    pub fn current() -> Self {
        YearPolicy::Fixed(Local::now().year())
    }

    pub fn commit(first_publish: Option<i32>) -> Self {
        YearPolicy::Commit { fallback: Local::now().year(), first_publish }
    }

    /// Pure selection given the commit year lookup result.
    pub fn resolve(&self, commit_year: Option<i32>) -> i32 {
        match *self {
            YearPolicy::Fixed(y) => y,
            YearPolicy::Commit { fallback, first_publish } => {
                let committed = commit_year.unwrap_or(fallback);
                match first_publish {
                    Some(floor) => committed.max(floor),
                    None => committed,
                }
            }
        }
    }

    pub fn year_for(&self, path: &Path) -> Result<i32> {
        match self {
            YearPolicy::Fixed(y) => Ok(*y),
            YearPolicy::Commit { .. } => {
                let committed = git::last_commit_year(path)?;
                log::debug!("[copyright] {} last committed {:?}", path.display(), committed);
                Ok(self.resolve(committed))
            }
        }
    }
}

/* ================================ Tree update ================================ */

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub updated: usize,
    pub unchanged: usize,
    pub generated: usize,
}

/// Rewrite headers of every matching file under `root`. Only changed files are written.
pub fn update_tree<F>(root: &Path, cfg: &CopyrightConfig, mut year_for: F) -> Result<Summary>
where
    F: FnMut(&Path) -> Result<i32>,
{
    let mut summary = Summary::default();

    for file in scan::walk_sources(root, &cfg.extensions)? {
        let year = year_for(&file.path)
            .with_context(|| format!("choosing notice year for {}", file.rel_path))?;
        let lines = notice(year, &cfg.template);

        let text = fs::read_to_string(&file.path)
            .with_context(|| format!("read {}", file.path.display()))?;

        match rewrite(&text, &lines, cfg) {
            Rewrite::Generated => {
                log::debug!("[copyright] skipping generated {}", file.rel_path);
                summary.generated += 1;
            }
            Rewrite::Updated(new_text) if new_text == text => {
                summary.unchanged += 1;
            }
            Rewrite::Updated(new_text) => {
                log::info!("Updating file: {}", file.rel_path);
                fs::write(&file.path, new_text)
                    .with_context(|| format!("write {}", file.path.display()))?;
                summary.updated += 1;
            }
        }
    }

    Ok(summary)
}

/* ===================================== Tests ===================================== */
