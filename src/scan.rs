// src/scan.rs

use anyhow::{
    Context,
    Result
};
use std::{
    fs,
    path::{
        Path,
        PathBuf
    },
};
use walkdir::WalkDir;


/// A source file picked up by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Relative to the walk root, forward slashes.
    pub rel_path: String,
}

/// Recursively collect files under `root` whose extension is in `extensions`
/// (case-insensitive, without the dot). Deterministic: sorted by file name per dir.
pub fn walk_sources(root: &Path, extensions: &[String]) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        anyhow::bail!("source root {} is not a directory", root.display());
    }

    let mut out = Vec::new();
    for dent in WalkDir::new(root).sort_by_file_name() {
        let dent = dent.with_context(|| format!("walking {}", root.display()))?;
        if !dent.file_type().is_file() {
            continue;
        }
        let path = dent.path();
        if !has_extension(path, extensions) {
            continue;
        }
        out.push(SourceFile {
            path: path.to_path_buf(),
            rel_path: normalize_rel(root, path),
        });
    }
    Ok(out)
}

/// Whole file as lines split on `\n`. A trailing newline yields a final empty line.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    Ok(text.split('\n').map(str::to_string).collect())
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/* ----------------------------- helpers ----------------------------- */

fn normalize_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
