// src/packet.rs
//! Extraction records: one documentation comment plus the declaration it annotates.
//!
//! - `Packet` is what the scanner emits: trimmed lines, comment first, then any
//!   annotation macros, the declaration, and the lines that continue it.
//! - `ExtractedUnit` is a packet tagged with its symbol name and source path; this is
//!   the JSONL unit printed by `docgen extract`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comment lines followed by exactly one declaration line (plus its continuation).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Packet {
    pub lines: Vec<String>,
    /// Index into `lines` of the declaration
    #[serde(default)]
    pub decl: usize,
    /// 1-based line of the declaration within the scanned input
    pub line: usize,
}

impl Packet {
    /// Packet whose last line is the declaration.
    pub fn new(lines: Vec<String>, line: usize) -> Self {
        let decl = lines.len().saturating_sub(1);
        Self { lines, decl, line }
    }

    pub fn with_declaration(lines: Vec<String>, decl: usize, line: usize) -> Self {
        Self { lines, decl, line }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The annotated code line.
    pub fn declaration(&self) -> Option<&str> {
        self.lines.get(self.decl).map(String::as_str)
    }

    /// Everything before the declaration.
    pub fn comments(&self) -> &[String] {
        &self.lines[..self.decl.min(self.lines.len())]
    }

    /// Lines joined with `\n`, the form fed into prompts.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// A packet with its resolved symbol name and origin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtractedUnit {
    pub name: String,
    pub path: String,
    pub line: usize,
    pub lines: Vec<String>,
}

impl ExtractedUnit {
    pub fn from_packet(name: impl Into<String>, path: impl Into<String>, packet: &Packet) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            line: packet.line,
            lines: packet.lines.clone(),
        }
    }

    /// Stable-ish key for logs: `path:line:name`.
    pub fn stable_id(&self) -> String {
        format!("{}:{}:{}", self.path, self.line, self.name)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/* ================================== Tests ================================== */
