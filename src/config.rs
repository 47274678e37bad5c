// src/config.rs
//! `docgen.toml`: every field optional, every section defaulted.
//!
//! ```toml
//! root = "Source"
//!
//! [extract]
//! extensions = ["h"]
//! banned_prefixes = ["UCLASS", "class"]
//! annotation_prefixes = ["UFUNCTION", "UPROPERTY"]
//!
//! [model]
//! endpoint = "http://127.0.0.1:8080/v1/completions"
//! description_tokens = 256
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{extract::ScanRules, model::CompletionConfig, prompt};

pub const DEFAULT_CONFIG_FILE: &str = "docgen.toml";

#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory walked by every command.
    pub root: PathBuf,
    pub extract: ExtractConfig,
    pub model: ModelConfig,
    pub copyright: CopyrightConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Source"),
            extract: ExtractConfig::default(),
            model: ModelConfig::default(),
            copyright: CopyrightConfig::default(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub extensions: Vec<String>,
    pub banned_prefixes: Vec<String>,
    pub annotation_prefixes: Vec<String>,
    pub terminators: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        let rules = ScanRules::default();
        Self {
            extensions: vec!["h".into()],
            banned_prefixes: rules.banned_prefixes,
            annotation_prefixes: rules.annotation_prefixes,
            terminators: rules.terminators,
        }
    }
}

impl ExtractConfig {
    pub fn scan_rules(&self) -> ScanRules {
        ScanRules {
            banned_prefixes: self.banned_prefixes.clone(),
            annotation_prefixes: self.annotation_prefixes.clone(),
            terminators: self.terminators.clone(),
            ..ScanRules::default()
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub endpoint: String,
    /// Sent as `model` when set; single-model local servers ignore it.
    pub model: Option<String>,
    pub param_tokens: u32,
    pub return_tokens: u32,
    pub description_tokens: u32,
    pub stop: Vec<String>,
    /// `None` waits forever.
    pub timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/v1/completions".into(),
            model: None,
            param_tokens: 128,
            return_tokens: 128,
            description_tokens: 256,
            stop: vec![prompt::INSTRUCTION.into()],
            timeout_secs: None,
            temperature: None,
        }
    }
}

impl ModelConfig {
    pub fn params(&self) -> CompletionConfig {
        self.completion(self.param_tokens)
    }

    pub fn returns(&self) -> CompletionConfig {
        self.completion(self.return_tokens)
    }

    pub fn description(&self) -> CompletionConfig {
        self.completion(self.description_tokens)
    }

    fn completion(&self, max_tokens: u32) -> CompletionConfig {
        CompletionConfig { max_tokens, stop: self.stop.clone() }
    }
}

#[derive(Deserialize, Clone, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct CopyrightConfig {
    pub extensions: Vec<String>,
    /// `{year}` is substituted.
    pub template: String,
    /// Files with this text near the top are tool output and left alone.
    pub generated_marker: String,
    pub generated_scan_lines: usize,
    /// First-line texts meaning "replace me".
    pub placeholders: Vec<String>,
    /// First-line texts of third-party notices kept below ours.
    pub preserved: Vec<String>,
}

impl Default for CopyrightConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["h".into(), "cpp".into(), "cs".into()],
            template: "Copyright Acinonyx Ltd. {year}. All Rights Reserved.".into(),
            generated_marker: "Generated code exported from UnrealHeaderTool".into(),
            generated_scan_lines: 10,
            placeholders: vec![
                "Fill out your copyright notice in the Description page of Project Settings".into(),
                "[TEMPLATE_COPYRIGHT]".into(),
            ],
            preserved: vec!["Copyright Epic Games".into()],
        }
    }
}

impl Config {
    /// Load `explicit` if given (must exist), else `./docgen.toml` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("[config] no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                p
            }
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_toml(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        log::debug!("[config] loaded {}", path.display());
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/* ================================== Tests ================================== */
