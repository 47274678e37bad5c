// src/model.rs
//! Text-generation boundary.
//!
//! The generator only sees `TextModel`: prompt + token budget + stop sequences in,
//! `Completion { choices: [{ text }] }` out. `HttpModel` talks to a local
//! OpenAI-compatible completions endpoint (llama.cpp server, llama-cpp-python).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ModelConfig;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("model server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode completion: {0}")]
    Decode(String),

    #[error("completion contained no choices")]
    NoChoices,
}

/// Generation limits for one call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionConfig {
    pub max_tokens: u32,
    pub stop: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Completion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl Completion {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { choices: vec![Choice { text: text.into() }] }
    }

    /// Text of the first choice.
    pub fn text(&self) -> Result<&str, ModelError> {
        self.choices.first().map(|c| c.text.as_str()).ok_or(ModelError::NoChoices)
    }
}

/// A synchronous prompt → completion capability.
pub trait TextModel {
    fn complete(&self, prompt: &str, config: &CompletionConfig) -> Result<Completion, ModelError>;
}

/* ================================ HTTP client ================================ */

#[derive(Serialize, Debug)]
struct CompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    prompt: &'a str,
    max_tokens: u32,
    stop: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

pub struct HttpModel {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: Option<String>,
    temperature: Option<f32>,
}

impl HttpModel {
    pub fn new(config: &ModelConfig) -> anyhow::Result<Self> {
        // None disables the blocking client's 30s default
        let timeout = config.timeout_secs.map(Duration::from_secs);
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone().filter(|m| !m.is_empty()),
            temperature: config.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request<'a>(&'a self, prompt: &'a str, config: &'a CompletionConfig) -> CompletionRequest<'a> {
        CompletionRequest {
            model: self.model.as_deref(),
            prompt,
            max_tokens: config.max_tokens,
            stop: &config.stop,
            temperature: self.temperature,
        }
    }
}

impl TextModel for HttpModel {
    fn complete(&self, prompt: &str, config: &CompletionConfig) -> Result<Completion, ModelError> {
        let transport = |source| ModelError::Transport { endpoint: self.endpoint.clone(), source };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&self.request(prompt, config))
            .send()
            .map_err(transport)?;

        let status = resp.status();
        let body = resp.text().map_err(transport)?;
        if !status.is_success() {
            return Err(ModelError::Status { status: status.as_u16(), body });
        }
        parse_completion(&body)
    }
}

/// Decode a completions response body. Accepts the OpenAI shape
/// (`choices[].text`) and llama.cpp's native `/completion` shape (`content`).
pub fn parse_completion(body: &str) -> Result<Completion, ModelError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

    if value.get("choices").is_some() {
        return serde_json::from_value(value).map_err(|e| ModelError::Decode(e.to_string()));
    }
    if let Some(content) = value.get("content").and_then(|c| c.as_str()) {
        return Ok(Completion::from_text(content));
    }
    Err(ModelError::Decode(format!("unexpected response shape: {}", clamp(body, 200))))
}

fn clamp(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/* ===================================== Tests ===================================== */
