//! Decomposer delegating extraction to an HTTP service.
//!
//! The record's bytes are posted as the multipart part `data` (with the record's file
//! name and MIME type when known). The service answers with JSON:
//!
//! ```json
//! {"texts": [{"body": "...", "mime-type": "text/plain", "path": "/tmp/hello.txt"}]}
//! ```
//!
//! Each element of `texts` becomes one text record. String fields other than `body`
//! become attributes.

use crate::core::config::RemoteConfig;
use crate::plugins::{DecomposeContext, Decomposer, Emit, Plugin};
use crate::types::{Data, Record, RecordInfo, TEXT_MIME_TYPE, TextData};
use crate::{DecanterError, Result};
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

pub const REMOTE_KEY: &str = "http-server";

/// Score of the remote decomposer; any local decomposer wins over it.
pub const REMOTE_SCORE: i32 = 100;

#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    texts: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Fallback decomposer backed by an HTTP extraction service.
pub struct HttpServerDecomposer {
    config: RemoteConfig,
    client: Client,
}

impl HttpServerDecomposer {
    /// Build a decomposer for the endpoint in `config`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty URL and `Remote` if the HTTP client can't be built.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(DecanterError::validation("Remote decomposer URL cannot be empty"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DecanterError::remote_with_source("Failed to build HTTP client", e))?;

        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn post(&self, info: &RecordInfo, bytes: Vec<u8>) -> Result<ExtractionResponse> {
        let mut part = Part::bytes(bytes);
        if let Some(path) = info.path() {
            let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path).to_string();
            part = part.file_name(file_name);
        }
        if let Some(mime_type) = info.mime_type() {
            part = part
                .mime_str(mime_type)
                .map_err(|e| DecanterError::remote_with_source(format!("Invalid MIME type '{}'", mime_type), e))?;
        }

        let response = self
            .client
            .post(&self.config.url)
            .multipart(Form::new().part("data", part))
            .send()
            .map_err(|e| DecanterError::remote_with_source(format!("Failed to post to {}", self.config.url), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecanterError::remote(format!(
                "{} answered with HTTP status {}",
                self.config.url, status
            )));
        }

        response
            .json::<ExtractionResponse>()
            .map_err(|e| DecanterError::remote_with_source(format!("Invalid response from {}", self.config.url), e))
    }
}

fn text_from_entry(entry: serde_json::Map<String, serde_json::Value>, source: &std::sync::Arc<RecordInfo>) -> TextData {
    let body = entry.get("body").and_then(|v| v.as_str()).unwrap_or_default().to_string();
    let mut text = TextData::new(body, source);
    for (name, value) in entry {
        if name == "body" {
            continue;
        }
        if let serde_json::Value::String(value) = value {
            text.set_attribute(name, value);
        }
    }
    text
}

impl Plugin for HttpServerDecomposer {
    fn name(&self) -> &str {
        REMOTE_KEY
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Delegates text extraction to an HTTP service"
    }

    fn author(&self) -> &str {
        "Decanter Team"
    }
}

impl Decomposer for HttpServerDecomposer {
    fn target(&self, info: &RecordInfo) -> bool {
        if info.mime_type() == Some(TEXT_MIME_TYPE) {
            return false;
        }
        info.extension()
            .is_some_and(|ext| self.config.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            || info
                .mime_type()
                .is_some_and(|mime| self.config.mime_types.iter().any(|m| m == mime))
    }

    fn target_score(&self, info: &RecordInfo) -> Option<i32> {
        self.target(info).then_some(REMOTE_SCORE)
    }

    fn decompose(&self, data: Data<'_>, _ctx: &DecomposeContext<'_>, emit: &mut Emit<'_>) -> Result<()> {
        let source = data.info().clone();
        let bytes = data.into_bytes()?;

        tracing::debug!(url = %self.config.url, source = %source.describe(), bytes = bytes.len(), "Posting record to extraction service");
        let response = self.post(&source, bytes)?;

        for entry in response.texts {
            emit(Record::Text(text_from_entry(entry, &source)))?;
        }
        Ok(())
    }
}
