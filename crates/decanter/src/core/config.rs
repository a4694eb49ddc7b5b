//! Configuration loading and management.
//!
//! [`DecanterConfig`] holds the hardening limits of a feed, the attribute chunk policy
//! of the Office Open XML decomposers and the optional remote decomposer endpoint. It
//! can be loaded from TOML, YAML, or JSON files, discovered from `decanter.toml` in
//! the working directory hierarchy, or created programmatically.

use crate::{DecanterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the file searched for by [`DecanterConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "decanter.toml";

/// Main decomposition configuration.
///
/// # Example
///
/// ```rust
/// use decanter::core::config::DecanterConfig;
///
/// let config = DecanterConfig::default();
/// assert_eq!(config.max_depth, 16);
///
/// // let config = DecanterConfig::from_toml_file("decanter.toml")?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecanterConfig {
    /// Deepest container nesting a feed will decompose
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Ceiling on cumulative bytes read from container entries during one feed
    #[serde(default = "default_max_total_bytes")]
    pub max_total_bytes: u64,

    /// How character chunks of one metadata element are combined
    #[serde(default)]
    pub attribute_chunks: AttributeChunkPolicy,

    /// HTTP extraction service (None = no remote decomposer)
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// How the attributes listener handles an element whose text arrives in several chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeChunkPolicy {
    /// Join every chunk and store the value when the element ends.
    #[default]
    Concatenate,
    /// Each chunk replaces the value stored by the previous one.
    Overwrite,
}

/// Endpoint of an HTTP text extraction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// URL the record bytes are posted to
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extensions (without dot) routed to the service
    #[serde(default)]
    pub extensions: Vec<String>,

    /// MIME types routed to the service
    #[serde(default)]
    pub mime_types: Vec<String>,
}

fn default_max_depth() -> usize {
    16
}
fn default_max_total_bytes() -> u64 {
    1024 * 1024 * 1024
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for DecanterConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_total_bytes: default_max_total_bytes(),
            attribute_chunks: AttributeChunkPolicy::default(),
            remote: None,
        }
    }
}

impl DecanterConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `DecanterError::Validation` if the file can't be read, is invalid TOML,
    /// or holds out-of-range values.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| DecanterError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| DecanterError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| DecanterError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension.
    ///
    /// `.yaml`/`.yml` and `.json` are recognized; anything else is read as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover configuration file in parent directories.
    ///
    /// Searches for `decanter.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(DecanterError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(DecanterError::validation("max_depth must be at least 1"));
        }
        if self.max_total_bytes == 0 {
            return Err(DecanterError::validation("max_total_bytes must be greater than 0"));
        }
        if let Some(remote) = &self.remote {
            if remote.url.trim().is_empty() {
                return Err(DecanterError::validation("remote.url cannot be empty"));
            }
            if remote.timeout_secs == 0 {
                return Err(DecanterError::validation("remote.timeout_secs must be greater than 0"));
            }
        }
        Ok(())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| DecanterError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}
