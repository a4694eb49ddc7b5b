//! Error types for Decanter.
//!
//! Every fallible operation in the crate returns [`DecanterError`]. The variants
//! follow the failure points of a decomposition run:
//!
//! - `UnsupportedFormat` - no registered decomposer accepts a record
//! - `MalformedContainer` - zip/tar structural corruption
//! - `MalformedMarkup` - an XML part inside a container failed to parse
//! - `Io` - the source itself could not be read
//! - `LimitExceeded` - nesting depth or cumulative entry bytes passed the configured ceiling
//!
//! # Error Handling Philosophy
//!
//! **System errors MUST always bubble up unchanged:**
//! - `DecanterError::Io` (from `std::io::Error`) - unreadable files, permission errors
//!
//! **Format errors are wrapped with context:**
//! - `MalformedContainer` and `MalformedMarkup` carry the entry or archive that failed
//!   and keep the parser error as their `source`.
//!
//! # Example
//!
//! ```rust
//! use decanter::{DecanterError, Result};
//!
//! fn read_part(path: &str) -> Result<String> {
//!     // IO errors bubble up automatically via ?
//!     let content = std::fs::read_to_string(path)?;
//!
//!     if !content.starts_with('<') {
//!         return Err(DecanterError::malformed_markup(format!("{} is not XML", path)));
//!     }
//!
//!     Ok(content)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `DecanterError`.
pub type Result<T> = std::result::Result<T, DecanterError>;

/// Main error type for all Decanter operations.
#[derive(Debug, Error)]
pub enum DecanterError {
    #[error("IO error: {0}")]
    Io(std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed container: {message}")]
    MalformedContainer {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Malformed markup: {message}")]
    MalformedMarkup {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[cfg(feature = "remote")]
    #[error("Remote decomposer error: {message}")]
    Remote {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("{0}")]
    Other(String),
}

/// Marker carried inside an `std::io::Error` when a byte budget runs out.
///
/// Readers can only fail with `io::Error`, so the budget guard wraps this marker and
/// the `From<io::Error>` conversion turns it back into `LimitExceeded`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct BudgetExhausted(pub String);

impl From<std::io::Error> for DecanterError {
    fn from(err: std::io::Error) -> Self {
        if err.get_ref().is_some_and(|inner| inner.is::<BudgetExhausted>()) {
            return DecanterError::LimitExceeded(err.to_string());
        }
        DecanterError::Io(err)
    }
}

impl From<serde_json::Error> for DecanterError {
    fn from(err: serde_json::Error) -> Self {
        DecanterError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<zip::result::ZipError> for DecanterError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => DecanterError::from_entry_read("Failed to read ZIP archive", io),
            other => DecanterError::MalformedContainer {
                message: format!("Failed to read ZIP archive: {}", other),
                source: Some(Box::new(other)),
            },
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl DecanterError {
    error_constructor!(malformed_container, MalformedContainer);
    error_constructor!(malformed_markup, MalformedMarkup);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);
    #[cfg(feature = "remote")]
    error_constructor!(remote, Remote);

    /// Classify an error raised while reading container content.
    ///
    /// Decompression and checksum failures surface as `io::Error` of the data kinds and
    /// become `MalformedContainer`. An exhausted byte budget becomes `LimitExceeded`;
    /// anything else stays `Io`.
    pub fn from_entry_read(context: &str, err: std::io::Error) -> Self {
        if err.get_ref().is_some_and(|inner| inner.is::<BudgetExhausted>()) {
            return err.into();
        }
        match err.kind() {
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::InvalidInput | std::io::ErrorKind::UnexpectedEof => {
                DecanterError::malformed_container_with_source(format!("{}: {}", context, err), err)
            }
            _ => DecanterError::Io(err),
        }
    }

    /// Whether this error means the input format itself is broken or unknown,
    /// as opposed to an environmental failure.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DecanterError::UnsupportedFormat(_)
                | DecanterError::MalformedContainer { .. }
                | DecanterError::MalformedMarkup { .. }
        )
    }
}
