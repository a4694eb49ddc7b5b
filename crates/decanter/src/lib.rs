//! Decanter - recursive text extraction from documents and archives
//!
//! Decanter turns an input (a file, a byte buffer or a stream) into plain-text records
//! with their document properties. Containers are opened recursively: a presentation
//! inside a tar archive yields the presentation's text, tagged with the chain of
//! records it came from.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use decanter::{Data, DecanterConfig, Feeder};
//!
//! # fn main() -> decanter::Result<()> {
//! let feeder = Feeder::with_default_decomposers(DecanterConfig::default())?;
//! for text in feeder.extract(Data::from_path("bundle.tar"))? {
//!     println!("{}: {}", text.info().describe(), text.body());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): the [`Feeder`], configuration loading and byte limits
//! - **Plugin System** (`plugins`): the [`Decomposer`](plugins::Decomposer) trait and
//!   the registry the feeder selects from
//! - **Decomposers** (`decomposers`): tar archives, Word documents, PowerPoint
//!   presentations and an optional HTTP extraction service
//! - **Extraction** (`extraction`): archive walking and streaming XML listeners
//!
//! # Features
//!
//! - Score-based decomposer selection, registration order breaking ties
//! - Streaming archive entries, nothing is unpacked to disk
//! - Depth and byte ceilings against archive bombs
//! - `remote`: delegate unsupported formats to an HTTP extraction service

#![deny(unsafe_code)]

pub mod core;
pub mod decomposers;
pub mod error;
pub mod extraction;
pub mod plugins;
pub mod types;

pub use error::{DecanterError, Result};

pub use types::{AttributeValue, Attributes, Data, Record, RecordInfo, TextData, TextSummary};

pub use core::config::{AttributeChunkPolicy, DecanterConfig, RemoteConfig};
pub use core::feeder::{FeedOutcome, Feeder};

pub use plugins::{DecomposeContext, Decomposer, DecomposerRegistry, Plugin, get_decomposer_registry};
