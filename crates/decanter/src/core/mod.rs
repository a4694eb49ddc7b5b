//! Feeding orchestration.
//!
//! - **Feeder** (`feeder`): recursive dispatch of records to decomposers
//! - **Configuration** (`config`): limits, attribute policy and the remote endpoint
//! - **Budget** (`budget`): byte ceiling shared by all entry reads of one feed
//!
//! # Example
//!
//! ```rust,no_run
//! use decanter::core::config::DecanterConfig;
//! use decanter::core::feeder::Feeder;
//! use decanter::types::Data;
//!
//! # fn main() -> decanter::Result<()> {
//! let config = DecanterConfig::discover()?.unwrap_or_default();
//! let feeder = Feeder::with_default_decomposers(config)?;
//! let texts = feeder.extract(Data::from_path("report.docx"))?;
//! println!("{} text records", texts.len());
//! # Ok(())
//! # }
//! ```

pub mod budget;
pub mod config;
pub mod feeder;

pub use budget::{BudgetedReader, ByteBudget};
pub use config::{AttributeChunkPolicy, DecanterConfig, RemoteConfig};
pub use feeder::{FeedOutcome, Feeder};
