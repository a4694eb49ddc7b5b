//! Plugin system for extending Decanter with new formats.
//!
//! # Plugin Types
//!
//! - [`Plugin`] - Base trait that all plugins must implement
//! - [`Decomposer`] - Format handlers selected by the feeder
//!
//! # Lifecycle Pattern
//!
//! Decomposers are stored as `Arc<dyn Decomposer>` and registered under a key:
//!
//! ```rust
//! use decanter::decomposers::TarDecomposer;
//! use decanter::plugins::registry::get_decomposer_registry;
//! use std::sync::Arc;
//!
//! let registry = get_decomposer_registry();
//! let mut registry = registry.write().unwrap();
//! // Calls initialize() internally
//! registry.register("tar", Arc::new(TarDecomposer::new()))?;
//! # Ok::<(), decanter::DecanterError>(())
//! ```

mod decomposer;
pub mod registry;
mod traits;

pub use decomposer::{DecomposeContext, Decomposer, Emit};
pub use registry::{DecomposerRegistry, get_decomposer_registry};
pub use traits::Plugin;
