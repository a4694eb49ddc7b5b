//! Built-in decomposers.
//!
//! - [`TarDecomposer`] - splits tar archives into entries (`tar`)
//! - [`OfficeOpenXmlDecomposer`] - Word documents (`office-open-xml-document`) and
//!   PowerPoint presentations (`office-open-xml-presentation`)
//! - `HttpServerDecomposer` - HTTP extraction service fallback (`http-server`,
//!   feature `remote`, registered only when configured)

pub mod office_open_xml;
pub mod tar;

#[cfg(feature = "remote")]
pub mod remote;

pub use self::office_open_xml::{Accumulation, OfficeOpenXmlDecomposer, PartMatcher, TextAccumulator};
pub use self::tar::TarDecomposer;

#[cfg(feature = "remote")]
pub use self::remote::HttpServerDecomposer;

use crate::core::config::DecanterConfig;
use crate::plugins::registry::{DecomposerRegistry, get_decomposer_registry};
use crate::{DecanterError, Result};
use std::sync::Arc;

/// Register the built-in decomposers with `registry`.
///
/// Registration order, which breaks score ties: `tar`, `office-open-xml-document`,
/// `office-open-xml-presentation`, then `http-server` when `config.remote` is set.
///
/// # Example
///
/// ```rust
/// use decanter::core::config::DecanterConfig;
/// use decanter::decomposers::register_default_decomposers;
/// use decanter::plugins::DecomposerRegistry;
///
/// let mut registry = DecomposerRegistry::new();
/// register_default_decomposers(&mut registry, &DecanterConfig::default())?;
/// assert_eq!(registry.len(), 3);
/// # Ok::<(), decanter::DecanterError>(())
/// ```
pub fn register_default_decomposers(registry: &mut DecomposerRegistry, config: &DecanterConfig) -> Result<()> {
    registry.register(self::tar::TAR_KEY, Arc::new(TarDecomposer::new()))?;
    registry.register(office_open_xml::DOCUMENT_KEY, Arc::new(OfficeOpenXmlDecomposer::document()))?;
    registry.register(
        office_open_xml::PRESENTATION_KEY,
        Arc::new(OfficeOpenXmlDecomposer::presentation()),
    )?;

    if let Some(remote_config) = &config.remote {
        #[cfg(feature = "remote")]
        registry.register(
            self::remote::REMOTE_KEY,
            Arc::new(HttpServerDecomposer::new(remote_config.clone())?),
        )?;

        #[cfg(not(feature = "remote"))]
        tracing::warn!(url = %remote_config.url, "Remote decomposer configured but the `remote` feature is disabled");
    }

    Ok(())
}

/// Register the built-in decomposers with the global registry.
pub fn register_global_defaults(config: &DecanterConfig) -> Result<()> {
    let registry = get_decomposer_registry();
    let mut registry = registry
        .write()
        .map_err(|e| DecanterError::LockPoisoned(format!("Decomposer registry lock poisoned: {}", e)))?;
    register_default_decomposers(&mut registry, config)
}
