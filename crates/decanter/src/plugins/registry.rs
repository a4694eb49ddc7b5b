//! Decomposer registration.
//!
//! [`DecomposerRegistry`] keeps decomposer instances under fixed keys in registration
//! order. That order is the tie-breaker when two decomposers report the same score.

use crate::plugins::Decomposer;
use crate::{DecanterError, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

/// Validate a registry key before registration.
///
/// # Rules
///
/// - Key cannot be empty
/// - Key cannot contain whitespace
///
/// # Errors
///
/// Returns `Validation` if the key is invalid.
fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DecanterError::Validation {
            message: "Plugin name cannot be empty".to_string(),
            source: None,
        });
    }

    if name.contains(char::is_whitespace) {
        return Err(DecanterError::Validation {
            message: format!("Plugin name '{}' cannot contain whitespace", name),
            source: None,
        });
    }

    Ok(())
}

/// Registry for decomposer plugins.
///
/// # Thread Safety
///
/// The registry itself is a plain value; the process-wide instance returned by
/// [`get_decomposer_registry`] is wrapped in `Arc<RwLock<_>>`.
///
/// # Example
///
/// ```rust
/// use decanter::plugins::registry::DecomposerRegistry;
/// use decanter::decomposers::TarDecomposer;
/// use std::sync::Arc;
///
/// let mut registry = DecomposerRegistry::new();
/// registry.register("tar", Arc::new(TarDecomposer::new()))?;
/// assert_eq!(registry.list(), vec!["tar".to_string()]);
/// # Ok::<(), decanter::DecanterError>(())
/// ```
#[derive(Default)]
pub struct DecomposerRegistry {
    decomposers: IndexMap<String, Arc<dyn Decomposer>>,
}

impl DecomposerRegistry {
    /// Create a new empty decomposer registry.
    pub fn new() -> Self {
        Self {
            decomposers: IndexMap::new(),
        }
    }

    /// Register a decomposer under `key`.
    ///
    /// Calls the decomposer's `initialize()`. Registering an existing key replaces the
    /// previous instance in place, keeping the key's position, and shuts the replaced
    /// instance down.
    ///
    /// # Errors
    ///
    /// - `Validation` if the key is empty or contains whitespace
    /// - any error returned by `initialize()`; the registry is left unchanged
    pub fn register(&mut self, key: impl Into<String>, decomposer: Arc<dyn Decomposer>) -> Result<()> {
        let key = key.into();
        validate_plugin_name(&key)?;

        decomposer.initialize()?;

        if let Some(replaced) = self.decomposers.insert(key.clone(), decomposer) {
            tracing::debug!(key = %key, replaced = replaced.name(), "Replaced registered decomposer");
            replaced.shutdown()?;
        } else {
            tracing::debug!(key = %key, "Registered decomposer");
        }

        Ok(())
    }

    /// Every registered decomposer, in registration order.
    pub fn all(&self) -> Vec<Arc<dyn Decomposer>> {
        self.decomposers.values().cloned().collect()
    }

    /// Look up the decomposer registered under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<dyn Decomposer>> {
        self.decomposers.get(key).cloned()
    }

    /// List all registered keys, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.decomposers.keys().cloned().collect()
    }

    /// Remove a decomposer from the registry, calling its `shutdown()`.
    ///
    /// Removing an unknown key is a no-op. Later keys keep their relative order.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if let Some(decomposer) = self.decomposers.shift_remove(key) {
            decomposer.shutdown()?;
        }
        Ok(())
    }

    /// Shutdown all decomposers and clear the registry.
    pub fn shutdown_all(&mut self) -> Result<()> {
        for (_, decomposer) in self.decomposers.drain(..) {
            decomposer.shutdown()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.decomposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decomposers.is_empty()
    }
}

/// Global decomposer registry singleton.
///
/// Empty until [`register_default_decomposers`](crate::decomposers::register_default_decomposers)
/// or [`register`](DecomposerRegistry::register) is called on it.
pub static DECOMPOSER_REGISTRY: Lazy<Arc<RwLock<DecomposerRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(DecomposerRegistry::new())));

/// Get the global decomposer registry.
pub fn get_decomposer_registry() -> Arc<RwLock<DecomposerRegistry>> {
    DECOMPOSER_REGISTRY.clone()
}
