//! Base plugin trait definition.
//!
//! Every decomposer implements [`Plugin`], which provides lifecycle management and
//! identification on top of the format-specific [`Decomposer`](super::Decomposer) trait.

use crate::Result;

/// Base trait that all plugins must implement.
///
/// # Thread Safety
///
/// Plugins are stored as `Arc<dyn Decomposer>` inside a shared registry and must be
/// `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use decanter::plugins::Plugin;
/// use decanter::Result;
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// struct MyPlugin {
///     ready: AtomicBool,
/// }
///
/// impl Plugin for MyPlugin {
///     fn name(&self) -> &str {
///         "my-plugin"
///     }
///
///     fn version(&self) -> String {
///         "1.0.0".to_string()
///     }
///
///     fn initialize(&self) -> Result<()> {
///         self.ready.store(true, Ordering::Release);
///         Ok(())
///     }
///
///     fn shutdown(&self) -> Result<()> {
///         self.ready.store(false, Ordering::Release);
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Returns the identifier of this plugin, e.g. `"tar"`.
    ///
    /// Lowercase with hyphens. Registry keys follow the same rules.
    fn name(&self) -> &str;

    /// Returns the semantic version of this plugin.
    fn version(&self) -> String;

    /// Initialize the plugin.
    ///
    /// Called once when the plugin is registered. Takes `&self` so it works through
    /// `Arc<dyn Plugin>`; plugins needing mutable state use interior mutability.
    ///
    /// # Errors
    ///
    /// The plugin is not registered if this returns an error.
    fn initialize(&self) -> Result<()>;

    /// Shutdown the plugin.
    ///
    /// Called when the plugin is removed, replaced, or the registry is shut down.
    fn shutdown(&self) -> Result<()>;

    /// Optional plugin description for debugging and logging.
    fn description(&self) -> &str {
        ""
    }

    /// Optional plugin author information.
    fn author(&self) -> &str {
        ""
    }
}
