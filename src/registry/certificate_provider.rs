//! Certificate provider plugin factories.
//!
//! A plugin's `config` object is opaque to the bootstrap parser. The factory
//! registered under the plugin's name turns it into a typed, shared
//! [`CertificateProviderConfig`], or reports what was wrong with it.

use crate::error::ValidationError;
use serde_json::{Map, Value};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Parsed configuration of one certificate provider plugin instance.
///
/// Configs are reference-counted and may outlive the bootstrap they came from.
pub trait CertificateProviderConfig: Send + Sync + fmt::Debug + fmt::Display {
    /// Name of the factory that produced this config.
    fn name(&self) -> &str;

    /// Convert to Any for downcasting to the factory's concrete type.
    fn as_any(&self) -> &dyn Any;
}

/// Parses plugin-specific configuration for one certificate provider type.
///
/// # Example
///
/// ```rust
/// use std::any::Any;
/// use std::fmt;
/// use std::sync::Arc;
/// use serde_json::{Map, Value};
/// use xds_bootstrap::error::ValidationError;
/// use xds_bootstrap::registry::{CertificateProviderConfig, CertificateProviderFactory};
///
/// #[derive(Debug)]
/// struct StaticConfig;
///
/// impl fmt::Display for StaticConfig {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{{}}")
///     }
/// }
///
/// impl CertificateProviderConfig for StaticConfig {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// #[derive(Debug)]
/// struct StaticFactory;
///
/// impl CertificateProviderFactory for StaticFactory {
///     fn name(&self) -> &str {
///         "static"
///     }
///
///     fn create_config(
///         &self,
///         _config: &Map<String, Value>,
///     ) -> Result<Arc<dyn CertificateProviderConfig>, ValidationError> {
///         Ok(Arc::new(StaticConfig))
///     }
/// }
/// ```
pub trait CertificateProviderFactory: Send + Sync + fmt::Debug {
    /// Plugin name this factory is registered under.
    fn name(&self) -> &str;

    /// Parse the plugin's `config` object.
    ///
    /// An absent `config` in the document is passed as an empty object.
    ///
    /// # Errors
    ///
    /// Returns the error to report, verbatim, under the plugin's scope.
    fn create_config(
        &self,
        config: &Map<String, Value>,
    ) -> Result<Arc<dyn CertificateProviderConfig>, ValidationError>;
}

/// Immutable map from plugin name to factory.
///
/// Built once with [`CertificateProviderRegistryBuilder`]; after
/// [`build`](CertificateProviderRegistryBuilder::build) nothing can be
/// registered, so lookups need no synchronization.
///
/// # Example
///
/// ```rust
/// use xds_bootstrap::registry::CertificateProviderRegistry;
///
/// let registry = CertificateProviderRegistry::builder().build();
/// assert!(registry.lookup("file_watcher").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CertificateProviderRegistry {
    factories: HashMap<String, Arc<dyn CertificateProviderFactory>>,
}

impl CertificateProviderRegistry {
    /// Start registering factories.
    pub fn builder() -> CertificateProviderRegistryBuilder {
        CertificateProviderRegistryBuilder::new()
    }

    /// Registry containing the built-in plugins enabled by crate features.
    pub fn with_default_factories() -> Self {
        CertificateProviderRegistryBuilder::with_default_factories().build()
    }

    /// Find the factory for `plugin_name`.
    pub fn lookup(&self, plugin_name: &str) -> Option<&Arc<dyn CertificateProviderFactory>> {
        self.factories.get(plugin_name)
    }

    /// Whether `plugin_name` has a factory.
    pub fn contains(&self, plugin_name: &str) -> bool {
        self.factories.contains_key(plugin_name)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered plugin names, sorted.
    pub fn plugin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Mutable stage of a [`CertificateProviderRegistry`].
#[derive(Debug, Default)]
pub struct CertificateProviderRegistryBuilder {
    factories: HashMap<String, Arc<dyn CertificateProviderFactory>>,
}

impl CertificateProviderRegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-populated with the built-in plugins.
    pub fn with_default_factories() -> Self {
        #[allow(unused_mut)]
        let mut builder = Self::new();
        #[cfg(feature = "file-watcher-provider")]
        {
            builder = builder.register(super::FileWatcherCertificateProviderFactory);
        }
        builder
    }

    /// Register a factory under its own name, replacing any previous one.
    pub fn register<F>(mut self, factory: F) -> Self
    where
        F: CertificateProviderFactory + 'static,
    {
        let name = factory.name().to_string();
        tracing::debug!(plugin_name = %name, "registered certificate provider factory");
        self.factories.insert(name, Arc::new(factory));
        self
    }

    /// Freeze the registry.
    pub fn build(self) -> CertificateProviderRegistry {
        CertificateProviderRegistry {
            factories: self.factories,
        }
    }
}
