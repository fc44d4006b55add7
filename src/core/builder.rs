//! Builder for loading a Bootstrap.

use crate::core::{Bootstrap, BootstrapLoader, BootstrapParser};
use crate::error::Result;
use crate::registry::{CertificateProviderRegistry, ChannelCredsRegistry};
use crate::sources::{BootstrapSource, EnvSource, FileSource, JsonSource, XdsEnv};
use std::path::PathBuf;
use std::sync::Arc;

/// Builder for loading a [`Bootstrap`].
///
/// Provides a fluent interface for choosing sources, registries and the
/// federation switch.
///
/// # Examples
///
/// ```rust,no_run
/// use xds_bootstrap::prelude::*;
///
/// # fn example() -> Result<()> {
/// // GRPC_XDS_BOOTSTRAP, then GRPC_XDS_BOOTSTRAP_CONFIG, then the fallback file
/// let bootstrap = Bootstrap::builder()
///     .with_env_sources()
///     .with_file("/etc/xds/bootstrap.json")
///     .build()?;
///
/// println!("management server: {}", bootstrap.server().server_uri);
/// # Ok(())
/// # }
/// ```
pub struct BootstrapBuilder {
    file_paths: Vec<PathBuf>,
    env_sources: bool,
    inline: Option<String>,
    custom_sources: Vec<Box<dyn BootstrapSource>>,
    federation: Option<bool>,
    channel_creds: Option<Arc<ChannelCredsRegistry>>,
    certificate_providers: Option<Arc<CertificateProviderRegistry>>,
}

impl BootstrapBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            file_paths: Vec::new(),
            env_sources: false,
            inline: None,
            custom_sources: Vec::new(),
            federation: None,
            channel_creds: None,
            certificate_providers: None,
        }
    }

    /// Add a bootstrap file.
    ///
    /// Files are consulted in the order given, after the environment sources.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Consult `GRPC_XDS_BOOTSTRAP` and then `GRPC_XDS_BOOTSTRAP_CONFIG`.
    pub fn with_env_sources(mut self) -> Self {
        self.env_sources = true;
        self
    }

    /// Use `json` when no other source yields a bootstrap.
    pub fn with_json(mut self, json: impl Into<String>) -> Self {
        self.inline = Some(json.into());
        self
    }

    /// Add a custom bootstrap source.
    pub fn with_source<S: BootstrapSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Force federation support on or off.
    ///
    /// Unless set, `GRPC_EXPERIMENTAL_XDS_FEDERATION` decides.
    pub fn with_federation(mut self, enabled: bool) -> Self {
        self.federation = Some(enabled);
        self
    }

    /// Use `registry` for channel credential types.
    pub fn with_channel_creds(mut self, registry: Arc<ChannelCredsRegistry>) -> Self {
        self.channel_creds = Some(registry);
        self
    }

    /// Use `registry` for certificate provider plugins.
    pub fn with_certificate_providers(
        mut self,
        registry: Arc<CertificateProviderRegistry>,
    ) -> Self {
        self.certificate_providers = Some(registry);
        self
    }

    /// Load and validate the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source yields a bootstrap, or the winning source fails to load
    /// - The bootstrap is not valid JSON
    /// - Validation fails
    pub fn build(self) -> Result<Bootstrap> {
        let federation = match self.federation {
            Some(enabled) => enabled,
            None => XdsEnv::from_env()?.federation_enabled(),
        };

        let mut parser = BootstrapParser::new().with_federation(federation);
        if let Some(registry) = self.channel_creds {
            parser = parser.with_channel_creds(registry);
        }
        if let Some(registry) = self.certificate_providers {
            parser = parser.with_certificate_providers(registry);
        }

        let mut loader = BootstrapLoader::new(parser);

        // Environment variables have the highest priority
        if self.env_sources {
            loader.add_source(Box::new(EnvSource::bootstrap_file()));
            loader.add_source(Box::new(EnvSource::bootstrap_config()));
        }

        // Files with decreasing priority: 100, 99, 98, etc.
        for (index, path) in self.file_paths.iter().enumerate() {
            let priority = 100 - index as i32;
            loader.add_source(Box::new(FileSource::new(path).with_priority(priority)));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let Some(json) = self.inline {
            loader.add_source(Box::new(JsonSource::new(json)));
        }

        loader.load()
    }
}

impl Default for BootstrapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
