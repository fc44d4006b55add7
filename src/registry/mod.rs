//! Registries of pluggable credential types and certificate provider factories.
//!
//! Both registries are filled during process initialization and then handed,
//! read-only, to every [`BootstrapParser`](crate::core::BootstrapParser).

mod certificate_provider;
mod channel_creds;

#[cfg(feature = "file-watcher-provider")]
mod file_watcher;

pub use certificate_provider::{
    CertificateProviderConfig, CertificateProviderFactory, CertificateProviderRegistry,
    CertificateProviderRegistryBuilder,
};
pub use channel_creds::{
    ChannelCredsRegistry, FAKE_CREDS, GOOGLE_DEFAULT_CREDS, INSECURE_CREDS, SelectedCreds,
};

#[cfg(feature = "file-watcher-provider")]
pub use file_watcher::{
    DEFAULT_REFRESH_INTERVAL, FILE_WATCHER_PLUGIN_NAME, FileWatcherCertificateProviderFactory,
    FileWatcherConfig, parse_duration,
};
