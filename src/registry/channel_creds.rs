//! Registry of recognized channel credential types.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// `google_default` credentials.
pub const GOOGLE_DEFAULT_CREDS: &str = "google_default";

/// Plaintext connection to the management server.
pub const INSECURE_CREDS: &str = "insecure";

/// Test-only credentials.
pub const FAKE_CREDS: &str = "fake";

/// Set of channel credential type names the process knows how to build.
///
/// Populate it at startup, then share it (usually behind an `Arc`) with
/// every parser; lookups never mutate it.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::registry::ChannelCredsRegistry;
///
/// let mut registry = ChannelCredsRegistry::with_default_types();
/// registry.register("tls");
///
/// assert!(registry.is_supported("insecure"));
/// assert!(registry.is_supported("tls"));
/// assert!(!registry.is_supported("unknown"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChannelCredsRegistry {
    types: BTreeSet<String>,
}

/// The credential entry picked out of a server's `channel_creds` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCreds {
    /// Position of the entry in the list
    pub index: usize,
    /// Credential type name
    pub creds_type: String,
    /// The entry's `config`, or JSON null when it had none
    pub config: Value,
}

impl ChannelCredsRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry knowing `google_default`, `insecure` and `fake`.
    pub fn with_default_types() -> Self {
        let mut registry = Self::new();
        registry.register(GOOGLE_DEFAULT_CREDS);
        registry.register(INSECURE_CREDS);
        registry.register(FAKE_CREDS);
        registry
    }

    /// Register a credential type name.
    pub fn register(&mut self, creds_type: impl Into<String>) {
        let creds_type = creds_type.into();
        tracing::debug!(creds_type = %creds_type, "registered channel creds type");
        self.types.insert(creds_type);
    }

    /// Whether `creds_type` is known.
    pub fn is_supported(&self, creds_type: &str) -> bool {
        self.types.contains(creds_type)
    }

    /// Pick the first entry, in list order, whose type is known.
    ///
    /// Entries are `(type, config)` pairs as read from the document.
    pub fn select<'a, I>(&self, entries: I) -> Option<SelectedCreds>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a Map<String, Value>>)>,
    {
        entries
            .into_iter()
            .enumerate()
            .find(|(_, (creds_type, _))| self.is_supported(creds_type))
            .map(|(index, (creds_type, config))| SelectedCreds {
                index,
                creds_type: creds_type.to_string(),
                config: config.map_or(Value::Null, |c| Value::Object(c.clone())),
            })
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over registered type names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}
