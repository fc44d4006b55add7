//! Bootstrap loader that picks one source and validates its document.

use crate::core::{Bootstrap, BootstrapParser};
use crate::error::{BootstrapError, Result};
use crate::sources::BootstrapSource;
use serde_json::Value;

/// Loads the bootstrap from the first available source.
///
/// Sources are consulted in priority order (highest first). The first one that
/// yields content wins; the others are not read.
pub struct BootstrapLoader {
    sources: Vec<Box<dyn BootstrapSource>>,
    parser: BootstrapParser,
}

impl BootstrapLoader {
    /// Create a loader validating with `parser`.
    pub fn new(parser: BootstrapParser) -> Self {
        Self {
            sources: Vec::new(),
            parser,
        }
    }

    /// Add a bootstrap source.
    pub fn add_source(&mut self, source: Box<dyn BootstrapSource>) {
        self.sources.push(source);
    }

    /// Read the winning source's text.
    ///
    /// Returns the source name alongside the text.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source yields content
    /// - The winning source fails to load
    pub fn load_text(&self) -> Result<(String, String)> {
        if self.sources.is_empty() {
            return Err(BootstrapError::NotFound(
                "No bootstrap sources specified".to_string(),
            ));
        }

        // Highest priority first; stable so equal priorities keep insertion order
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| std::cmp::Reverse(s.priority()));

        for source in sorted_sources {
            let loaded = source.load().map_err(|e| {
                BootstrapError::LoadError(format!(
                    "Failed to load source '{}': {}",
                    source.name(),
                    e
                ))
            })?;
            if let Some(text) = loaded {
                tracing::info!(source = %source.name(), "loading xds bootstrap");
                return Ok((source.name(), text));
            }
            tracing::debug!(source = %source.name(), "bootstrap source not configured");
        }

        Err(BootstrapError::NotFound(format!(
            "none of the sources produced a bootstrap: {}",
            self.source_names().join(", ")
        )))
    }

    /// Load, parse and validate the bootstrap.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source yields content or the winning source fails
    /// - The text is not valid JSON
    /// - The document fails validation (the error carries the full report)
    pub fn load(&self) -> Result<Bootstrap> {
        let (name, text) = self.load_text()?;
        let json: Value = serde_json::from_str(&text)?;
        self.parser.parse(&json).into_result().map_err(|errors| {
            tracing::warn!(source = %name, report = %errors, "xds bootstrap failed validation");
            BootstrapError::Validation(errors)
        })
    }

    /// Get the list of source names in priority order.
    pub fn source_names(&self) -> Vec<String> {
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| std::cmp::Reverse(s.priority()));
        sorted_sources.iter().map(|s| s.name()).collect()
    }
}

impl Default for BootstrapLoader {
    fn default() -> Self {
        Self::new(BootstrapParser::default())
    }
}
