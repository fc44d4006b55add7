//! Bootstrap source trait.

use crate::error::Result;

/// Trait for bootstrap sources.
///
/// Implement this trait to fetch bootstrap text from somewhere else (a secret
/// store, a mounted volume, a test fixture).
pub trait BootstrapSource: Send + Sync {
    /// Load the raw bootstrap text.
    ///
    /// Returns `Ok(None)` when the source is not configured, letting the loader
    /// fall through to the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is configured but cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = consulted first).
    ///
    /// Default priorities:
    /// - `GRPC_XDS_BOOTSTRAP` file: 300
    /// - `GRPC_XDS_BOOTSTRAP_CONFIG` contents: 200
    /// - Explicit file: 100
    /// - In-memory fallback: 50
    fn priority(&self) -> i32 {
        100
    }
}
