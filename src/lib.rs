//! # xds-bootstrap
//!
//! Validating loader for xDS client bootstrap configuration.
//!
//! ## Overview
//!
//! `xds-bootstrap` turns a bootstrap JSON document into an immutable, typed
//! [`Bootstrap`](core::Bootstrap) describing:
//! - The management servers to talk to and the channel credentials to use
//! - The node descriptor the client reports about itself
//! - Per-authority federation overrides
//! - Named certificate provider plugin instances
//!
//! Validation never stops at the first problem. Every defect in the document is
//! reported at once, each nested under the scope it was found in:
//!
//! ```text
//! errors parsing "xds_servers" array:
//!   errors parsing index 0:
//!     errors parsing xds server:
//!       field:server_uri error:does not exist.
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use xds_bootstrap::prelude::*;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "xds_servers": [{
//!         "server_uri": "xds.example.com:443",
//!         "channel_creds": [{"type": "google_default"}]
//!     }],
//!     "node": {"id": "client-1", "locality": {"zone": "us-east1-b"}}
//! });
//!
//! let bootstrap = BootstrapParser::new().parse(&doc).into_result().unwrap();
//! assert_eq!(bootstrap.server().channel_creds_type, "google_default");
//! assert_eq!(bootstrap.node().unwrap().locality_zone, "us-east1-b");
//! ```
//!
//! Loading from the standard `GRPC_XDS_BOOTSTRAP` / `GRPC_XDS_BOOTSTRAP_CONFIG`
//! environment variables goes through [`Bootstrap::builder`](core::Bootstrap::builder).
//!
//! ## Feature Flags
//!
//! - `file-watcher-provider` (default): registers the built-in `file_watcher`
//!   certificate provider factory in
//!   [`CertificateProviderRegistry::with_default_factories`](registry::CertificateProviderRegistry::with_default_factories).

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod registry;
pub mod sources;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Authority, Bootstrap, BootstrapBuilder, BootstrapParser, Node, XdsServer};
    pub use crate::error::{BootstrapError, Result, Validated, ValidationError, ValidationErrors};
    pub use crate::registry::{
        CertificateProviderConfig, CertificateProviderFactory, CertificateProviderRegistry,
        ChannelCredsRegistry,
    };
}
