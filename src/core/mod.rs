//! Bootstrap data model and parsers.

mod authority;
mod bootstrap;
mod builder;
mod certificate_providers;
pub mod fields;
mod loader;
mod node;
mod xds_server;

pub use authority::{Authority, XDSTP_SCHEME, template_prefix, validate_template};
pub use bootstrap::{Bootstrap, BootstrapParser, DEFAULT_CLIENT_LISTENER_TEMPLATE};
pub use builder::BootstrapBuilder;
pub use certificate_providers::PluginDefinition;
pub use loader::BootstrapLoader;
pub use node::Node;
pub use xds_server::{SERVER_FEATURE_IGNORE_RESOURCE_DELETION, SERVER_FEATURE_XDS_V3, XdsServer};
