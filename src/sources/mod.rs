//! Where bootstrap documents come from.
//!
//! A source either yields the raw bootstrap text or reports that it is not
//! configured. The [loader](crate::core::BootstrapLoader) takes the
//! highest-priority source that yields something; sources are alternatives
//! and are never merged.

mod bootstrap_source;
mod env;
mod file;
mod json;

pub use bootstrap_source::BootstrapSource;
pub use env::{EnvSource, EnvVar, XdsEnv};
pub use file::FileSource;
pub use json::JsonSource;
