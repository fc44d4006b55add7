//! Environment variable bootstrap sources.

use super::BootstrapSource;
use crate::error::{BootstrapError, Result};
use config::Environment;
use serde::Deserialize;
use std::collections::HashMap;

/// The `GRPC_*` environment variables the bootstrap loader understands.
///
/// Read through the `config` crate's environment source: the `GRPC_` prefix is
/// stripped and the remainder lower-cased, so `GRPC_XDS_BOOTSTRAP` lands in
/// `xds_bootstrap`.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use xds_bootstrap::sources::XdsEnv;
///
/// let vars = HashMap::from([
///     ("GRPC_XDS_BOOTSTRAP".to_string(), "/etc/xds/bootstrap.json".to_string()),
///     ("GRPC_EXPERIMENTAL_XDS_FEDERATION".to_string(), "true".to_string()),
/// ]);
/// let env = XdsEnv::from_vars(vars).unwrap();
///
/// assert_eq!(env.xds_bootstrap.as_deref(), Some("/etc/xds/bootstrap.json"));
/// assert!(env.federation_enabled());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct XdsEnv {
    /// `GRPC_XDS_BOOTSTRAP`: path of the bootstrap file
    pub xds_bootstrap: Option<String>,
    /// `GRPC_XDS_BOOTSTRAP_CONFIG`: bootstrap JSON itself
    pub xds_bootstrap_config: Option<String>,
    /// `GRPC_EXPERIMENTAL_XDS_FEDERATION`: federation switch
    pub experimental_xds_federation: Option<String>,
}

impl XdsEnv {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be collected.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Read an explicit variable map instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be deserialized.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<HashMap<String, String>>) -> Result<Self> {
        let env_source = Environment::with_prefix("GRPC")
            .prefix_separator("_")
            .source(vars);

        config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                BootstrapError::LoadError(format!("Failed to load environment variables: {}", e))
            })?
            .try_deserialize::<Self>()
            .map_err(|e| {
                BootstrapError::LoadError(format!("Failed to parse environment variables: {}", e))
            })
    }

    /// Whether `GRPC_EXPERIMENTAL_XDS_FEDERATION` enables federation.
    ///
    /// `true`, `yes` and `1` (any case) enable it; anything else, including
    /// an unset variable, leaves it off.
    pub fn federation_enabled(&self) -> bool {
        self.experimental_xds_federation
            .as_deref()
            .map(str::trim)
            .is_some_and(|value| {
                value.eq_ignore_ascii_case("true")
                    || value.eq_ignore_ascii_case("yes")
                    || value == "1"
            })
    }
}

/// Which variable an [`EnvSource`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVar {
    /// `GRPC_XDS_BOOTSTRAP` names a file to read
    BootstrapFile,
    /// `GRPC_XDS_BOOTSTRAP_CONFIG` holds the document
    BootstrapConfig,
}

/// Bootstrap source driven by a `GRPC_*` environment variable.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::sources::{BootstrapSource, EnvSource};
///
/// let file = EnvSource::bootstrap_file();
/// let inline = EnvSource::bootstrap_config();
/// assert!(file.priority() > inline.priority());
/// ```
pub struct EnvSource {
    var: EnvVar,
    vars: Option<HashMap<String, String>>,
    priority: i32,
}

impl EnvSource {
    /// Source reading the file named by `GRPC_XDS_BOOTSTRAP`.
    pub fn bootstrap_file() -> Self {
        Self {
            var: EnvVar::BootstrapFile,
            vars: None,
            priority: 300,
        }
    }

    /// Source reading the document in `GRPC_XDS_BOOTSTRAP_CONFIG`.
    pub fn bootstrap_config() -> Self {
        Self {
            var: EnvVar::BootstrapConfig,
            vars: None,
            priority: 200,
        }
    }

    /// Look variables up in `vars` instead of the process environment.
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = Some(vars);
        self
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources are consulted first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn env(&self) -> Result<XdsEnv> {
        match &self.vars {
            Some(vars) => XdsEnv::from_vars(vars.clone()),
            None => XdsEnv::from_env(),
        }
    }
}

impl BootstrapSource for EnvSource {
    fn load(&self) -> Result<Option<String>> {
        let env = self.env()?;
        match self.var {
            EnvVar::BootstrapFile => {
                let Some(path) = env.xds_bootstrap else {
                    return Ok(None);
                };
                std::fs::read_to_string(&path).map(Some).map_err(|e| {
                    BootstrapError::LoadError(format!(
                        "Failed to read bootstrap file {}: {}",
                        path, e
                    ))
                })
            }
            EnvVar::BootstrapConfig => Ok(env.xds_bootstrap_config),
        }
    }

    fn name(&self) -> String {
        match self.var {
            EnvVar::BootstrapFile => "env:GRPC_XDS_BOOTSTRAP".to_string(),
            EnvVar::BootstrapConfig => "env:GRPC_XDS_BOOTSTRAP_CONFIG".to_string(),
        }
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_source_creation() {
        let source = EnvSource::bootstrap_file();
        assert_eq!(source.var, EnvVar::BootstrapFile);
        assert_eq!(source.priority(), 300);
        assert_eq!(EnvSource::bootstrap_config().priority(), 200);
    }

    #[test]
    fn test_with_priority() {
        let source = EnvSource::bootstrap_config().with_priority(400);
        assert_eq!(source.priority(), 400);
    }

    #[test]
    fn test_name() {
        assert_eq!(EnvSource::bootstrap_file().name(), "env:GRPC_XDS_BOOTSTRAP");
        assert_eq!(
            EnvSource::bootstrap_config().name(),
            "env:GRPC_XDS_BOOTSTRAP_CONFIG"
        );
    }

    #[test]
    fn test_unset_variables() {
        let env = XdsEnv::from_vars(vars(&[("GRPC_TRACE", "all")])).unwrap();
        assert_eq!(env, XdsEnv::default());
        assert!(!env.federation_enabled());

        let source = EnvSource::bootstrap_config().with_vars(HashMap::new());
        assert!(source.load().unwrap().is_none());
    }

    #[test]
    fn test_federation_flag_values() {
        for (value, expected) in [
            ("true", true),
            ("TRUE", true),
            ("yes", true),
            ("1", true),
            ("false", false),
            ("0", false),
            ("maybe", false),
        ] {
            let env = XdsEnv::from_vars(vars(&[("GRPC_EXPERIMENTAL_XDS_FEDERATION", value)]))
                .unwrap();
            assert_eq!(env.federation_enabled(), expected, "{value}");
        }
    }

    #[test]
    fn test_inline_config() {
        let source = EnvSource::bootstrap_config()
            .with_vars(vars(&[("GRPC_XDS_BOOTSTRAP_CONFIG", "{\"xds_servers\": []}")]));
        assert_eq!(
            source.load().unwrap().as_deref(),
            Some("{\"xds_servers\": []}")
        );
    }

    #[test]
    fn test_bootstrap_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bootstrap.json");
        fs::write(&path, "{}").unwrap();

        let source = EnvSource::bootstrap_file()
            .with_vars(vars(&[("GRPC_XDS_BOOTSTRAP", path.to_str().unwrap())]));
        assert_eq!(source.load().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_bootstrap_file_missing() {
        let source = EnvSource::bootstrap_file()
            .with_vars(vars(&[("GRPC_XDS_BOOTSTRAP", "/nonexistent/bootstrap.json")]));
        assert!(matches!(source.load(), Err(BootstrapError::LoadError(_))));
    }
}
