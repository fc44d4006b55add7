//! Built-in `file_watcher` certificate provider plugin.
//!
//! Only the configuration is handled here; watching the files and building
//! credentials from them belongs to whoever instantiates the provider.

use super::{CertificateProviderConfig, CertificateProviderFactory};
use crate::core::fields::{FieldExtractor, JsonString, MessageStyle};
use crate::error::{ValidationError, ValidationErrors};
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Plugin name of the file watcher provider.
pub const FILE_WATCHER_PLUGIN_NAME: &str = "file_watcher";

/// Refresh interval used when the config does not set one.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(600);

/// Parsed `file_watcher` plugin config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWatcherConfig {
    /// PEM identity certificate chain; empty when unset
    pub certificate_file: String,
    /// PEM private key for `certificate_file`; empty when unset
    pub private_key_file: String,
    /// PEM root certificates; empty when unset
    pub root_cert_file: String,
    /// How often the files are re-read
    pub refresh_interval: Duration,
}

impl fmt::Display for FileWatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        if !self.certificate_file.is_empty() {
            write!(f, "certificate_file={}, ", self.certificate_file)?;
        }
        if !self.private_key_file.is_empty() {
            write!(f, "private_key_file={}, ", self.private_key_file)?;
        }
        if !self.root_cert_file.is_empty() {
            write!(f, "ca_certificate_file={}, ", self.root_cert_file)?;
        }
        write!(f, "refresh_interval={}s}}", self.refresh_interval.as_secs_f64())
    }
}

impl CertificateProviderConfig for FileWatcherConfig {
    fn name(&self) -> &str {
        FILE_WATCHER_PLUGIN_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for [`FileWatcherConfig`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FileWatcherCertificateProviderFactory;

impl CertificateProviderFactory for FileWatcherCertificateProviderFactory {
    fn name(&self) -> &str {
        FILE_WATCHER_PLUGIN_NAME
    }

    fn create_config(
        &self,
        config: &Map<String, Value>,
    ) -> Result<Arc<dyn CertificateProviderConfig>, ValidationError> {
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(config, MessageStyle::Tagged);

        let certificate_file = fields
            .optional::<JsonString>("certificate_file", &mut errors)
            .unwrap_or_default();
        let private_key_file = fields
            .optional::<JsonString>("private_key_file", &mut errors)
            .unwrap_or_default();
        if certificate_file.is_empty() != private_key_file.is_empty() {
            errors.push(ValidationError::custom(
                "fields \"certificate_file\" and \"private_key_file\" must be both set or both unset",
            ));
        }
        let root_cert_file = fields
            .optional::<JsonString>("ca_certificate_file", &mut errors)
            .unwrap_or_default();
        if certificate_file.is_empty() && root_cert_file.is_empty() {
            errors.push(ValidationError::custom(
                "At least one of \"certificate_file\" and \"ca_certificate_file\" fields must be specified",
            ));
        }
        let refresh_interval = match fields.optional::<JsonString>("refresh_interval", &mut errors)
        {
            None => DEFAULT_REFRESH_INTERVAL,
            Some(text) => parse_duration(text).unwrap_or_else(|| {
                errors.push(ValidationError::wrong_type(
                    fields.style().invalid("refresh_interval", "Failed parsing"),
                ));
                DEFAULT_REFRESH_INTERVAL
            }),
        };

        if !errors.is_empty() {
            return Err(ValidationError::Scoped {
                scope: "errors parsing file_watcher config".to_string(),
                errors: errors.into_iter().collect(),
            });
        }
        Ok(Arc::new(FileWatcherConfig {
            certificate_file: certificate_file.to_string(),
            private_key_file: private_key_file.to_string(),
            root_cert_file: root_cert_file.to_string(),
            refresh_interval,
        }))
    }
}

/// Parse a JSON duration string: decimal seconds with an `s` suffix and at
/// most nine fractional digits, e.g. `"600s"` or `"1.5s"`.
pub fn parse_duration(text: &str) -> Option<Duration> {
    let number = text.strip_suffix('s')?;
    let (secs, frac) = match number.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (number, ""),
    };
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: u64 = secs.parse().ok()?;
    let nanos = if frac.is_empty() {
        0
    } else {
        let digits: u32 = frac.parse().ok()?;
        digits * 10u32.pow(9 - frac.len() as u32)
    };
    Some(Duration::new(secs, nanos))
}
