//! The `certificate_providers` map.

use crate::core::fields::{FieldExtractor, JsonObject, JsonString, MessageStyle};
use crate::error::{ValidationError, ValidationErrors};
use crate::registry::{CertificateProviderConfig, CertificateProviderRegistry};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named certificate provider instance configured in the bootstrap.
#[derive(Debug, Clone)]
pub struct PluginDefinition {
    /// Factory name the config was parsed by
    pub plugin_name: String,
    /// Factory-specific parsed config
    pub config: Arc<dyn CertificateProviderConfig>,
}

impl PluginDefinition {
    /// Downcast the config to the factory's concrete type.
    pub fn config_as<T: 'static>(&self) -> Option<&T> {
        self.config.as_any().downcast_ref::<T>()
    }
}

/// Parse every entry of a `certificate_providers` object.
///
/// Entries with errors are left out of the returned map. Errors are reported
/// under `errors parsing "certificate_providers" object`.
pub(crate) fn parse_certificate_providers(
    object: &Map<String, Value>,
    registry: &CertificateProviderRegistry,
    errors: &mut ValidationErrors,
) -> BTreeMap<String, PluginDefinition> {
    let mut providers = BTreeMap::new();
    let mut store_errors = ValidationErrors::new();

    for (key, element) in object {
        let Some(element) = element.as_object() else {
            store_errors.push(ValidationError::wrong_type(format!(
                "element \"{key}\" is not an object"
            )));
            continue;
        };
        let mut element_errors = ValidationErrors::new();
        if let Some(definition) = parse_element(element, registry, &mut element_errors) {
            providers.insert(key.clone(), definition);
        }
        store_errors.push_scoped(format!("errors parsing element \"{key}\""), element_errors);
    }

    errors.push_scoped("errors parsing \"certificate_providers\" object", store_errors);
    providers
}

fn parse_element(
    element: &Map<String, Value>,
    registry: &CertificateProviderRegistry,
    errors: &mut ValidationErrors,
) -> Option<PluginDefinition> {
    let fields = FieldExtractor::new(element, MessageStyle::Quoted);
    let plugin_name = fields.required::<JsonString>("plugin_name", errors);
    let factory = plugin_name.and_then(|name| {
        let factory = registry.lookup(name);
        if factory.is_none() {
            errors.push(ValidationError::unrecognized(format!(
                "Unrecognized plugin name: {name}"
            )));
        }
        factory
    });

    let empty = Map::new();
    let config = match fields.raw("config") {
        None => Some(&empty),
        Some(_) => fields.optional::<JsonObject>("config", errors),
    };

    let (plugin_name, factory, config) = (plugin_name?, factory?, config?);
    match factory.create_config(config) {
        Ok(config) => Some(PluginDefinition {
            plugin_name: plugin_name.to_string(),
            config,
        }),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}
