//! The validated bootstrap and the parser that produces it.

use crate::core::authority::Authority;
use crate::core::certificate_providers::{PluginDefinition, parse_certificate_providers};
use crate::core::fields::{FieldExtractor, JsonObject, JsonString, MessageStyle};
use crate::core::node::Node;
use crate::core::xds_server::{XdsServer, parse_xds_servers};
use crate::error::{Validated, ValidationError, ValidationErrors};
use crate::registry::{CertificateProviderRegistry, ChannelCredsRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default value of `client_default_listener_resource_name_template`.
pub const DEFAULT_CLIENT_LISTENER_TEMPLATE: &str = "%s";

/// Validated, immutable xDS client bootstrap.
///
/// Built once at startup and shared read-only (typically as `Arc<Bootstrap>`)
/// for the lifetime of the xDS client.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    servers: Vec<XdsServer>,
    node: Option<Node>,
    authorities: BTreeMap<String, Authority>,
    client_default_listener_resource_name_template: String,
    server_listener_resource_name_template: String,
    certificate_providers: BTreeMap<String, PluginDefinition>,
}

impl Bootstrap {
    /// The default management server: the first `xds_servers` entry.
    pub fn server(&self) -> &XdsServer {
        static EMPTY: XdsServer = XdsServer {
            server_uri: String::new(),
            channel_creds_type: String::new(),
            channel_creds_config: Value::Null,
            server_features: std::collections::BTreeSet::new(),
        };
        self.servers.first().unwrap_or(&EMPTY)
    }

    /// Every top-level `xds_servers` entry, in document order.
    pub fn servers(&self) -> &[XdsServer] {
        &self.servers
    }

    /// The node descriptor; `None` when the document has no `node` field.
    pub fn node(&self) -> Option<&Node> {
        self.node.as_ref()
    }

    /// Federation authorities by name.
    pub fn authorities(&self) -> &BTreeMap<String, Authority> {
        &self.authorities
    }

    /// Exact, case-sensitive authority lookup.
    pub fn lookup_authority(&self, name: &str) -> Option<&Authority> {
        self.authorities.get(name)
    }

    /// Listener name template for resources outside any authority.
    pub fn client_default_listener_resource_name_template(&self) -> &str {
        &self.client_default_listener_resource_name_template
    }

    /// Listener name template for xDS-enabled servers; may be empty.
    pub fn server_listener_resource_name_template(&self) -> &str {
        &self.server_listener_resource_name_template
    }

    /// Certificate provider instances by name.
    pub fn certificate_providers(&self) -> &BTreeMap<String, PluginDefinition> {
        &self.certificate_providers
    }

    /// Start building a bootstrap from sources.
    pub fn builder() -> crate::core::BootstrapBuilder {
        crate::core::BootstrapBuilder::new()
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            node: None,
            authorities: BTreeMap::new(),
            client_default_listener_resource_name_template: DEFAULT_CLIENT_LISTENER_TEMPLATE
                .to_string(),
            server_listener_resource_name_template: String::new(),
            certificate_providers: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        match &self.node {
            Some(node) => writeln!(f, "  node={node},")?,
            None => writeln!(f, "  node=<none>,")?,
        }
        writeln!(
            f,
            "  client_default_listener_resource_name_template=\"{}\",",
            self.client_default_listener_resource_name_template
        )?;
        if !self.server_listener_resource_name_template.is_empty() {
            writeln!(
                f,
                "  server_listener_resource_name_template=\"{}\",",
                self.server_listener_resource_name_template
            )?;
        }
        writeln!(f, "  servers=[")?;
        for server in &self.servers {
            writeln!(f, "    {server},")?;
        }
        writeln!(f, "  ],")?;
        writeln!(f, "  authorities={{")?;
        for (name, authority) in &self.authorities {
            writeln!(f, "    {name}={{")?;
            writeln!(
                f,
                "      client_listener_resource_name_template=\"{}\",",
                authority.client_listener_resource_name_template
            )?;
            writeln!(f, "      servers=[")?;
            for server in &authority.xds_servers {
                writeln!(f, "        {server},")?;
            }
            writeln!(f, "      ]")?;
            writeln!(f, "    }},")?;
        }
        writeln!(f, "  }},")?;
        writeln!(f, "  certificate_providers={{")?;
        for (name, definition) in &self.certificate_providers {
            writeln!(
                f,
                "    {name}={{plugin_name={}, config={}}},",
                definition.plugin_name, definition.config
            )?;
        }
        writeln!(f, "  }}")?;
        write!(f, "}}")
    }
}

/// Turns a bootstrap JSON document into a [`Bootstrap`].
///
/// Holds the registries consulted for credential types and certificate
/// provider plugins, and whether federation support is on.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::core::BootstrapParser;
/// use serde_json::json;
///
/// let doc = json!({
///     "xds_servers": [{"server_uri": "fake:///lb", "channel_creds": [{"type": "fake"}]}]
/// });
///
/// let bootstrap = BootstrapParser::new().parse(&doc).into_result().unwrap();
/// assert_eq!(bootstrap.server().server_uri, "fake:///lb");
/// assert!(bootstrap.node().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct BootstrapParser {
    channel_creds: Arc<ChannelCredsRegistry>,
    certificate_providers: Arc<CertificateProviderRegistry>,
    federation_enabled: bool,
}

impl BootstrapParser {
    /// Parser with the default registries and federation disabled.
    pub fn new() -> Self {
        Self {
            channel_creds: Arc::new(ChannelCredsRegistry::with_default_types()),
            certificate_providers: Arc::new(CertificateProviderRegistry::with_default_factories()),
            federation_enabled: false,
        }
    }

    /// Use `registry` for channel credential lookups.
    pub fn with_channel_creds(mut self, registry: Arc<ChannelCredsRegistry>) -> Self {
        self.channel_creds = registry;
        self
    }

    /// Use `registry` for certificate provider plugins.
    pub fn with_certificate_providers(
        mut self,
        registry: Arc<CertificateProviderRegistry>,
    ) -> Self {
        self.certificate_providers = registry;
        self
    }

    /// Turn federation support on or off.
    pub fn with_federation(mut self, enabled: bool) -> Self {
        self.federation_enabled = enabled;
        self
    }

    /// Whether federation support is on.
    pub fn federation_enabled(&self) -> bool {
        self.federation_enabled
    }

    /// Validate a bootstrap document.
    ///
    /// Always returns a best-effort [`Bootstrap`] together with every defect
    /// found in the document; an empty error list means success.
    pub fn parse(&self, json: &Value) -> Validated<Bootstrap> {
        let mut errors = ValidationErrors::new();
        let Some(object) = json.as_object() else {
            errors.push(ValidationError::wrong_type("bootstrap document is not an object"));
            return Validated::new(Bootstrap::default(), errors);
        };
        let fields = FieldExtractor::new(object, MessageStyle::Quoted);
        let mut bootstrap = Bootstrap {
            servers: parse_xds_servers(&fields, &self.channel_creds, &mut errors),
            ..Bootstrap::default()
        };

        if let Some(node) = fields.optional::<JsonObject>("node", &mut errors) {
            let mut node_errors = ValidationErrors::new();
            bootstrap.node = Some(Node::parse(node, &mut node_errors));
            errors.push_scoped("errors parsing \"node\" object", node_errors);
        }

        if self.federation_enabled {
            if let Some(authorities) = fields.optional::<JsonObject>("authorities", &mut errors) {
                let mut authorities_errors = ValidationErrors::new();
                for (name, entry) in authorities {
                    let Some(entry) = entry.as_object() else {
                        authorities_errors.push(ValidationError::wrong_type(format!(
                            "element \"{name}\" is not an object"
                        )));
                        continue;
                    };
                    let mut authority_errors = ValidationErrors::new();
                    let authority =
                        Authority::parse(name, entry, &self.channel_creds, &mut authority_errors);
                    authorities_errors.push_scoped(
                        format!("errors parsing authority {name}"),
                        authority_errors,
                    );
                    bootstrap.authorities.insert(name.clone(), authority);
                }
                errors.push_scoped("errors parsing \"authorities\"", authorities_errors);
            }
            if let Some(template) = fields.optional::<JsonString>(
                "client_default_listener_resource_name_template",
                &mut errors,
            ) {
                bootstrap.client_default_listener_resource_name_template = template.to_string();
            }
        } else if fields.raw("authorities").is_some() {
            tracing::warn!(
                "ignoring \"authorities\" in xds bootstrap: federation support is disabled"
            );
        }

        if let Some(template) =
            fields.optional::<JsonString>("server_listener_resource_name_template", &mut errors)
        {
            bootstrap.server_listener_resource_name_template = template.to_string();
        }

        if let Some(providers) =
            fields.optional::<JsonObject>("certificate_providers", &mut errors)
        {
            bootstrap.certificate_providers =
                parse_certificate_providers(providers, &self.certificate_providers, &mut errors);
        }

        if errors.is_empty() {
            tracing::debug!(
                server_uri = %bootstrap.server().server_uri,
                authorities = bootstrap.authorities.len(),
                certificate_providers = bootstrap.certificate_providers.len(),
                "parsed xds bootstrap"
            );
        }
        Validated::new(bootstrap, errors)
    }
}

impl Default for BootstrapParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "xds_servers": [{"server_uri": "fake:///lb", "channel_creds": [{"type": "fake"}]}]
        })
    }

    #[test]
    fn test_minimal_document() {
        let bootstrap = BootstrapParser::new().parse(&minimal()).into_result().unwrap();
        assert_eq!(bootstrap.server().server_uri, "fake:///lb");
        assert_eq!(bootstrap.servers().len(), 1);
        assert!(bootstrap.node().is_none());
        assert!(bootstrap.authorities().is_empty());
        assert!(bootstrap.certificate_providers().is_empty());
        assert_eq!(bootstrap.server_listener_resource_name_template(), "");
        assert_eq!(bootstrap.client_default_listener_resource_name_template(), "%s");
    }

    #[test]
    fn test_empty_node_is_present() {
        let mut doc = minimal();
        doc["node"] = json!({});
        let bootstrap = BootstrapParser::new().parse(&doc).into_result().unwrap();
        assert_eq!(bootstrap.node(), Some(&Node::default()));
    }

    #[test]
    fn test_not_an_object() {
        let result = BootstrapParser::new().parse(&json!([1]));
        assert_eq!(
            result.errors().to_string(),
            "bootstrap document is not an object\n"
        );
        assert_eq!(result.value().server(), &XdsServer::default());
    }

    #[test]
    fn test_authorities_ignored_without_federation() {
        let mut doc = minimal();
        doc["authorities"] = json!({"a.com": 1});
        doc["client_default_listener_resource_name_template"] = json!(7);
        let bootstrap = BootstrapParser::new().parse(&doc).into_result().unwrap();
        assert!(bootstrap.authorities().is_empty());
        assert_eq!(bootstrap.client_default_listener_resource_name_template(), "%s");
    }

    #[test]
    fn test_authority_element_not_object() {
        let mut doc = minimal();
        doc["authorities"] = json!({"a.com": 1});
        let errors = BootstrapParser::new()
            .with_federation(true)
            .parse(&doc)
            .errors()
            .to_string();
        assert_eq!(
            errors,
            "errors parsing \"authorities\":\n  element \"a.com\" is not an object\n"
        );
    }

    #[test]
    fn test_client_default_template_with_federation() {
        let mut doc = minimal();
        doc["client_default_listener_resource_name_template"] =
            json!("xdstp://xds.example.com/envoy.config.listener.v3.Listener/%s");
        let bootstrap = BootstrapParser::new()
            .with_federation(true)
            .parse(&doc)
            .into_result()
            .unwrap();
        assert_eq!(
            bootstrap.client_default_listener_resource_name_template(),
            "xdstp://xds.example.com/envoy.config.listener.v3.Listener/%s"
        );
    }

    #[test]
    fn test_display_lists_parts() {
        let mut doc = minimal();
        doc["node"] = json!({"id": "foo"});
        doc["server_listener_resource_name_template"] = json!("example/resource");
        let bootstrap = BootstrapParser::new().parse(&doc).into_result().unwrap();
        let text = bootstrap.to_string();
        assert!(text.contains("id=\"foo\""));
        assert!(text.contains("server_listener_resource_name_template=\"example/resource\""));
        assert!(text.contains("{uri=fake:///lb, creds_type=fake}"));
    }
}
