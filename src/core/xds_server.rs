//! Management server entries.

use crate::core::fields::{FieldExtractor, JsonArray, JsonObject, JsonString, MessageStyle};
use crate::error::{Validated, ValidationError, ValidationErrors};
use crate::registry::ChannelCredsRegistry;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Server feature: the server speaks xDS v3.
pub const SERVER_FEATURE_XDS_V3: &str = "xds_v3";

/// Server feature: keep cached resources the server stops sending.
pub const SERVER_FEATURE_IGNORE_RESOURCE_DELETION: &str = "ignore_resource_deletion";

/// One xDS management server and how to connect to it.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::core::XdsServer;
/// use xds_bootstrap::registry::ChannelCredsRegistry;
/// use serde_json::json;
///
/// let registry = ChannelCredsRegistry::with_default_types();
/// let entry = json!({
///     "server_uri": "xds.example.com:443",
///     "channel_creds": [{"type": "tls"}, {"type": "google_default"}],
///     "server_features": ["xds_v3"]
/// });
///
/// let server = XdsServer::parse(&entry, &registry).into_result().unwrap();
/// assert_eq!(server.channel_creds_type, "google_default");
/// assert!(server.has_feature("xds_v3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XdsServer {
    /// Target URI of the management server
    pub server_uri: String,
    /// First recognized credential type in the entry's `channel_creds`
    pub channel_creds_type: String,
    /// `config` of the selected credential entry, JSON null when it had none
    pub channel_creds_config: Value,
    /// Capability flags advertised for this server
    pub server_features: BTreeSet<String>,
}

impl XdsServer {
    /// Parse one server entry.
    ///
    /// Errors are reported under an `errors parsing xds server` scope.
    pub fn parse(json: &Value, creds: &ChannelCredsRegistry) -> Validated<XdsServer> {
        let mut inner = ValidationErrors::new();
        let server = match json.as_object() {
            Some(object) => parse_object(object, creds, &mut inner),
            None => {
                inner.push(ValidationError::wrong_type("xds server is not an object"));
                XdsServer::default()
            }
        };
        let mut errors = ValidationErrors::new();
        errors.push_scoped("errors parsing xds server", inner);
        Validated::new(server, errors)
    }

    /// Serialize back to the document shape accepted by [`parse`](Self::parse).
    ///
    /// Only the selected credential entry is emitted.
    pub fn to_json(&self) -> Value {
        let mut creds = Map::new();
        creds.insert("type".to_string(), Value::String(self.channel_creds_type.clone()));
        if !self.channel_creds_config.is_null() {
            creds.insert("config".to_string(), self.channel_creds_config.clone());
        }

        let mut object = Map::new();
        object.insert("server_uri".to_string(), Value::String(self.server_uri.clone()));
        object.insert(
            "channel_creds".to_string(),
            Value::Array(vec![Value::Object(creds)]),
        );
        if !self.server_features.is_empty() {
            object.insert(
                "server_features".to_string(),
                self.server_features
                    .iter()
                    .map(|feature| Value::String(feature.clone()))
                    .collect(),
            );
        }
        Value::Object(object)
    }

    /// Whether the server advertises `feature`.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.server_features.contains(feature)
    }

    /// Whether resource deletions from this server should be ignored.
    pub fn ignore_resource_deletion(&self) -> bool {
        self.has_feature(SERVER_FEATURE_IGNORE_RESOURCE_DELETION)
    }
}

impl fmt::Display for XdsServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{uri={}, creds_type={}",
            self.server_uri, self.channel_creds_type
        )?;
        if !self.channel_creds_config.is_null() {
            write!(f, ", creds_config={}", self.channel_creds_config)?;
        }
        if !self.server_features.is_empty() {
            let features: Vec<&str> = self.server_features.iter().map(String::as_str).collect();
            write!(f, ", server_features=[{}]", features.join(", "))?;
        }
        write!(f, "}}")
    }
}

fn parse_object(
    object: &Map<String, Value>,
    creds: &ChannelCredsRegistry,
    errors: &mut ValidationErrors,
) -> XdsServer {
    let fields = FieldExtractor::new(object, MessageStyle::Tagged);
    let mut server = XdsServer::default();

    if let Some(uri) = fields.required::<JsonString>("server_uri", errors) {
        if uri.is_empty() {
            errors.push(ValidationError::custom(
                fields.style().invalid("server_uri", "must be non-empty"),
            ));
        }
        server.server_uri = uri.to_string();
    }

    match fields.required::<JsonArray>("channel_creds", errors) {
        Some([]) => errors.push(ValidationError::missing_field(
            "field:channel_creds error:does not exist.",
        )),
        Some(entries) => {
            if let Some(selected) = parse_channel_creds(entries, creds, errors) {
                server.channel_creds_type = selected.creds_type;
                server.channel_creds_config = selected.config;
            }
        }
        None => {}
    }

    if let Some(features) = fields.optional::<JsonArray>("server_features", errors) {
        server.server_features = features
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }

    server
}

fn parse_channel_creds(
    entries: &[Value],
    creds: &ChannelCredsRegistry,
    errors: &mut ValidationErrors,
) -> Option<crate::registry::SelectedCreds> {
    let mut array_errors = ValidationErrors::new();
    let mut candidates = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let mut entry_errors = ValidationErrors::new();
        match entry.as_object() {
            None => entry_errors.push(ValidationError::wrong_type("type should be OBJECT")),
            Some(object) => {
                let fields = FieldExtractor::new(object, MessageStyle::Tagged);
                let creds_type = fields.required::<JsonString>("type", &mut entry_errors);
                let config = fields.optional::<JsonObject>("config", &mut entry_errors);
                if let (Some(creds_type), true) = (creds_type, entry_errors.is_empty()) {
                    candidates.push((creds_type, config));
                }
            }
        }
        array_errors.push_scoped(format!("errors parsing index {index}"), entry_errors);
    }

    let selected = creds.select(candidates);
    if selected.is_none() {
        array_errors.push(ValidationError::unrecognized(
            "no known creds type found in \"channel_creds\"",
        ));
    }
    errors.push_scoped("errors parsing \"channel_creds\" array", array_errors);
    selected
}

/// Parse the `xds_servers` field of `fields` into a non-empty list.
///
/// Shared by the bootstrap root and by authorities.
pub(crate) fn parse_xds_servers(
    fields: &FieldExtractor<'_>,
    creds: &ChannelCredsRegistry,
    errors: &mut ValidationErrors,
) -> Vec<XdsServer> {
    let Some(entries) = fields.required::<JsonArray>("xds_servers", errors) else {
        return Vec::new();
    };
    if entries.is_empty() {
        errors.push(ValidationError::missing_field("\"xds_servers\" field is empty"));
        return Vec::new();
    }

    let mut array_errors = ValidationErrors::new();
    let servers = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let (server, server_errors) = XdsServer::parse(entry, creds).into_parts();
            array_errors.push_scoped(format!("errors parsing index {index}"), server_errors);
            server
        })
        .collect();
    errors.push_scoped("errors parsing \"xds_servers\" array", array_errors);
    servers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> ChannelCredsRegistry {
        ChannelCredsRegistry::with_default_types()
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let entry = json!({
            "server_uri": "fake:///lb",
            "channel_creds": [{"type": "fake", "ignore": 0}],
            "ignore": 0
        });
        let server = XdsServer::parse(&entry, &registry()).into_result().unwrap();
        assert_eq!(server.server_uri, "fake:///lb");
        assert_eq!(server.channel_creds_type, "fake");
        assert!(server.channel_creds_config.is_null());
        assert!(server.server_features.is_empty());
    }

    #[test]
    fn test_first_known_creds_in_list_order() {
        let entry = json!({
            "server_uri": "ignored",
            "channel_creds": [
                {"type": "ignored", "ignore": 0},
                {"type": "fake", "config": {"a": 1}},
                {"type": "insecure"}
            ]
        });
        let server = XdsServer::parse(&entry, &registry()).into_result().unwrap();
        assert_eq!(server.channel_creds_type, "fake");
        assert_eq!(server.channel_creds_config, json!({"a": 1}));
    }

    #[test]
    fn test_missing_and_empty_channel_creds() {
        for entry in [
            json!({"server_uri": "fake:///lb"}),
            json!({"server_uri": "fake:///lb", "channel_creds": []}),
        ] {
            let errors = XdsServer::parse(&entry, &registry()).errors().to_string();
            assert!(errors.contains("field:channel_creds error:does not exist."), "{errors}");
            assert!(!errors.contains("no known creds type"), "{errors}");
        }
    }

    #[test]
    fn test_no_known_channel_creds() {
        let entry = json!({"server_uri": "fake:///lb", "channel_creds": [{"type": "unknown"}]});
        let errors = XdsServer::parse(&entry, &registry()).errors().to_string();
        assert_eq!(
            errors,
            "errors parsing xds server:\n\
             \x20 errors parsing \"channel_creds\" array:\n\
             \x20   no known creds type found in \"channel_creds\"\n"
        );
    }

    #[test]
    fn test_wrong_types_are_all_reported() {
        let entry = json!({"server_uri": 1, "channel_creds": 1, "server_features": "xds_v3"});
        let errors = XdsServer::parse(&entry, &registry()).errors().to_string();
        assert_eq!(
            errors,
            "errors parsing xds server:\n\
             \x20 field:server_uri error:type should be STRING\n\
             \x20 field:channel_creds error:type should be ARRAY\n\
             \x20 field:server_features error:type should be ARRAY\n"
        );
    }

    #[test]
    fn test_channel_creds_entry_errors_are_scoped() {
        let entry = json!({
            "server_uri": "foo",
            "channel_creds": [{"type": 0, "config": 1}, 7]
        });
        let errors = XdsServer::parse(&entry, &registry()).errors().to_string();
        let expected = [
            "errors parsing xds server:",
            "errors parsing \"channel_creds\" array:",
            "errors parsing index 0:",
            "field:type error:type should be STRING",
            "field:config error:type should be OBJECT",
            "errors parsing index 1:",
            "type should be OBJECT",
            "no known creds type found in \"channel_creds\"",
        ];
        let mut cursor = 0;
        for needle in expected {
            let found = errors[cursor..]
                .find(needle)
                .unwrap_or_else(|| panic!("{needle} in {errors}"));
            cursor += found + needle.len();
        }
    }

    #[test]
    fn test_empty_server_uri() {
        let entry = json!({"server_uri": "", "channel_creds": [{"type": "fake"}]});
        let errors = XdsServer::parse(&entry, &registry()).errors().to_string();
        assert!(errors.contains("field:server_uri error:must be non-empty"));
    }

    #[test]
    fn test_not_an_object() {
        let errors = XdsServer::parse(&json!([]), &registry()).errors().to_string();
        assert_eq!(errors, "errors parsing xds server:\n  xds server is not an object\n");
    }

    #[test]
    fn test_server_features_skip_non_strings() {
        let entry = json!({
            "server_uri": "fake:///lb",
            "channel_creds": [{"type": "fake"}],
            "server_features": ["xds_v3", 3, "ignore_resource_deletion", "custom"]
        });
        let server = XdsServer::parse(&entry, &registry()).into_result().unwrap();
        assert_eq!(server.server_features.len(), 3);
        assert!(server.has_feature(SERVER_FEATURE_XDS_V3));
        assert!(server.ignore_resource_deletion());
        assert!(server.has_feature("custom"));
    }

    #[test]
    fn test_to_json_and_parse() {
        let entry = json!({
            "server_uri": "fake:///lb",
            "channel_creds": [{"type": "unknown"}, {"type": "fake", "config": {"k": 1.50}, "ignore": 0}],
            "server_features": ["xds_v3"],
            "ignore": 0
        });
        let server = XdsServer::parse(&entry, &registry()).into_result().unwrap();
        let output = server.to_json();
        assert_eq!(
            output,
            json!({
                "server_uri": "fake:///lb",
                "channel_creds": [{"type": "fake", "config": {"k": 1.50}}],
                "server_features": ["xds_v3"]
            })
        );
        let reparsed = XdsServer::parse(&output, &registry()).into_result().unwrap();
        assert_eq!(reparsed, server);
    }

    #[test]
    fn test_list_scopes() {
        let doc = json!({"xds_servers": [{}]});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Quoted);
        let servers = parse_xds_servers(&fields, &registry(), &mut errors);

        assert_eq!(servers.len(), 1);
        let report = errors.to_string();
        assert!(report.starts_with(
            "errors parsing \"xds_servers\" array:\n  errors parsing index 0:\n    errors parsing xds server:\n      field:server_uri error:does not exist.\n"
        ));
    }

    #[test]
    fn test_list_empty_and_missing() {
        let registry = registry();
        for (doc, message) in [
            (json!({}), "\"xds_servers\" field not present"),
            (json!({"xds_servers": []}), "\"xds_servers\" field is empty"),
            (json!({"xds_servers": {}}), "\"xds_servers\" field is not an array"),
        ] {
            let mut errors = ValidationErrors::new();
            let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Quoted);
            assert!(parse_xds_servers(&fields, &registry, &mut errors).is_empty());
            assert_eq!(errors.to_string(), format!("{message}\n"));
        }
    }
}
