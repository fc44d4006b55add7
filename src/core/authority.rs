//! Federation authorities.

use crate::core::fields::{FieldExtractor, JsonString, MessageStyle};
use crate::core::xds_server::{XdsServer, parse_xds_servers};
use crate::error::{ValidationError, ValidationErrors};
use crate::registry::ChannelCredsRegistry;
use serde_json::{Map, Value};

/// Scheme of federated resource names.
pub const XDSTP_SCHEME: &str = "xdstp://";

const TEMPLATE_FIELD: &str = "client_listener_resource_name_template";

/// A named federation scope with its own management servers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authority {
    /// Authority name, the key in the `authorities` map
    pub name: String,
    /// Template for client listener resource names in this authority
    pub client_listener_resource_name_template: String,
    /// Servers for this authority, in document order
    pub xds_servers: Vec<XdsServer>,
}

impl Authority {
    /// Parse one authority entry.
    pub(crate) fn parse(
        name: &str,
        object: &Map<String, Value>,
        creds: &ChannelCredsRegistry,
        errors: &mut ValidationErrors,
    ) -> Authority {
        let fields = FieldExtractor::new(object, MessageStyle::Quoted);
        let mut authority = Authority {
            name: name.to_string(),
            ..Authority::default()
        };

        if let Some(template) = fields.required::<JsonString>(TEMPLATE_FIELD, errors) {
            if let Err(err) = validate_template(name, template) {
                errors.push(err);
            }
            authority.client_listener_resource_name_template = template.to_string();
        }
        authority.xds_servers = parse_xds_servers(&fields, creds, errors);

        authority
    }
}

/// Required prefix of listener templates in authority `name`.
pub fn template_prefix(name: &str) -> String {
    format!("{XDSTP_SCHEME}{name}/")
}

/// Check that `template` starts with `xdstp://<name>/`.
///
/// # Errors
///
/// Returns a malformed-template error naming the required prefix.
pub fn validate_template(name: &str, template: &str) -> Result<(), ValidationError> {
    let prefix = template_prefix(name);
    if template.starts_with(&prefix) {
        Ok(())
    } else {
        Err(ValidationError::malformed_template(MessageStyle::Quoted.invalid(
            TEMPLATE_FIELD,
            &format!("must begin with \"{prefix}\""),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, doc: Value) -> (Authority, ValidationErrors) {
        let mut errors = ValidationErrors::new();
        let authority = Authority::parse(
            name,
            doc.as_object().unwrap(),
            &ChannelCredsRegistry::with_default_types(),
            &mut errors,
        );
        (authority, errors)
    }

    #[test]
    fn test_valid_authority() {
        let (authority, errors) = parse(
            "xds.example.com",
            json!({
                "client_listener_resource_name_template":
                    "xdstp://xds.example.com/envoy.config.listener.v3.Listener/grpc/server/%s",
                "xds_servers": [{
                    "server_uri": "fake:///xds_server",
                    "channel_creds": [{"type": "fake"}],
                    "server_features": ["xds_v3"]
                }]
            }),
        );
        assert!(errors.is_empty(), "{errors}");
        assert_eq!(authority.name, "xds.example.com");
        assert_eq!(authority.xds_servers.len(), 1);
        assert_eq!(authority.xds_servers[0].server_uri, "fake:///xds_server");
    }

    #[test]
    fn test_wrong_scheme() {
        let err = validate_template(
            "xds.example.com",
            "xds://xds.example.com/envoy.config.listener.v3.Listener/grpc/server/%s",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedTemplate(
                "\"client_listener_resource_name_template\" field must begin with \"xdstp://xds.example.com/\""
                    .to_string()
            )
        );
    }

    #[test]
    fn test_prefix_must_name_this_authority() {
        assert!(validate_template("a.com", "xdstp://a.com/x").is_ok());
        assert!(validate_template("a.com", "xdstp://b.com/x").is_err());
        assert!(validate_template("a.com", "xdstp://a.com").is_err());
        assert!(validate_template("A.com", "xdstp://a.com/x").is_err());
    }

    #[test]
    fn test_missing_fields() {
        let (_, errors) = parse("a.com", json!({}));
        assert_eq!(
            errors.to_string(),
            "\"client_listener_resource_name_template\" field not present\n\
             \"xds_servers\" field not present\n"
        );
    }
}
