//! The client's self-description sent to management servers.

use crate::core::fields::{FieldExtractor, JsonObject, JsonString, MessageStyle};
use crate::error::ValidationErrors;
use serde_json::{Map, Value};
use std::fmt;

/// Node descriptor from the bootstrap `node` object.
///
/// `metadata` is kept as untyped JSON; numbers retain their literal text so
/// they are echoed to the server exactly as written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Node identifier
    pub id: String,
    /// Service cluster
    pub cluster: String,
    /// Locality region
    pub locality_region: String,
    /// Locality zone
    pub locality_zone: String,
    /// Locality sub-zone
    pub locality_sub_zone: String,
    /// Opaque metadata object, passed through verbatim
    pub metadata: Map<String, Value>,
}

impl Node {
    /// Parse a `node` object. Every field is optional.
    pub(crate) fn parse(object: &Map<String, Value>, errors: &mut ValidationErrors) -> Node {
        let fields = FieldExtractor::new(object, MessageStyle::Quoted);
        let mut node = Node::default();

        if let Some(id) = fields.optional::<JsonString>("id", errors) {
            node.id = id.to_string();
        }
        if let Some(cluster) = fields.optional::<JsonString>("cluster", errors) {
            node.cluster = cluster.to_string();
        }
        if let Some(locality) = fields.optional::<JsonObject>("locality", errors) {
            let mut locality_errors = ValidationErrors::new();
            node.parse_locality(locality, &mut locality_errors);
            errors.push_scoped("errors parsing \"locality\" object", locality_errors);
        }
        if let Some(metadata) = fields.optional::<JsonObject>("metadata", errors) {
            node.metadata = metadata.clone();
        }

        node
    }

    fn parse_locality(&mut self, object: &Map<String, Value>, errors: &mut ValidationErrors) {
        let fields = FieldExtractor::new(object, MessageStyle::Quoted);
        if let Some(region) = fields.optional::<JsonString>("region", errors) {
            self.locality_region = region.to_string();
        }
        if let Some(zone) = fields.optional::<JsonString>("zone", errors) {
            self.locality_zone = zone.to_string();
        }
        if let Some(sub_zone) = fields.optional::<JsonString>("sub_zone", errors) {
            self.locality_sub_zone = sub_zone.to_string();
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{id=\"{}\", cluster=\"{}\", locality={{region=\"{}\", zone=\"{}\", sub_zone=\"{}\"}}, metadata={}}}",
            self.id,
            self.cluster,
            self.locality_region,
            self.locality_zone,
            self.locality_sub_zone,
            Value::Object(self.metadata.clone()),
        )
    }
}
