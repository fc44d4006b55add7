//! Typed field extraction from JSON objects.
//!
//! A failed extraction records one error and returns `None`; callers pick the
//! default that lets parsing continue. Sibling checks are never skipped.

use crate::error::{ValidationError, ValidationErrors};
use serde_json::{Map, Number, Value};

/// How field errors are phrased.
///
/// The bootstrap root, node, authorities and certificate providers describe
/// fields as `"name" field ...`; server entries use `field:name error:...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    /// `"id" field not present`, `"id" field is not a string`
    Quoted,
    /// `field:type error:does not exist.`, `field:type error:type should be STRING`
    Tagged,
}

impl MessageStyle {
    pub(crate) fn missing(self, field: &str) -> String {
        match self {
            Self::Quoted => format!("\"{field}\" field not present"),
            Self::Tagged => format!("field:{field} error:does not exist."),
        }
    }

    pub(crate) fn wrong_type(self, field: &str, description: &str, tag: &str) -> String {
        match self {
            Self::Quoted => format!("\"{field}\" field is not {description}"),
            Self::Tagged => format!("field:{field} error:type should be {tag}"),
        }
    }

    /// A present, well-typed field whose value breaks a rule.
    pub(crate) fn invalid(self, field: &str, problem: &str) -> String {
        match self {
            Self::Quoted => format!("\"{field}\" field {problem}"),
            Self::Tagged => format!("field:{field} error:{problem}"),
        }
    }
}

/// A JSON value type that can be pulled out of a field.
pub trait JsonKind<'a> {
    /// Borrowed view of the value.
    type Output;

    /// Phrase used in quoted-style messages, e.g. `a string`.
    const DESCRIPTION: &'static str;

    /// Tag used in tagged-style messages, e.g. `STRING`.
    const TAG: &'static str;

    /// Return the value if it has this type.
    fn extract(value: &'a Value) -> Option<Self::Output>;
}

/// JSON string.
pub struct JsonString;

/// JSON object.
pub struct JsonObject;

/// JSON array.
pub struct JsonArray;

/// JSON number, kept in its literal form.
pub struct JsonNumber;

/// JSON boolean.
pub struct JsonBool;

impl<'a> JsonKind<'a> for JsonString {
    type Output = &'a str;
    const DESCRIPTION: &'static str = "a string";
    const TAG: &'static str = "STRING";

    fn extract(value: &'a Value) -> Option<Self::Output> {
        value.as_str()
    }
}

impl<'a> JsonKind<'a> for JsonObject {
    type Output = &'a Map<String, Value>;
    const DESCRIPTION: &'static str = "an object";
    const TAG: &'static str = "OBJECT";

    fn extract(value: &'a Value) -> Option<Self::Output> {
        value.as_object()
    }
}

impl<'a> JsonKind<'a> for JsonArray {
    type Output = &'a [Value];
    const DESCRIPTION: &'static str = "an array";
    const TAG: &'static str = "ARRAY";

    fn extract(value: &'a Value) -> Option<Self::Output> {
        value.as_array().map(Vec::as_slice)
    }
}

impl<'a> JsonKind<'a> for JsonNumber {
    type Output = &'a Number;
    const DESCRIPTION: &'static str = "a number";
    const TAG: &'static str = "NUMBER";

    fn extract(value: &'a Value) -> Option<Self::Output> {
        match value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl<'a> JsonKind<'a> for JsonBool {
    type Output = bool;
    const DESCRIPTION: &'static str = "a boolean";
    const TAG: &'static str = "BOOLEAN";

    fn extract(value: &'a Value) -> Option<Self::Output> {
        value.as_bool()
    }
}

/// Pulls typed fields out of one JSON object.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::core::fields::{FieldExtractor, JsonString, MessageStyle};
/// use xds_bootstrap::error::ValidationErrors;
/// use serde_json::json;
///
/// let doc = json!({"id": 7});
/// let mut errors = ValidationErrors::new();
/// let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Quoted);
///
/// let id = fields.optional::<JsonString>("id", &mut errors).unwrap_or_default();
/// let cluster = fields.optional::<JsonString>("cluster", &mut errors).unwrap_or_default();
///
/// assert_eq!(id, "");
/// assert_eq!(cluster, "");
/// assert_eq!(errors.to_string(), "\"id\" field is not a string\n");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'a> {
    object: &'a Map<String, Value>,
    style: MessageStyle,
}

impl<'a> FieldExtractor<'a> {
    /// Wrap an object, phrasing errors in `style`.
    pub fn new(object: &'a Map<String, Value>, style: MessageStyle) -> Self {
        Self { object, style }
    }

    /// How this extractor phrases its errors.
    pub fn style(&self) -> MessageStyle {
        self.style
    }

    /// Raw access to a field without type checking.
    pub fn raw(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field)
    }

    /// Extract a field that must be present.
    ///
    /// Records a missing-field or wrong-type error and returns `None` on failure.
    pub fn required<K: JsonKind<'a>>(
        &self,
        field: &str,
        errors: &mut ValidationErrors,
    ) -> Option<K::Output> {
        match self.object.get(field) {
            None => {
                errors.push(ValidationError::missing_field(self.style.missing(field)));
                None
            }
            Some(value) => self.typed::<K>(field, value, errors),
        }
    }

    /// Extract a field that may be absent.
    ///
    /// Absence is silent; a wrong type records an error. Both return `None`.
    pub fn optional<K: JsonKind<'a>>(
        &self,
        field: &str,
        errors: &mut ValidationErrors,
    ) -> Option<K::Output> {
        let value = self.object.get(field)?;
        self.typed::<K>(field, value, errors)
    }

    fn typed<K: JsonKind<'a>>(
        &self,
        field: &str,
        value: &'a Value,
        errors: &mut ValidationErrors,
    ) -> Option<K::Output> {
        let extracted = K::extract(value);
        if extracted.is_none() {
            errors.push(ValidationError::wrong_type(self.style.wrong_type(
                field,
                K::DESCRIPTION,
                K::TAG,
            )));
        }
        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_missing_tagged() {
        let doc = json!({});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Tagged);

        assert!(fields.required::<JsonString>("server_uri", &mut errors).is_none());
        assert_eq!(
            errors.iter().next(),
            Some(&ValidationError::MissingField(
                "field:server_uri error:does not exist.".to_string()
            ))
        );
    }

    #[test]
    fn test_wrong_type_messages() {
        let doc = json!({"a": 1, "b": "x", "c": [], "d": {}});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Quoted);

        assert!(fields.required::<JsonArray>("a", &mut errors).is_none());
        assert!(fields.required::<JsonObject>("b", &mut errors).is_none());
        assert!(fields.required::<JsonNumber>("c", &mut errors).is_none());
        assert!(fields.required::<JsonString>("d", &mut errors).is_none());

        assert_eq!(
            errors.to_string(),
            "\"a\" field is not an array\n\
             \"b\" field is not an object\n\
             \"c\" field is not a number\n\
             \"d\" field is not a string\n"
        );
    }

    #[test]
    fn test_optional_absent_is_silent() {
        let doc = json!({});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Quoted);

        assert!(fields.optional::<JsonObject>("locality", &mut errors).is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_valid_values() {
        let doc = json!({"uri": "fake:///lb", "n": 10, "flag": true, "list": [1, 2]});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Tagged);

        assert_eq!(fields.required::<JsonString>("uri", &mut errors), Some("fake:///lb"));
        assert_eq!(
            fields.required::<JsonNumber>("n", &mut errors).map(ToString::to_string),
            Some("10".to_string())
        );
        assert_eq!(fields.required::<JsonBool>("flag", &mut errors), Some(true));
        assert_eq!(fields.required::<JsonArray>("list", &mut errors).map(<[Value]>::len), Some(2));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_tagged_wrong_type() {
        let doc = json!({"channel_creds": 1});
        let mut errors = ValidationErrors::new();
        let fields = FieldExtractor::new(doc.as_object().unwrap(), MessageStyle::Tagged);

        fields.required::<JsonArray>("channel_creds", &mut errors);
        assert_eq!(
            errors.to_string(),
            "field:channel_creds error:type should be ARRAY\n"
        );
    }

    #[test]
    fn test_invalid_value_phrasing() {
        assert_eq!(
            MessageStyle::Quoted.invalid(
                "client_listener_resource_name_template",
                "must begin with \"xdstp://a/\""
            ),
            "\"client_listener_resource_name_template\" field must begin with \"xdstp://a/\""
        );
        assert_eq!(
            MessageStyle::Tagged.invalid("server_uri", "must be non-empty"),
            "field:server_uri error:must be non-empty"
        );
    }
}
