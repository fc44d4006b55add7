//! Error types for xds-bootstrap.
//!
//! Parsing never stops at the first defect. Every parser records what it finds
//! into a [`ValidationErrors`] list and keeps going with a best-effort value, and
//! parent parsers fold their children's lists in under a named scope. The final
//! report therefore covers the whole document in one pass.

use std::fmt;

/// Result type alias for xds-bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Errors that can occur when loading a bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Failed to read bootstrap content from a source.
    #[error("Failed to load bootstrap: {0}")]
    LoadError(String),

    /// None of the configured sources produced a bootstrap document.
    #[error("No bootstrap source available: {0}")]
    NotFound(String),

    /// The bootstrap text is not valid JSON.
    #[error("Failed to parse bootstrap JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The document parsed as JSON but failed validation.
    #[error("errors parsing xds bootstrap:\n{0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for BootstrapError {
    fn from(errors: ValidationErrors) -> Self {
        BootstrapError::Validation(errors)
    }
}

/// A single defect found while validating a bootstrap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    MissingField(String),

    /// A field is present with an incompatible JSON type.
    WrongType(String),

    /// A credential type or plugin name is not in the relevant registry.
    UnrecognizedValue(String),

    /// An authority's listener resource name template fails the prefix rule.
    MalformedTemplate(String),

    /// Free-form message, e.g. reported verbatim by a plugin factory.
    Custom(String),

    /// Errors nested under a named scope such as `errors parsing index 0`.
    Scoped {
        /// Description of the enclosing scope
        scope: String,
        /// Errors found inside the scope, in discovery order
        errors: Vec<ValidationError>,
    },
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a missing-field error.
    pub fn missing_field(msg: impl Into<String>) -> Self {
        Self::MissingField(msg.into())
    }

    /// Create a wrong-type error.
    pub fn wrong_type(msg: impl Into<String>) -> Self {
        Self::WrongType(msg.into())
    }

    /// Create an unrecognized-value error.
    pub fn unrecognized(msg: impl Into<String>) -> Self {
        Self::UnrecognizedValue(msg.into())
    }

    /// Create a malformed-template error.
    pub fn malformed_template(msg: impl Into<String>) -> Self {
        Self::MalformedTemplate(msg.into())
    }

    /// Total number of leaf errors in this error, descending into scopes.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Scoped { errors, .. } => errors.iter().map(Self::leaf_count).sum(),
            _ => 1,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        match self {
            Self::MissingField(msg)
            | Self::WrongType(msg)
            | Self::UnrecognizedValue(msg)
            | Self::MalformedTemplate(msg)
            | Self::Custom(msg) => writeln!(f, "{:indent$}{}", "", msg),
            Self::Scoped { scope, errors } => {
                writeln!(f, "{:indent$}{}:", "", scope)?;
                for err in errors {
                    err.write_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors.
///
/// Errors keep the order in which checks ran: declared field order, then array
/// index order, then map iteration order for object-valued fields.
///
/// # Examples
///
/// ```rust
/// use xds_bootstrap::error::{ValidationError, ValidationErrors};
///
/// let mut inner = ValidationErrors::new();
/// inner.push(ValidationError::missing_field("field:server_uri error:does not exist."));
///
/// let mut outer = ValidationErrors::new();
/// outer.push_scoped("errors parsing xds server", inner);
///
/// let report = outer.to_string();
/// assert!(report.starts_with("errors parsing xds server:\n"));
/// assert!(report.contains("  field:server_uri error:does not exist."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create an empty error list.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one error.
    pub fn push(&mut self, err: ValidationError) {
        self.errors.push(err);
    }

    /// Wrap a child parser's errors under `scope` and record them.
    ///
    /// An empty child leaves this list untouched.
    pub fn push_scoped(&mut self, scope: impl Into<String>, child: ValidationErrors) {
        if child.is_empty() {
            return;
        }
        self.errors.push(ValidationError::Scoped {
            scope: scope.into(),
            errors: child.errors,
        });
    }

    /// Append another list without adding a scope.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.errors.extend(other.errors);
    }

    /// Whether no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of top-level entries (scopes count once).
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the top-level entries.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// `Ok(value)` when empty, otherwise the errors.
    ///
    /// # Errors
    ///
    /// Returns `self` if any error was recorded.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in &self.errors {
            err.write_indented(f, 0)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        Self { errors: vec![err] }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// A best-effort parse result together with every error found producing it.
#[derive(Debug, Clone)]
pub struct Validated<T> {
    value: T,
    errors: ValidationErrors,
}

impl<T> Validated<T> {
    /// Pair a value with its errors.
    pub fn new(value: T, errors: ValidationErrors) -> Self {
        Self { value, errors }
    }

    /// The best-effort value. Only trustworthy when [`is_ok`](Self::is_ok).
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The errors recorded during parsing.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether parsing found no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Split into value and errors.
    pub fn into_parts(self) -> (T, ValidationErrors) {
        (self.value, self.errors)
    }

    /// Discard the best-effort value if anything went wrong.
    ///
    /// # Errors
    ///
    /// Returns the collected errors if the list is non-empty.
    pub fn into_result(self) -> std::result::Result<T, ValidationErrors> {
        self.errors.into_result(self.value)
    }
}
