//! In-memory bootstrap source.

use super::BootstrapSource;
use crate::error::Result;

/// Bootstrap text held in memory, e.g. a compiled-in fallback.
pub struct JsonSource {
    name: String,
    contents: String,
    priority: i32,
}

impl JsonSource {
    /// Create a source serving `contents`.
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            name: "inline".to_string(),
            contents: contents.into(),
            priority: 50,
        }
    }

    /// Name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl BootstrapSource for JsonSource {
    fn load(&self) -> Result<Option<String>> {
        Ok(Some(self.contents.clone()))
    }

    fn name(&self) -> String {
        format!("json:{}", self.name)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
