//! File-based bootstrap source.

use super::BootstrapSource;
use crate::error::{BootstrapError, Result};
use std::path::PathBuf;

/// Bootstrap read from an explicit file path.
///
/// Unlike the environment sources this one is always configured, so a missing
/// file is an error rather than a fall-through.
///
/// # Examples
///
/// ```rust,no_run
/// use xds_bootstrap::sources::FileSource;
///
/// let source = FileSource::new("/etc/xds/bootstrap.json");
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
}

impl FileSource {
    /// Create a new file source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources are consulted first.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl BootstrapSource for FileSource {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Err(BootstrapError::LoadError(format!(
                "Bootstrap file not found: {}",
                self.path.display()
            )));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(contents))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
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

    #[test]
    fn test_load_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bootstrap.json");
        fs::write(&path, r#"{"xds_servers": []}"#).unwrap();

        let source = FileSource::new(&path);
        assert_eq!(
            source.load().unwrap().as_deref(),
            Some(r#"{"xds_servers": []}"#)
        );
    }

    #[test]
    fn test_load_nonexistent_file() {
        let source = FileSource::new("/nonexistent/bootstrap.json");
        assert!(matches!(source.load(), Err(BootstrapError::LoadError(_))));
    }

    #[test]
    fn test_with_priority() {
        let source = FileSource::new("bootstrap.json").with_priority(200);
        assert_eq!(source.priority(), 200);
    }

    #[test]
    fn test_name() {
        let source = FileSource::new("bootstrap.json");
        assert!(source.name().contains("bootstrap.json"));
    }
}
