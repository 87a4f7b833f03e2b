//! Metadata saving functionality
//!
//! Writes mocked metadata to disk, handling JSON and YAML serialization.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::loader::DocumentFormat;
use crate::error::{MockError, MockResult};
use crate::session::MockedMetadata;

/// Writes session output in a chosen format
#[derive(Debug, Clone, Copy)]
pub struct MetadataSaver {
    format: DocumentFormat,
}

impl MetadataSaver {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    /// Serialize `value` in this saver's format
    pub fn render<T: Serialize>(&self, value: &T) -> MockResult<String> {
        match self.format {
            DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
            DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    /// Save mocked metadata to `path`
    pub fn save(&self, metadata: &MockedMetadata, path: &Path) -> MockResult<()> {
        let content = self.render(metadata)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| MockError::DocumentWriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| MockError::DocumentWriteError {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Saved metadata for {} classes and {} global declarations to {}",
            metadata.classes.len(),
            metadata.globals.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockerConfig;
    use crate::models::{EntityObjectSource, MappingDocument};
    use crate::session::MockingSession;
    use tempfile::TempDir;

    fn metadata() -> MockedMetadata {
        let mut session = MockingSession::new(MockerConfig::new());
        let mut document = MappingDocument::default();
        let mut entity = EntityObjectSource::new("Order");
        entity.exclude_default_listeners = true;
        document.entities.push(entity);
        session.mock_document(&document).unwrap();
        session.finish()
    }

    #[test]
    fn test_save_json_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("metadata.json");

        MetadataSaver::new(DocumentFormat::Json)
            .save(&metadata(), &path)
            .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["classes"]["Order"]["annotations"]["ExcludeDefaultListeners"].is_array());
        assert!(written["globals"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_render_yaml() {
        let rendered = MetadataSaver::new(DocumentFormat::Yaml)
            .render(&metadata())
            .unwrap();
        assert!(rendered.contains("ExcludeDefaultListeners"));
    }
}
