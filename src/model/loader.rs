//! Mapping document loading
//!
//! Loads mapping documents and annotation index snapshots from disk, handling
//! JSON and YAML parsing.
//!
//! Directory loading skips files that fail to parse and reports them in the
//! result instead of aborting.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{MockError, MockResult};
use crate::index::AnnotationIndex;
use crate::models::{MappingDocument, StructuralElement};

/// Serialization format of a document on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from the file extension; anything but `.json` is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }

    fn is_document(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("json" | "yaml" | "yml")
        )
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> MockResult<T> {
        match self {
            DocumentFormat::Json => Ok(serde_json::from_str(content)?),
            DocumentFormat::Yaml => Ok(serde_yaml::from_str(content)?),
        }
    }
}

/// On-disk shape of an annotation index snapshot
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexSnapshot {
    Elements(Vec<StructuralElement>),
    Index(AnnotationIndex),
}

/// Result of loading every document in a directory
#[derive(Debug, Default)]
pub struct DocumentLoadResult {
    /// Parsed documents, ordered by file name
    pub documents: Vec<(PathBuf, MappingDocument)>,
    /// Files that could not be read or parsed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Loads mapping documents and index snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentLoader;

impl DocumentLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load one mapping document
    pub fn load_document(&self, path: &Path) -> MockResult<MappingDocument> {
        let content = read(path)?;
        let document: MappingDocument = DocumentFormat::from_path(path).parse(&content)?;
        info!(
            path = %path.display(),
            entities = document.entities.len(),
            "Loaded mapping document"
        );
        Ok(document)
    }

    /// Load every `.json`, `.yaml` and `.yml` document directly inside `dir`
    pub fn load_directory(&self, dir: &Path) -> MockResult<DocumentLoadResult> {
        let entries = fs::read_dir(dir).map_err(|source| MockError::DocumentReadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && DocumentFormat::is_document(path))
            .collect();
        paths.sort();

        let mut result = DocumentLoadResult::default();
        for path in paths {
            match self.load_document(&path) {
                Ok(document) => result.documents.push((path, document)),
                Err(e) => {
                    warn!("Failed to load mapping document {}: {}", path.display(), e);
                    result.failed.push((path, e.to_string()));
                }
            }
        }

        info!(
            "Loaded {} mapping documents ({} failed) from {}",
            result.documents.len(),
            result.failed.len(),
            dir.display()
        );
        Ok(result)
    }

    /// Load an annotation index snapshot
    ///
    /// Accepts either a serialized index or a flat list of targeted elements.
    pub fn load_index(&self, path: &Path) -> MockResult<AnnotationIndex> {
        let content = read(path)?;
        let index = match DocumentFormat::from_path(path).parse::<IndexSnapshot>(&content)? {
            IndexSnapshot::Index(index) => index,
            IndexSnapshot::Elements(elements) => {
                let total = elements.len();
                let index = AnnotationIndex::from_elements(elements);
                if index.len() < total {
                    warn!(
                        skipped = total - index.len(),
                        "Index snapshot contains elements without a target"
                    );
                }
                index
            }
        };
        info!(path = %path.display(), elements = index.len(), "Loaded index snapshot");
        Ok(index)
    }
}

fn read(path: &Path) -> MockResult<String> {
    fs::read_to_string(path).map_err(|source| MockError::DocumentReadError {
        path: path.to_path_buf(),
        source,
    })
}
