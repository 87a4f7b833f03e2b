//! Error types for metadata mocking

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ElementKind;

/// Errors that can occur while mocking mapping metadata
#[derive(Error, Debug)]
pub enum MockError {
    /// Programming-contract violation in collaborator wiring
    #[error("Assertion failure: {0}")]
    AssertionFailure(String),

    /// Metadata combination that cannot be resolved mechanically
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A class reference could not be resolved
    #[error("Unable to resolve class '{name}' referenced by {context}")]
    UnresolvedClass { name: String, context: String },

    /// A named declaration was supplied without a name
    #[error("{kind} declaration is missing its name")]
    MissingName { kind: ElementKind },

    /// Failed to read a mapping document
    #[error("Failed to read mapping document: {path}")]
    DocumentReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write mocked metadata
    #[error("Failed to write metadata: {path}")]
    DocumentWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl MockError {
    /// Whether this error signals a caller bug rather than bad metadata
    pub fn is_assertion(&self) -> bool {
        matches!(self, MockError::AssertionFailure(_))
    }

    /// Whether this error signals malformed or contradictory metadata
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            MockError::Configuration(_)
                | MockError::UnresolvedClass { .. }
                | MockError::MissingName { .. }
        )
    }
}

/// Result type for mocking operations
pub type MockResult<T> = Result<T, MockError>;
