//! CLI error types

use std::path::PathBuf;
use thiserror::Error;

use mapping_mocker::MockError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{failed} mapping document(s) could not be loaded")]
    DocumentsFailed { failed: usize },

    #[error(transparent)]
    Mock(#[from] MockError),
}
