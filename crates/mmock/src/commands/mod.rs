//! CLI command implementations

pub mod globals;
pub mod mock;

use std::path::PathBuf;

use mapping_mocker::{
    DocumentFormat, DocumentLoader, MappingDocument, MockerConfig, MockingSession,
};
use tracing::warn;

use crate::error::CliError;

/// Options shared by every command that runs a mocking session
#[derive(Debug, Clone, Default)]
pub struct SessionArgs {
    pub inputs: Vec<PathBuf>,
    pub index: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub package: Option<String>,
    pub strict: bool,
    pub keep_going: bool,
}

/// Load the session configuration file and apply command-line overrides
pub fn load_config(args: &SessionArgs) -> Result<MockerConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::FileReadError(path.clone(), e.to_string()))?;
            DocumentFormat::from_path(path).parse::<MockerConfig>(&content)?
        }
        None => MockerConfig::new(),
    };
    if let Some(package) = &args.package {
        config.defaults.package = Some(package.clone());
    }
    if args.strict {
        config.strict_class_resolution = true;
    }
    Ok(config)
}

/// Load every input document; directories contribute the documents they contain
pub fn load_documents(args: &SessionArgs) -> Result<Vec<(PathBuf, MappingDocument)>, CliError> {
    if args.inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one mapping document or directory is required".to_string(),
        ));
    }
    let loader = DocumentLoader::new();
    let mut documents = Vec::new();
    let mut failed = 0;
    for input in &args.inputs {
        if input.is_dir() {
            let result = loader.load_directory(input)?;
            failed += result.failed.len();
            documents.extend(result.documents);
        } else {
            match loader.load_document(input) {
                Ok(document) => documents.push((input.clone(), document)),
                Err(e) if args.keep_going => {
                    warn!("Skipping {}: {}", input.display(), e);
                    failed += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    if failed > 0 && !args.keep_going {
        return Err(CliError::DocumentsFailed { failed });
    }
    Ok(documents)
}

/// Build a session and run every document through it, in input order
pub fn run_session(args: &SessionArgs) -> Result<MockingSession, CliError> {
    let config = load_config(args)?;
    let mut session = match &args.index {
        Some(path) => MockingSession::with_index(config, DocumentLoader::new().load_index(path)?)?,
        None => MockingSession::new(config),
    };
    for (path, document) in load_documents(args)? {
        if let Err(e) = session.mock_document(&document) {
            warn!("Mocking failed for {}", path.display());
            return Err(e.into());
        }
    }
    Ok(session)
}
