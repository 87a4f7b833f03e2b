//! Mock command implementation

use std::path::PathBuf;

use mapping_mocker::{DocumentFormat, MetadataSaver};

use super::{SessionArgs, run_session};
use crate::error::CliError;
use crate::output::format_summary;

/// Handle the mock command
pub fn handle_mock(
    args: &SessionArgs,
    format: DocumentFormat,
    output: Option<&PathBuf>,
    summary: bool,
) -> Result<(), CliError> {
    let session = run_session(args)?;
    let metadata = session.finish();
    let saver = MetadataSaver::new(format);

    match output {
        Some(path) => {
            saver.save(&metadata, path)?;
            println!("{}", format_summary(&metadata));
        }
        None if summary => println!("{}", format_summary(&metadata)),
        None => println!("{}", saver.render(&metadata)?),
    }
    Ok(())
}
