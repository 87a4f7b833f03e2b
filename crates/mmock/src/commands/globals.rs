//! Globals command implementation

use mapping_mocker::{DeclarationKind, DocumentFormat, MetadataSaver};

use super::{SessionArgs, run_session};
use crate::error::CliError;

/// Handle the globals command
pub fn handle_globals(
    args: &SessionArgs,
    format: DocumentFormat,
    names_only: bool,
) -> Result<(), CliError> {
    let session = run_session(args)?;

    if names_only {
        let registry = session.registry();
        for kind in DeclarationKind::ALL {
            for name in registry.names(kind) {
                println!("{:?}\t{}", kind, name);
            }
        }
        return Ok(());
    }

    let globals = session.finish().globals;
    println!("{}", MetadataSaver::new(format).render(&globals)?);
    Ok(())
}
