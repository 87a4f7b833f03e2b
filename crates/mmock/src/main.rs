//! mmock - merge mapping documents into annotation-equivalent metadata
//!
//! # Usage
//!
//! ```bash
//! # Mock every document in a directory and print the metadata as JSON
//! mmock mock mappings/
//!
//! # Merge against an annotation index snapshot and write YAML to a file
//! mmock mock orm.yaml --index index.json --format yaml --output out/metadata.yaml
//!
//! # List the global declarations that would be published
//! mmock globals orm.yaml other.yaml --names
//! ```

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mapping_mocker::DocumentFormat;
use tracing_subscriber::EnvFilter;

use commands::SessionArgs;

#[derive(Parser)]
#[command(name = "mmock")]
#[command(about = "Merge mapping documents into annotation-equivalent metadata")]
#[command(version)]
struct Cli {
    /// Log verbosity: trace, debug, info, warn, error
    #[arg(long, global = true, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Yaml => DocumentFormat::Yaml,
        }
    }
}

#[derive(Args)]
struct SessionOpts {
    /// Mapping documents or directories of documents, processed in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Annotation index snapshot to merge against
    #[arg(long)]
    index: Option<PathBuf>,

    /// Session configuration file (JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Default package for unqualified class names
    #[arg(long)]
    package: Option<String>,

    /// Reject class references missing from the configured known classes
    #[arg(long)]
    strict: bool,

    /// Skip documents that fail to load instead of aborting
    #[arg(long)]
    keep_going: bool,
}

impl From<SessionOpts> for SessionArgs {
    fn from(opts: SessionOpts) -> Self {
        SessionArgs {
            inputs: opts.inputs,
            index: opts.index,
            config: opts.config,
            package: opts.package,
            strict: opts.strict,
            keep_going: opts.keep_going,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Mock mapping documents and emit the merged metadata
    Mock {
        #[command(flatten)]
        session: SessionOpts,

        /// Output format
        #[arg(short, long, default_value = "json", value_enum)]
        format: OutputFormat,

        /// Write metadata to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a per-class summary instead of the metadata
        #[arg(long)]
        summary: bool,
    },

    /// Emit the finalized global declarations only
    Globals {
        #[command(flatten)]
        session: SessionOpts,

        /// Output format
        #[arg(short, long, default_value = "json", value_enum)]
        format: OutputFormat,

        /// Print registered names instead of declarations
        #[arg(long)]
        names: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.verbosity))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Mock {
            session,
            format,
            output,
            summary,
        } => commands::mock::handle_mock(
            &session.into(),
            format.into(),
            output.as_ref(),
            summary,
        )?,
        Commands::Globals {
            session,
            format,
            names,
        } => commands::globals::handle_globals(&session.into(), format.into(), names)?,
    }
    Ok(())
}
