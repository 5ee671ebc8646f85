//! Command line entry point

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::database::{SignatureDatabase, SignatureSource, SIGNATURES_ENV};
use crate::error::Result;
use crate::identify::identify_batch;
use crate::report::{render_json, render_text};

#[derive(Parser, Debug)]
#[command(name = "wtfile")]
#[command(version, about = "Identify a file by its magic signature", long_about = None)]
pub struct Cli {
    /// File(s) to identify; several files are identified in parallel
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Signature database (JSON); defaults to $WTFILE_SIGNATURES, then the
    /// user config directory, then the built-in list
    #[arg(short, long, value_name = "PATH")]
    pub signatures: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

/// Identify every file on the command line and render each outcome.
///
/// A database that cannot be opened fails the whole run; per-file failures
/// are returned in input order next to the successful results.
pub fn execute(cli: &Cli) -> Result<Vec<Result<String>>> {
    let source = SignatureSource::resolve(cli.signatures.clone());
    debug!(?source, env = SIGNATURES_ENV, "Signature source resolved");

    let database = SignatureDatabase::open(&source)?;
    let outputs = identify_batch(&cli.files, database.records())
        .into_iter()
        .map(|(_, result)| {
            let identification = result?;
            if cli.json {
                render_json(&identification)
            } else {
                Ok(render_text(&identification))
            }
        })
        .collect();

    Ok(outputs)
}

/// Parse arguments, print one result or one error line per file
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let outputs = match execute(&cli) {
        Ok(outputs) => outputs,
        Err(e) => {
            debug!(error = ?e, "Signature database unavailable");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for output in outputs {
        match output {
            Ok(text) => println!("{text}"),
            Err(e) => {
                debug!(error = ?e, "Identification failed");
                eprintln!("{e}");
                status = ExitCode::FAILURE;
            }
        }
    }
    status
}
