//! Handler for the `eligian check` subcommand.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::debug;

use super::{attribute, compiler_for, load_program, Cli};
use crate::diagnostics::Diagnostic;

/// Counts returned from checking a single file
pub(super) struct CheckCounts {
    pub(super) errors: usize,
    pub(super) warnings: usize,
}

pub(crate) fn run_check(cli: &Cli, files: &[PathBuf], json: bool) -> miette::Result<ExitCode> {
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for path in files {
        let counts = check_file(cli, path, json)?;
        total_errors += counts.errors;
        total_warnings += counts.warnings;
    }

    if total_errors > 0 {
        eprintln!(
            "\nChecked {} file(s), found {} error(s)",
            files.len(),
            total_errors
        );
        return Ok(ExitCode::FAILURE);
    }
    if !json {
        if total_warnings > 0 {
            println!(
                "Checked {} file(s), no errors ({} warning(s))",
                files.len(),
                total_warnings
            );
        } else {
            println!("Checked {} file(s), no errors found", files.len());
        }
    }
    Ok(ExitCode::SUCCESS)
}

pub(super) fn check_file(cli: &Cli, path: &Path, json: bool) -> miette::Result<CheckCounts> {
    let config = cli.config_for(path)?;
    let compiler = compiler_for(&config)?;
    let program = load_program(path)?;

    let analysis = compiler.check(&program);
    let diagnostics = attribute(analysis.diagnostics, path);
    debug!(file = %path.display(), diagnostics = diagnostics.len(), "checked");

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;

    if json {
        let rendered: Vec<String> = diagnostics.iter().map(Diagnostic::to_json).collect();
        println!("[{}]", rendered.join(","));
    } else {
        for diagnostic in &diagnostics {
            eprintln!("{}", diagnostic.render());
        }
    }

    Ok(CheckCounts { errors, warnings })
}
