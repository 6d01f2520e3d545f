//! Handler for the `eligian compile` subcommand.

use std::path::Path;
use std::process::ExitCode;

use miette::{Context, IntoDiagnostic};
use tracing::info;

use super::{attribute, compiler_for, load_program, Cli};

pub(crate) fn run_compile(
    cli: &Cli,
    path: &Path,
    output: Option<&Path>,
    compact: bool,
) -> miette::Result<ExitCode> {
    let config = cli.config_for(path)?;
    let compiler = compiler_for(&config)?;
    let program = load_program(path)?;

    let compiled = match compiler.compile(&program) {
        Ok(compiled) => compiled,
        Err(bag) => {
            let diagnostics = attribute(bag, path);
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic.render());
            }
            eprintln!("\nCompilation failed with {} error(s)", diagnostics.len());
            return Ok(ExitCode::FAILURE);
        }
    };

    let json = compiled
        .to_json(config.output.pretty && !compact)
        .into_diagnostic()?;
    match output {
        Some(out) => {
            std::fs::write(out, json + "\n")
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to write {}", out.display()))?;
            info!(output = %out.display(), "compiled");
        }
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}
