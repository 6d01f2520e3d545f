//! Handler for the `eligian operations` subcommand.

use std::path::Path;
use std::process::ExitCode;

use super::{compiler_for, Cli};
use crate::diagnostics::Span;
use crate::structural::StructuralTypeSystem;

pub(crate) fn run_operations(cli: &Cli, cwd: &Path, name: Option<&str>) -> miette::Result<ExitCode> {
    let config = cli.config_for(cwd)?;
    let compiler = compiler_for(&config)?;
    let registry = compiler.registry();
    let types = StructuralTypeSystem::new(registry);

    let Some(name) = name else {
        for signature in registry.signatures() {
            println!("{}", signature.usage());
        }
        return Ok(ExitCode::SUCCESS);
    };

    if let Some(hover) = types.hover(name) {
        println!("{}", hover);
        if let Some(description) = registry.lookup(name).and_then(|s| s.description.as_deref()) {
            println!("\n{}", description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    match compiler.validator().validate_operation_exists(name, &Span::default()) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(error) => {
            eprintln!("{}\n   = hint: {}", error, error.hint());
            Ok(ExitCode::FAILURE)
        }
    }
}
