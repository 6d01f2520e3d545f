//! Handler for the `eligian infer` subcommand.

use std::path::Path;
use std::process::ExitCode;

use super::{compiler_for, load_program, Cli};
use crate::ast::ActionDefinition;
use crate::typechecker::ParameterTypeMap;

pub(crate) fn run_infer(cli: &Cli, path: &Path) -> miette::Result<ExitCode> {
    let config = cli.config_for(path)?;
    let compiler = compiler_for(&config)?;
    let program = load_program(path)?;

    let mut failed = false;
    for (action, (name, result)) in program.actions.iter().zip(compiler.infer(&program)) {
        match result {
            Ok(types) => println!("{}", render_signature(action, &types)),
            Err(errors) => {
                failed = true;
                for error in errors {
                    eprintln!("{}: {}\n   = hint: {}", name, error, error.hint());
                }
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// `name(p: type, q: type)` in declaration order
pub(super) fn render_signature(action: &ActionDefinition, types: &ParameterTypeMap) -> String {
    let parameters: Vec<String> = action
        .parameters
        .iter()
        .map(|p| {
            let ty = types.get(&p.name).map_or("unknown", |t| t.as_str());
            format!("{}: {}", p.name, ty)
        })
        .collect();
    format!("{}({})", action.name, parameters.join(", "))
}
