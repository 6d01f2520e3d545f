//! Command-line interface for the Eligian front-end
//!
//! Provides commands: check, compile, infer, operations. Input documents are
//! AST JSON as produced by the Eligian parser.

mod check_cmd;
mod compile_cmd;
mod infer_cmd;
mod operations_cmd;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use miette::{Context, IntoDiagnostic};

use crate::ast::Program;
use crate::compiler::Compiler;
use crate::config::Config;
use crate::diagnostics::{Diagnostic, DiagnosticBag};

/// Eligian - timeline DSL compiler front-end
#[derive(Parser, Debug)]
#[command(name = "eligian")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: nearest eligian.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate documents and report diagnostics
    Check {
        /// AST documents to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a document to engine configuration
    Compile {
        /// AST document to compile
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Single-line JSON regardless of configuration
        #[arg(long)]
        compact: bool,
    },

    /// Print the inferred parameter types of every action
    Infer {
        /// AST document to analyze
        file: PathBuf,
    },

    /// List registered operations, or show one signature
    Operations {
        /// Operation to describe
        name: Option<String>,
    },
}

impl Cli {
    /// Configuration governing `path`: the explicit `--config`, else the
    /// nearest `eligian.toml` above it
    pub fn config_for(&self, path: &Path) -> miette::Result<Config> {
        let config = match &self.config {
            Some(explicit) => Config::load(explicit),
            None => Config::discover(path),
        };
        config.into_diagnostic()
    }

    /// Run the parsed command
    pub fn run(self) -> miette::Result<ExitCode> {
        match &self.command {
            Command::Check { files, json } => check_cmd::run_check(&self, files, *json),
            Command::Compile {
                file,
                output,
                compact,
            } => compile_cmd::run_compile(&self, file, output.as_deref(), *compact),
            Command::Infer { file } => infer_cmd::run_infer(&self, file),
            Command::Operations { name } => {
                let cwd = std::env::current_dir().into_diagnostic()?;
                operations_cmd::run_operations(&self, &cwd, name.as_deref())
            }
        }
    }
}

/// Read and deserialize an AST document
pub(crate) fn load_program(path: &Path) -> miette::Result<Program> {
    let content = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("{} is not a valid Eligian AST document", path.display()))
}

/// Compiler configured for `path`
pub(crate) fn compiler_for(config: &Config) -> miette::Result<Compiler> {
    let registry = config.load_registry().into_diagnostic()?;
    Ok(Compiler::with_options(
        Arc::new(registry),
        config.validation_options(),
    ))
}

/// Diagnostics whose span names no file are attributed to `path`
pub(crate) fn attribute(bag: DiagnosticBag, path: &Path) -> Vec<Diagnostic> {
    bag.take()
        .into_iter()
        .map(|mut diagnostic| {
            diagnostic.span = diagnostic.span.in_file(path);
            for note in &mut diagnostic.notes {
                note.span = note.span.take().map(|span| span.in_file(path));
            }
            diagnostic
        })
        .collect()
}
