//! Eligian CLI - check and compile Eligian documents

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eligian::cli::Cli;

fn main() -> miette::Result<ExitCode> {
    let cli = Cli::parse();

    // Best effort: the command reports a broken config itself
    let level = std::env::current_dir()
        .ok()
        .and_then(|cwd| cli.config_for(&cwd).ok())
        .map(|config| config.output.log_level)
        .unwrap_or_else(|| "warn".to_string());
    init_tracing(cli.verbose, &level);

    cli.run()
}

fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
