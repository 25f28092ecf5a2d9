mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::error::CliError;

const ENV_LOG: &str = "DIVIFILTER_LOG";

fn main() -> ExitCode {
    init_logging();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(?error, "command failed");
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = config::load(&cli)?;

    let data = commands::run(&cli, config)?;
    output::render(&data, cli.pretty)
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging() {
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| String::from("info"));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
