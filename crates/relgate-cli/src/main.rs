mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::{CommandContext, Commands};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "relgate")]
#[command(bin_name = "relgate")]
#[command(about = "Propose, review and publish releases from commit history", long_about = None)]
struct Cli {
    /// Path to start repository discovery from (default: current directory)
    #[arg(long = "path", short = 'C', global = true)]
    path: Option<PathBuf>,

    /// Directory holding release state (default: .relgate under the repository root)
    #[arg(long = "state-dir", global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = resolve_start_path(cli.path)
        .and_then(|start_path| CommandContext::open(&start_path, cli.state_dir))
        .and_then(|context| cli.command.execute(&context));

    if let Err(e) = result {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn resolve_start_path(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    match path {
        Some(p) => Ok(p),
        None => std::env::current_dir().map_err(CliError::CurrentDir),
    }
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
