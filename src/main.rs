mod cli;
mod commands;
mod config;
mod dispatch;
mod error;
mod output;
mod store;
mod types;

use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::error::Error;

fn main() {
    let cli = Cli::parse_from(cli::normalize_args(std::env::args_os()));
    let verbose = cli.verbose;

    init_tracing(verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "userstore", &mut io::stdout());
            Ok(())
        }
        None => {
            let config = Config::load()?;
            let args = cli.into_arguments(&config);
            let stdout = io::stdout();
            dispatch::perform(&args, stdout.lock())
        }
    }
}
