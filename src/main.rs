use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use imap_inspect::config::{Args, Config};
use imap_inspect::workflow;

fn main() -> ExitCode {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "imap_inspect=info")
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.destdir.is_none() {
        // Nothing to do without a destination; show what the flags are.
        return match Args::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "could not print usage");
                ExitCode::FAILURE
            }
        };
    }

    if let Err(e) = dotenvy::dotenv() {
        error!(error = %e, "Error loading .env file");
        return ExitCode::FAILURE;
    }

    let config = match Config::resolve(args, |var| std::env::var(var).ok()) {
        Some(config) => config,
        None => return ExitCode::SUCCESS,
    };
    tracing::debug!(?config, "configuration");

    let mut client = match workflow::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(host = %config.host, "ERR: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match workflow::run(&mut client, &config) {
        Ok(reports) => {
            info!(mailboxes = reports.len(), "Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("ERR: {}", e);
            ExitCode::FAILURE
        }
    }
}
