mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::run::RunOptions;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let directive = if cli.global.verbose {
        "recap=debug"
    } else {
        "recap=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = config::load(&cli.global)?;
    debug!(
        "Using {} (concurrency {}, timeout {:?})",
        config.base_url, config.concurrency, config.timeout
    );

    match cli.command {
        Command::Check { nickname } => commands::check::run(&config, &nickname).await,
        Command::Run {
            nickname,
            from,
            to,
            json,
            output,
        } => {
            commands::run::run(
                &config,
                RunOptions {
                    nickname,
                    from,
                    to,
                    json,
                    output,
                },
            )
            .await
        }
    }
}
