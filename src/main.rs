//! Flavorgen CLI entry point

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flavorgen::commands;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {}", commands::error_message(&e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let default_filter = if cli.verbose {
        "flavorgen=debug,flavorgen_core=debug,flavorgen_build_engine=debug"
    } else {
        "flavorgen=info,flavorgen_core=info,flavorgen_build_engine=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Plan(args) => {
            commands::PlanCommand {
                root: cli.root,
                project: args.project,
                debug: args.debug,
                json: args.json,
                tasks: args.tasks,
            }
            .execute()
            .await
        }
        Commands::Abi(args) => commands::AbiCommand { tasks: args.tasks }.execute(),
        Commands::Signing => commands::SigningCommand { root: cli.root }.execute().await,
    }
}
