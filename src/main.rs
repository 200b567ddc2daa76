// ABOUTME: Entry point for the ecsroll CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use ecsroll::config::{self, Config};
use ecsroll::error::Result;
use ecsroll::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };
    let output = Output::new(mode, cli.verbose);

    if let Err(e) = run(cli.command, &output).await {
        output.report_failure(&e);
        std::process::exit(1);
    }
}

fn load_config(environment: Option<&str>) -> Result<Config> {
    let cwd = env::current_dir()?;
    Config::discover(&cwd)?.select(environment)
}

async fn run(command: Commands, output: &Output) -> Result<()> {
    match command {
        Commands::Init {
            cluster,
            service,
            force,
        } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, cluster.as_deref(), service.as_deref(), force)?;
            output.success(
                &format!("Created {}", config::CONFIG_FILENAME),
                &config::CONFIG_FILENAME,
            );
            Ok(())
        }
        Commands::Verify { environment } => {
            commands::verify(load_config(environment.as_deref())?, output)
        }
        Commands::Deploy {
            release,
            environment,
            parallel,
        } => {
            let config = load_config(environment.as_deref())?;
            commands::deploy(config, release, parallel, output).await
        }
        Commands::Redeploy {
            environment,
            parallel,
        } => {
            let config = load_config(environment.as_deref())?;
            commands::redeploy(config, parallel, output).await
        }
        Commands::Status { environment } => {
            commands::status(load_config(environment.as_deref())?, output).await
        }
    }
}
