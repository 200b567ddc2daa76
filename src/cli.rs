// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use ecsroll::types::ReleaseVersion;

#[derive(Parser)]
#[command(name = "ecsroll")]
#[command(about = "Rolling deployments for ECS services")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result (for CI)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ecsroll.yml configuration file
    Init {
        /// Cluster name or ARN
        #[arg(long)]
        cluster: Option<String>,

        /// Service name
        #[arg(long)]
        service: Option<String>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Check credentials and configuration without touching any service
    Verify {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,
    },

    /// Retag images, register a new revision, and roll it out
    Deploy {
        /// Release version used as the new image tag
        #[arg(short, long)]
        release: ReleaseVersion,

        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Release all services at once instead of one after another
        #[arg(long)]
        parallel: bool,
    },

    /// Restart services on their current task definition
    Redeploy {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,

        /// Redeploy all services at once instead of one after another
        #[arg(long)]
        parallel: bool,
    },

    /// Show deployment status
    Status {
        /// Target environment (defined in config)
        #[arg(short, long)]
        environment: Option<String>,
    },
}
