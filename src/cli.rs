//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Flavorgen - build variant resolution for multi-flavor Android apps
#[derive(Parser)]
#[command(name = "flavorgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root containing the metadata file
    #[arg(long, global = true, default_value = ".", env = "FLAVORGEN_ROOT")]
    pub root: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the variant matrix for the configured projects
    Plan(PlanArgs),

    /// Show which ABI an invocation narrows the build to
    Abi(AbiArgs),

    /// Show which signing identity a release build would use
    Signing,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Only resolve this project
    #[arg(short, long)]
    pub project: Option<String>,

    /// Resolve the debug build type instead of release
    #[arg(long)]
    pub debug: bool,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Task names the build was invoked with
    pub tasks: Vec<String>,
}

#[derive(Args)]
pub struct AbiArgs {
    /// Task names the build was invoked with
    pub tasks: Vec<String>,
}
