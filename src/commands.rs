//! CLI commands for Flavorgen
//!
//! Provides command-line interface functionality for build scripts and CI.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use flavorgen_build_engine::{
    select_abi, Abi, BuildError, BuildPlan, BuildVariant, PlanRunner, PublisherCredentials,
};
use flavorgen_core::{CoreError, EnvSnapshot};

/// Plan command options
pub struct PlanCommand {
    pub root: PathBuf,
    pub project: Option<String>,
    pub debug: bool,
    pub json: bool,
    pub tasks: Vec<String>,
}

impl PlanCommand {
    /// Execute the plan command
    pub async fn execute(&self) -> Result<()> {
        info!("Configuring {:?}", self.root);

        let runner = PlanRunner::load(&self.root, EnvSnapshot::capture())
            .await
            .context("failed to load settings")?;

        let variant = if self.debug {
            BuildVariant::Debug
        } else {
            BuildVariant::Release
        };
        let config = runner.build_config(variant, self.tasks.iter().cloned());
        let plans = runner.plan(&config, self.project.as_deref()).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&plans)?);
        } else {
            for plan in &plans {
                print!("{}", render_plan(plan));
            }
        }

        Ok(())
    }
}

/// ABI command options
pub struct AbiCommand {
    pub tasks: Vec<String>,
}

impl AbiCommand {
    /// Print the ABI selection for an invocation
    pub fn execute(&self) -> Result<()> {
        match select_abi(self.tasks.as_slice()) {
            Some(abi) => println!("{}", abi),
            None => println!("all ({})", join_abis(Abi::all())),
        }
        Ok(())
    }
}

/// Signing command options
pub struct SigningCommand {
    pub root: PathBuf,
}

impl SigningCommand {
    /// Print the signing identity without secrets
    pub async fn execute(&self) -> Result<()> {
        let runner = PlanRunner::load(&self.root, EnvSnapshot::capture()).await?;
        let summary = runner.signing_identity().await?.summary();

        println!("identity: {}", summary.identity);
        println!("store:    {}", summary.store_file.display());
        println!("alias:    {}", summary.key_alias.as_deref().unwrap_or("-"));
        Ok(())
    }
}

/// Message printed when a command fails
pub fn error_message(err: &anyhow::Error) -> String {
    let friendly = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<BuildError>()
            .map(BuildError::user_message)
            .or_else(|| cause.downcast_ref::<CoreError>().map(CoreError::user_message))
    });

    match friendly {
        Some(message) if err.downcast_ref::<BuildError>().is_some() || err.downcast_ref::<CoreError>().is_some() => {
            message
        }
        Some(message) => format!("{}: {}", err, message),
        None => format!("{:#}", err),
    }
}

fn join_abis(abis: &[Abi]) -> String {
    abis.iter().map(Abi::as_str).collect::<Vec<_>>().join(", ")
}

/// Render a plan as a plain-text table
pub fn render_plan(plan: &BuildPlan) -> String {
    let mut out = String::new();
    let signing = plan.signing.summary();

    let _ = writeln!(out, "{} ({}, {})", plan.project, plan.kind, plan.build_variant.as_str());
    let _ = writeln!(
        out,
        "  abis: {}",
        match plan.abi_filter {
            Some(abi) => abi.to_string(),
            None => "all".to_string(),
        }
    );
    let _ = writeln!(out, "  sdk: min {} / target {} / compile {}", plan.sdk.min, plan.sdk.target, plan.sdk.compile);
    let _ = writeln!(out, "  signing: {} ({})", signing.identity, signing.store_file.display());
    match &plan.publishing {
        Some(publishing) => {
            let source = match &publishing.credentials {
                PublisherCredentials::File(path) => path.display().to_string(),
                PublisherCredentials::Environment => "environment".to_string(),
            };
            let _ = writeln!(out, "  publishing: track {} via {}", publishing.track, source);
        }
        None => {
            let _ = writeln!(out, "  publishing: disabled");
        }
    }

    for variant in &plan.variants {
        let _ = writeln!(
            out,
            "  {:<12} {:>10} {:<14} {:<24} {}",
            variant.flavor,
            variant.version_code,
            variant.version_name,
            join_abis(&variant.enabled_abis),
            variant.output_file_name
        );
    }

    out
}
