//! Plan Runner
//!
//! Coordinates a configuration pass: settings, metadata, overrides, signing
//! and one variant matrix per configured project.

use std::path::{Path, PathBuf};
use tracing::info;

use flavorgen_core::{EnvSnapshot, MetadataStore, ProjectSettings, Settings};

use crate::{
    BuildConfig, BuildError, BuildPlan, BuildVariant, Project, Result,
    VariantMatrixBuilder,
    publishing::detect_publishing,
    signing::{SecretChain, SigningIdentity, SigningResolver},
};

/// Runs configuration passes for a project root
#[derive(Debug)]
pub struct PlanRunner {
    root: PathBuf,
    settings: Settings,
    store: MetadataStore,
    resolver: SigningResolver,
}

impl PlanRunner {
    /// Create a runner from loaded settings
    pub fn new(root: &Path, settings: Settings, env: EnvSnapshot) -> Self {
        let resolver = SigningResolver::with_default_debug(root.join(&settings.keystore), &env);
        let store = MetadataStore::new(root, &settings, env);
        Self {
            root: root.to_path_buf(),
            settings,
            store,
            resolver,
        }
    }

    /// Load settings from the root and create a runner
    pub async fn load(root: &Path, env: EnvSnapshot) -> Result<Self> {
        let settings = Settings::load(root).await?;
        Ok(Self::new(root, settings, env))
    }

    /// Replace the signing resolver
    pub fn with_resolver(mut self, resolver: SigningResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Pass configuration for a build type and invocation
    pub fn build_config<I, S>(&self, variant: BuildVariant, tasks: I) -> BuildConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BuildConfig::from_settings(&self.root, &self.settings)
            .with_variant(variant)
            .with_tasks(tasks)
    }

    /// Signing identity a release pass would use
    pub async fn signing_identity(&self) -> Result<SigningIdentity> {
        let local = self.store.local_properties().await?;
        Ok(self.resolver.resolve(&SecretChain::new(local, self.store.env())))
    }

    /// Create the matrix builder for a pass
    pub async fn matrix_builder(&self, config: &BuildConfig) -> Result<VariantMatrixBuilder> {
        let local = self.store.local_properties().await?;
        let secrets = SecretChain::new(local, self.store.env());
        let publishing = detect_publishing(&config.service_account, &config.publishing, self.store.env());

        Ok(VariantMatrixBuilder::new(config, &secrets, &self.resolver).with_publishing(publishing))
    }

    /// Resolve one project, or every configured project when `project` is `None`.
    ///
    /// Any failing project fails the whole pass.
    pub async fn plan(&self, config: &BuildConfig, project: Option<&str>) -> Result<Vec<BuildPlan>> {
        let projects: Vec<ProjectSettings> = match project {
            Some(name) => vec![self
                .settings
                .project(name)
                .ok_or_else(|| BuildError::UnknownProject(name.to_string()))?],
            None => self.settings.effective_projects(),
        };

        let metadata = self.store.metadata().await?;
        let builder = self.matrix_builder(config).await?;

        let mut plans = Vec::with_capacity(projects.len());
        for settings in &projects {
            let project = Project::resolve(settings, metadata)?;
            plans.push(builder.build(&project, metadata)?);
        }

        info!("Configured {} project(s)", plans.len());
        Ok(plans)
    }
}
