//! Build Configuration
//!
//! Per-pass inputs: build type, invoked tasks and the settings the engine reads.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use flavorgen_core::{PublishingSettings, SdkSettings, Settings};

/// Build variant (debug/release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildVariant {
    Debug,
    #[default]
    Release,
}

impl BuildVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildVariant::Debug => "debug",
            BuildVariant::Release => "release",
        }
    }
}

/// Configuration for one resolution pass
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Project root directory
    pub project_dir: PathBuf,

    /// Build variant
    pub variant: BuildVariant,

    /// Task names the build was invoked with, in order
    pub task_names: Vec<String>,

    /// Release keystore
    pub keystore: PathBuf,

    /// Publishing service account credentials
    pub service_account: PathBuf,

    /// SDK levels
    pub sdk: SdkSettings,

    /// Publishing defaults
    pub publishing: PublishingSettings,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::from_settings(Path::new("."), &Settings::default())
    }
}

impl BuildConfig {
    /// Create from loaded settings
    pub fn from_settings(project_dir: &Path, settings: &Settings) -> Self {
        Self {
            project_dir: project_dir.to_path_buf(),
            variant: BuildVariant::Release,
            task_names: Vec::new(),
            keystore: project_dir.join(&settings.keystore),
            service_account: project_dir.join(&settings.service_account),
            sdk: settings.sdk,
            publishing: settings.publishing.clone(),
        }
    }

    pub fn with_variant(mut self, variant: BuildVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_tasks<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.task_names = tasks.into_iter().map(Into::into).collect();
        self
    }

    /// Default artifact name before renaming
    pub fn default_output_name(&self, module: &str, flavor: &str) -> String {
        format!("{}-{}-{}.apk", module, flavor, self.variant.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_rooted() {
        let config = BuildConfig::from_settings(Path::new("/repo"), &Settings::default());
        assert_eq!(config.keystore, PathBuf::from("/repo/release.keystore"));
        assert_eq!(config.service_account, PathBuf::from("/repo/service_account_credentials.json"));
        assert_eq!(config.variant, BuildVariant::Release);
    }

    #[test]
    fn test_default_output_name() {
        let config = BuildConfig::default().with_variant(BuildVariant::Debug);
        assert_eq!(config.default_output_name("app", "oss"), "app-oss-debug.apk");
    }
}
