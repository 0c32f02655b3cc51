//! Settings
//!
//! Manages the optional `flavorgen.toml` at the project root:
//! - File names for metadata, local overrides, keystore and publishing credentials
//! - SDK levels shared by every variant
//! - The list of projects to resolve

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::{info, debug};

use crate::error::{CoreError, Result};

/// Settings file name looked up at the project root
pub const SETTINGS_FILE: &str = "flavorgen.toml";

/// Project kind tag as written in the settings file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKindTag {
    App,
    Plugin,
}

/// One configured project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Project name (module directory)
    pub name: String,
    /// App or plugin
    pub kind: ProjectKindTag,
    /// Name stamped into artifact file names
    #[serde(default)]
    pub display_name: Option<String>,
    /// Base token of the default artifact name
    #[serde(default)]
    pub module: Option<String>,
    /// Version code skip offset (apps only)
    #[serde(default)]
    pub skip: Option<u32>,
    /// Application id prefix (plugins only)
    #[serde(default)]
    pub package_prefix: Option<String>,
}

impl ProjectSettings {
    /// Default app project
    pub fn app(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ProjectKindTag::App,
            display_name: None,
            module: None,
            skip: None,
            package_prefix: None,
        }
    }

    /// Default plugin project
    pub fn plugin(name: impl Into<String>) -> Self {
        Self {
            kind: ProjectKindTag::Plugin,
            ..Self::app(name)
        }
    }

    /// Name used in artifact file names
    pub fn effective_display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// SDK levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SdkSettings {
    pub min: u32,
    pub target: u32,
    pub compile: u32,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            min: 21,
            target: 30,
            compile: 30,
        }
    }
}

/// Store publishing defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PublishingSettings {
    /// Release track
    pub track: String,
    /// Publish app bundles instead of APKs
    pub bundles: bool,
}

impl Default for PublishingSettings {
    fn default() -> Self {
        Self {
            track: "beta".to_string(),
            bundles: true,
        }
    }
}

/// Main settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Versioned metadata file
    pub metadata_file: PathBuf,
    /// Machine-local overrides file
    pub local_properties: PathBuf,
    /// Environment variable holding base64 local overrides
    pub local_properties_env: String,
    /// Release keystore
    pub keystore: PathBuf,
    /// Publishing service account credentials
    pub service_account: PathBuf,
    pub sdk: SdkSettings,
    pub publishing: PublishingSettings,
    /// Configured projects
    #[serde(rename = "project")]
    pub projects: Vec<ProjectSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_file: PathBuf::from("sager.properties"),
            local_properties: PathBuf::from("local.properties"),
            local_properties_env: "LOCAL_PROPERTIES".to_string(),
            keystore: PathBuf::from("release.keystore"),
            service_account: PathBuf::from("service_account_credentials.json"),
            sdk: SdkSettings::default(),
            publishing: PublishingSettings::default(),
            projects: Vec::new(),
        }
    }
}

impl Settings {
    /// Parse settings text
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the project root, falling back to defaults
    pub async fn load(root: &Path) -> Result<Self> {
        let path = root.join(SETTINGS_FILE);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!("Loading settings from {:?}", path);
                Self::from_toml(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Configured projects, or a single `app` project when none are listed
    pub fn effective_projects(&self) -> Vec<ProjectSettings> {
        if self.projects.is_empty() {
            vec![ProjectSettings::app("app")]
        } else {
            self.projects.clone()
        }
    }

    /// Find a project by name
    pub fn project(&self, name: &str) -> Option<ProjectSettings> {
        self.effective_projects().into_iter().find(|p| p.name == name)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(CoreError::Config("project name must not be empty".into()));
            }
            if !seen.insert(project.name.as_str()) {
                return Err(CoreError::Config(format!("project '{}' is listed twice", project.name)));
            }
            match project.kind {
                ProjectKindTag::App if project.package_prefix.is_some() => {
                    return Err(CoreError::Config(format!(
                        "project '{}': package_prefix only applies to plugins",
                        project.name
                    )));
                }
                ProjectKindTag::Plugin if project.skip.is_some() => {
                    return Err(CoreError::Config(format!(
                        "project '{}': skip only applies to apps",
                        project.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
