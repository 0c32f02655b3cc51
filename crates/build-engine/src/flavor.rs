//! Product Flavors
//!
//! Static flavor tables and the project kinds that select them.

use serde::Serialize;

use flavorgen_core::{Metadata, ProjectKindTag, ProjectSettings};

use crate::abi::Abi;
use crate::{BuildError, Result};

/// Default version code skip offset for apps
pub const APP_SKIP: u32 = 40;

/// Where a flavor's artifacts are distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Built for local use only
    Local,
    FDroid,
    Play,
}

impl Channel {
    /// Artifacts reach a store that ranks version codes
    pub fn is_distributed(&self) -> bool {
        !matches!(self, Channel::Local)
    }
}

/// A product flavor in the `vendor` dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flavor {
    pub name: &'static str,
    pub version_name_suffix: Option<&'static str>,
    /// Offset applied to the adjusted base version code
    pub code_delta: i64,
    /// ABI this flavor is split for
    pub abi: Option<Abi>,
    pub channel: Channel,
}

impl Flavor {
    const fn local(name: &'static str) -> Self {
        Self {
            name,
            version_name_suffix: None,
            code_delta: 0,
            abi: None,
            channel: Channel::Local,
        }
    }

    const fn fdroid(name: &'static str, suffix: &'static str, code_delta: i64, abi: Abi) -> Self {
        Self {
            name,
            version_name_suffix: Some(suffix),
            code_delta,
            abi: Some(abi),
            channel: Channel::FDroid,
        }
    }

    const fn play(code_delta: i64) -> Self {
        Self {
            name: "play",
            version_name_suffix: None,
            code_delta,
            abi: None,
            channel: Channel::Play,
        }
    }

    /// Version name with this flavor's suffix
    pub fn version_name(&self, base: &str) -> String {
        match self.version_name_suffix {
            Some(suffix) => format!("{}{}", base, suffix),
            None => base.to_string(),
        }
    }
}

const APP_FLAVORS: &[Flavor] = &[
    Flavor::local("oss"),
    Flavor::local("expert"),
    Flavor::fdroid("fdroidArm64", "-arm64", 0, Abi::Arm64V8a),
    Flavor::fdroid("fdroidArm", "-arm", -1, Abi::ArmeabiV7a),
    Flavor::fdroid("fdroidX64", "-x64", -2, Abi::X86_64),
    Flavor::fdroid("fdroidX86", "-x86", -3, Abi::X86),
    Flavor::play(-4),
];

const PLUGIN_FLAVORS: &[Flavor] = &[
    Flavor::local("oss"),
    Flavor::fdroid("fdroidArm64", "-arm64", 0, Abi::Arm64V8a),
    Flavor::fdroid("fdroidArm", "-arm", -1, Abi::ArmeabiV7a),
    Flavor::fdroid("fdroidX64", "-x64", -2, Abi::X86_64),
    Flavor::fdroid("fdroidX86", "-x86", -3, Abi::X86),
    Flavor::play(-4),
];

/// Project kind, selected once at configuration start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    App {
        package_name: String,
        skip: u32,
    },
    Plugin {
        /// Uppercased metadata key prefix
        prefix: String,
        application_id: String,
    },
}

impl ProjectKind {
    pub fn flavors(&self) -> &'static [Flavor] {
        match self {
            ProjectKind::App { .. } => APP_FLAVORS,
            ProjectKind::Plugin { .. } => PLUGIN_FLAVORS,
        }
    }

    pub fn application_id(&self) -> &str {
        match self {
            ProjectKind::App { package_name, .. } => package_name,
            ProjectKind::Plugin { application_id, .. } => application_id,
        }
    }

    pub fn skip_offset(&self) -> u32 {
        match self {
            ProjectKind::App { skip, .. } => *skip,
            ProjectKind::Plugin { .. } => 0,
        }
    }

    /// Metadata key holding the version name
    pub fn version_name_key(&self) -> String {
        match self {
            ProjectKind::App { .. } => "VERSION_NAME".to_string(),
            ProjectKind::Plugin { prefix, .. } => format!("{}_VERSION_NAME", prefix),
        }
    }

    /// Metadata key holding the raw version code
    pub fn version_code_key(&self) -> String {
        match self {
            ProjectKind::App { .. } => "VERSION_CODE".to_string(),
            ProjectKind::Plugin { prefix, .. } => format!("{}_VERSION", prefix),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectKind::App { .. } => "app",
            ProjectKind::Plugin { .. } => "plugin",
        }
    }
}

/// A configured project with its kind resolved against metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub display_name: String,
    /// Base token of default artifact names
    pub module: String,
    pub kind: ProjectKind,
}

impl Project {
    /// Resolve a project from settings and metadata
    pub fn resolve(settings: &ProjectSettings, metadata: &Metadata) -> Result<Self> {
        let kind = match settings.kind {
            ProjectKindTag::App => ProjectKind::App {
                package_name: require(metadata, "PACKAGE_NAME")?.to_string(),
                skip: settings.skip.unwrap_or(APP_SKIP),
            },
            ProjectKindTag::Plugin => {
                let package_prefix = match &settings.package_prefix {
                    Some(prefix) => prefix.clone(),
                    None => format!("{}.plugin", require(metadata, "PACKAGE_NAME")?),
                };
                ProjectKind::Plugin {
                    prefix: settings.name.to_uppercase(),
                    application_id: format!("{}.{}", package_prefix, settings.name.to_lowercase()),
                }
            }
        };

        let module = settings.module.clone().unwrap_or_else(|| match &kind {
            ProjectKind::App { .. } => "app".to_string(),
            ProjectKind::Plugin { .. } => settings.name.clone(),
        });

        Ok(Self {
            name: settings.name.clone(),
            display_name: settings.effective_display_name().to_string(),
            module,
            kind,
        })
    }
}

/// Read a required metadata key
pub(crate) fn require<'a>(metadata: &'a Metadata, key: &str) -> Result<&'a str> {
    match metadata.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        Some(_) => Err(BuildError::VersionFieldMissing {
            key: key.to_string(),
            reason: "empty".into(),
        }),
        None => Err(BuildError::VersionFieldMissing {
            key: key.to_string(),
            reason: "absent".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> Metadata {
        [("PACKAGE_NAME", "io.example.app"), ("VERSION_NAME", "1.2.0")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_resolve_app() {
        let project = Project::resolve(&ProjectSettings::app("app"), &metadata()).unwrap();
        assert_eq!(project.kind.application_id(), "io.example.app");
        assert_eq!(project.kind.skip_offset(), APP_SKIP);
        assert_eq!(project.module, "app");
        assert_eq!(project.kind.version_code_key(), "VERSION_CODE");
        assert_eq!(project.kind.flavors().len(), 7);
    }

    #[test]
    fn test_resolve_plugin() {
        let project = Project::resolve(&ProjectSettings::plugin("Naive"), &metadata()).unwrap();
        assert_eq!(project.kind.application_id(), "io.example.app.plugin.naive");
        assert_eq!(project.kind.skip_offset(), 0);
        assert_eq!(project.module, "Naive");
        assert_eq!(project.kind.version_name_key(), "NAIVE_VERSION_NAME");
        assert_eq!(project.kind.version_code_key(), "NAIVE_VERSION");
        assert!(project.kind.flavors().iter().all(|f| f.name != "expert"));
    }

    #[test]
    fn test_plugin_prefix_override_skips_package_name() {
        let mut settings = ProjectSettings::plugin("brook");
        settings.package_prefix = Some("org.example.plugins".into());
        let project = Project::resolve(&settings, &Metadata::default()).unwrap();
        assert_eq!(project.kind.application_id(), "org.example.plugins.brook");
    }

    #[test]
    fn test_app_requires_package_name() {
        let err = Project::resolve(&ProjectSettings::app("app"), &Metadata::default()).unwrap_err();
        assert!(matches!(err, BuildError::VersionFieldMissing { ref key, .. } if key == "PACKAGE_NAME"));
    }

    #[test]
    fn test_architecture_group_is_declared_in_split_order() {
        let pinned: Vec<Abi> = APP_FLAVORS.iter().filter_map(|f| f.abi).collect();
        assert_eq!(pinned, Abi::all().to_vec());
        assert_eq!(APP_FLAVORS[3].version_name("1.2.0"), "1.2.0-arm");
    }
}
