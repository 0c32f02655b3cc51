//! Output Naming
//!
//! Stamps project name and version name into artifact file names and strips
//! build-type and flavor noise.

use crate::flavor::{Project, ProjectKind};

/// Release build type marker
pub const RELEASE_MARKER: &str = "-release";
/// Oss flavor marker
pub const OSS_MARKER: &str = "-oss";

/// Artifact renaming for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    base_token: String,
    stamp_prefix: String,
}

impl OutputNaming {
    pub fn new(base_token: impl Into<String>, stamp_prefix: impl Into<String>) -> Self {
        Self {
            base_token: base_token.into(),
            stamp_prefix: stamp_prefix.into(),
        }
    }

    pub fn for_project(project: &Project) -> Self {
        let stamp_prefix = match project.kind {
            ProjectKind::App { .. } => project.display_name.clone(),
            ProjectKind::Plugin { .. } => format!("{}-plugin", project.display_name),
        };
        Self::new(project.module.clone(), stamp_prefix)
    }

    /// Rename a default artifact name.
    ///
    /// The base token is replaced first, so a stamp that happens to contain a
    /// marker loses it to the later steps as well.
    pub fn apply(&self, default_name: &str, version_name: &str) -> String {
        let stamp = format!("{}-{}", self.stamp_prefix, version_name);
        default_name
            .replace(&self.base_token, &stamp)
            .replace(RELEASE_MARKER, "")
            .replace(OSS_MARKER, "")
    }
}
