//! Variant Matrix
//!
//! Enumerates the (flavor x ABI selection) variants of a project and resolves
//! their application id, version code, version name, signing identity and
//! artifact name.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{info, debug};

use flavorgen_core::{Metadata, SdkSettings};

use crate::abi::{select_abi, Abi};
use crate::config::{BuildConfig, BuildVariant};
use crate::flavor::{Channel, Project};
use crate::naming::OutputNaming;
use crate::publishing::PublishingPlan;
use crate::signing::{SecretChain, SigningIdentity, SigningResolver};
use crate::version::VersionCodeAllocator;
use crate::{BuildError, Result};

/// One fully resolved build variant
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVariant {
    pub flavor: &'static str,
    pub channel: Channel,
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
    pub enabled_abis: Vec<Abi>,
    #[serde(serialize_with = "serialize_identity")]
    pub signing: Arc<SigningIdentity>,
    pub output_file_name: String,
}

fn serialize_identity<S: Serializer>(identity: &Arc<SigningIdentity>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    identity.summary().serialize(serializer)
}

/// Resolved variants of one project
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub project: String,
    pub kind: &'static str,
    pub build_variant: BuildVariant,
    /// ABI selected by the invocation, `None` for the full matrix
    pub abi_filter: Option<Abi>,
    pub sdk: SdkSettings,
    #[serde(serialize_with = "serialize_identity")]
    pub signing: Arc<SigningIdentity>,
    pub publishing: Option<PublishingPlan>,
    pub variants: Vec<ResolvedVariant>,
}

impl BuildPlan {
    pub fn variant(&self, flavor: &str) -> Option<&ResolvedVariant> {
        self.variants.iter().find(|v| v.flavor == flavor)
    }
}

/// Builds variant matrices for one configuration pass.
///
/// The signing identity and ABI selection are decided once when the builder
/// is created and shared by every project it builds.
#[derive(Debug, Clone)]
pub struct VariantMatrixBuilder {
    config: BuildConfig,
    abi_filter: Option<Abi>,
    signing: Arc<SigningIdentity>,
    publishing: Option<PublishingPlan>,
}

impl VariantMatrixBuilder {
    /// Create a builder, resolving the signing identity for this pass
    pub fn new(config: &BuildConfig, secrets: &SecretChain<'_>, resolver: &SigningResolver) -> Self {
        let signing = match config.variant {
            BuildVariant::Release => resolver.resolve(secrets),
            BuildVariant::Debug => resolver.debug_identity(),
        };

        let abi_filter = select_abi(config.task_names.as_slice());
        match abi_filter {
            Some(abi) => info!("Building only ABI {}", abi),
            None => debug!("Building all ABIs"),
        }

        Self {
            config: config.clone(),
            abi_filter,
            signing: Arc::new(signing),
            publishing: None,
        }
    }

    pub fn with_publishing(mut self, publishing: Option<PublishingPlan>) -> Self {
        self.publishing = publishing;
        self
    }

    /// Resolve every variant of a project
    pub fn build(&self, project: &Project, metadata: &Metadata) -> Result<BuildPlan> {
        let allocator = VersionCodeAllocator::from_metadata(&project.kind, metadata)?;
        let naming = OutputNaming::for_project(project);
        let flavors = project.kind.flavors();

        // Validated on the full flavor table, independent of ABI narrowing
        let mut codes = Vec::with_capacity(flavors.len());
        for flavor in flavors {
            codes.push(allocator.code_for(flavor)?);
        }
        check_architecture_order(flavors.iter().map(|f| (f.name, f.abi)).zip(codes.iter().copied()))?;

        let mut variants = Vec::with_capacity(flavors.len());
        for (flavor, code) in flavors.iter().zip(codes) {
            let enabled_abis = match (flavor.abi, self.abi_filter) {
                (Some(pinned), Some(selected)) if pinned != selected => {
                    debug!("Skipping {} ({} not selected)", flavor.name, pinned);
                    continue;
                }
                (Some(pinned), _) => vec![pinned],
                (None, selected) => crate::abi::enabled_abis(selected),
            };

            let version_name = flavor.version_name(allocator.version_name());
            let default_name = self.config.default_output_name(&project.module, flavor.name);
            let output_file_name = naming.apply(&default_name, &version_name);

            let variant = ResolvedVariant {
                flavor: flavor.name,
                channel: flavor.channel,
                application_id: project.kind.application_id().to_string(),
                version_code: code,
                version_name,
                enabled_abis,
                signing: Arc::clone(&self.signing),
                output_file_name,
            };
            debug!(
                "{}:{} -> {} ({}) {}",
                project.name, variant.flavor, variant.version_code, variant.version_name, variant.output_file_name
            );
            variants.push(variant);
        }

        check_unique_codes(&variants)?;

        info!(
            "Resolved {} {} variants for {} ({})",
            variants.len(),
            self.config.variant.as_str(),
            project.name,
            project.kind.label()
        );

        Ok(BuildPlan {
            project: project.name.clone(),
            kind: project.kind.label(),
            build_variant: self.config.variant,
            abi_filter: self.abi_filter,
            sdk: self.config.sdk,
            signing: Arc::clone(&self.signing),
            publishing: self.publishing.clone(),
            variants,
        })
    }
}

/// ABI-pinned flavors must receive strictly decreasing codes in declared order
fn check_architecture_order<I>(flavors: I) -> Result<()>
where
    I: IntoIterator<Item = ((&'static str, Option<Abi>), u32)>,
{
    let mut previous: Option<(&'static str, u32)> = None;
    for ((name, abi), code) in flavors {
        if abi.is_none() {
            continue;
        }
        if let Some((earlier, earlier_code)) = previous {
            if code >= earlier_code {
                return Err(BuildError::VersionOrdering {
                    earlier: earlier.to_string(),
                    later: name.to_string(),
                });
            }
        }
        previous = Some((name, code));
    }
    Ok(())
}

/// Distributed variants must have pairwise-distinct (application id, code).
///
/// Only F-Droid and Play variants are compared. Local flavors (`oss`,
/// `expert`) share the primary ABI's code and are never checked against it.
fn check_unique_codes(variants: &[ResolvedVariant]) -> Result<()> {
    let mut seen: HashMap<(&str, u32), &str> = HashMap::new();
    for variant in variants.iter().filter(|v| v.channel.is_distributed()) {
        let key = (variant.application_id.as_str(), variant.version_code);
        if let Some(first) = seen.insert(key, variant.flavor) {
            return Err(BuildError::DuplicateVariantCode {
                application_id: variant.application_id.clone(),
                version_code: variant.version_code,
                first: first.to_string(),
                second: variant.flavor.to_string(),
            });
        }
    }
    Ok(())
}
