//! Build Variant Resolution Engine
//!
//! Turns project metadata, flavor tables, invoked task names and available
//! credentials into a concrete build plan per project.

pub mod abi;
pub mod config;
pub mod flavor;
pub mod version;
pub mod signing;
pub mod naming;
pub mod publishing;
pub mod matrix;
pub mod runner;

pub use abi::{Abi, select_abi};
pub use config::{BuildConfig, BuildVariant};
pub use flavor::{Channel, Flavor, Project, ProjectKind};
pub use version::{VersionCodeAllocator, VersionSpec};
pub use signing::{KeyStore, SecretChain, SigningIdentity, SigningResolver};
pub use naming::OutputNaming;
pub use publishing::{PublisherCredentials, PublishingPlan};
pub use matrix::{BuildPlan, ResolvedVariant, VariantMatrixBuilder};
pub use runner::PlanRunner;

use flavorgen_core::CoreError;

/// Build configuration errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Metadata field {key} is {reason}")]
    VersionFieldMissing { key: String, reason: String },
    #[error("Version code from {key} is out of range: {value}")]
    VersionCodeOutOfRange { key: String, value: i64 },
    #[error("Flavors {first} and {second} share application id {application_id} and version code {version_code}")]
    DuplicateVariantCode {
        application_id: String,
        version_code: u32,
        first: String,
        second: String,
    },
    #[error("Version code of {later} is not below {earlier}")]
    VersionOrdering { earlier: String, later: String },
    #[error("Unknown project: {0}")]
    UnknownProject(String),
}

impl BuildError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            BuildError::Core(e) => e.user_message(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for resolution
pub type Result<T> = std::result::Result<T, BuildError>;
