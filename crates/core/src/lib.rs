//! Flavorgen Core - metadata, settings and environment
//!
//! This crate provides the read-only inputs of a configuration pass:
//! the project metadata file, machine-local overrides, the settings file
//! and a snapshot of the process environment.

pub mod config;
pub mod env;
pub mod error;
pub mod metadata;
pub mod properties;

pub use config::{ProjectKindTag, ProjectSettings, PublishingSettings, SdkSettings, Settings};
pub use env::EnvSnapshot;
pub use error::{CoreError, Result};
pub use metadata::{Metadata, MetadataStore, OverrideSource};
pub use properties::Properties;

/// Flavorgen version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
