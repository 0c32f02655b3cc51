//! Flavorgen - build variant resolution for multi-flavor Android apps
//!
//! Derives version codes, selects the ABI slice, picks the signing identity
//! and renames artifacts, all from static metadata and the invoked tasks.
//!
//! ## Architecture
//!
//! - `flavorgen-core`: metadata store, settings and environment snapshot
//! - `flavorgen-build-engine`: the variant resolution engine

#![warn(clippy::all)]

pub mod commands;

// Re-export main components for library usage
pub use flavorgen_core as core;
pub use flavorgen_build_engine as build;

/// Prelude module for convenient imports
pub mod prelude {
    pub use flavorgen_core::{EnvSnapshot, MetadataStore, Settings};
    pub use flavorgen_build_engine::{
        Abi, BuildConfig, BuildPlan, BuildVariant, PlanRunner, ResolvedVariant, VariantMatrixBuilder,
    };
}
