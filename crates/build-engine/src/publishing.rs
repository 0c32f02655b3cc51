//! Store Publishing
//!
//! Detects whether a publishing step can be enabled. Authentication with the
//! store is left to the publishing collaborator.

use std::path::PathBuf;
use serde::Serialize;
use tracing::{info, debug};

use flavorgen_core::{EnvSnapshot, PublishingSettings};

/// Presence-only flag for publisher credentials in the environment
pub const PUBLISHER_CREDENTIALS_ENV: &str = "ANDROID_PUBLISHER_CREDENTIALS";

/// Where publisher credentials come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "source", content = "path")]
pub enum PublisherCredentials {
    File(PathBuf),
    Environment,
}

/// Enabled publishing step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishingPlan {
    pub credentials: PublisherCredentials,
    pub track: String,
    pub bundles: bool,
}

/// Enable publishing if credentials are available
pub fn detect_publishing(
    service_account: &std::path::Path,
    settings: &PublishingSettings,
    env: &EnvSnapshot,
) -> Option<PublishingPlan> {
    let credentials = if service_account.is_file() {
        PublisherCredentials::File(service_account.to_path_buf())
    } else if env.contains(PUBLISHER_CREDENTIALS_ENV) {
        PublisherCredentials::Environment
    } else {
        debug!("No publisher credentials, publishing disabled");
        return None;
    };

    info!("Publishing enabled on track '{}' ({:?})", settings.track, credentials);
    Some(PublishingPlan {
        credentials,
        track: settings.track.clone(),
        bundles: settings.bundles,
    })
}
