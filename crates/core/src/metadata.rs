//! Metadata Store
//!
//! Loads the versioned metadata file and the machine-local overrides once per
//! process. Both bags are read-only after their first successful load.

use std::path::{Path, PathBuf};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::config::Settings;
use crate::env::EnvSnapshot;
use crate::error::{CoreError, Result};
use crate::properties::Properties;

/// Decoder for the override blob, padding optional
const OVERRIDE_BLOB: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Project metadata loaded from the primary properties file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    properties: Properties,
}

impl Metadata {
    pub fn new(properties: Properties) -> Self {
        Self { properties }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Where the local overrides came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideSource {
    /// Base64 blob from an environment variable
    Environment(String),
    /// Local properties file
    File(PathBuf),
    /// Neither source present
    None,
}

/// Lazily loaded, memoized metadata and override bags
#[derive(Debug)]
pub struct MetadataStore {
    metadata_path: PathBuf,
    local_path: PathBuf,
    local_env_key: String,
    env: EnvSnapshot,
    metadata: OnceCell<Metadata>,
    local: OnceCell<(Properties, OverrideSource)>,
}

impl MetadataStore {
    /// Create a store rooted at the project directory
    pub fn new(root: &Path, settings: &Settings, env: EnvSnapshot) -> Self {
        Self {
            metadata_path: root.join(&settings.metadata_file),
            local_path: root.join(&settings.local_properties),
            local_env_key: settings.local_properties_env.clone(),
            env,
            metadata: OnceCell::new(),
            local: OnceCell::new(),
        }
    }

    /// Environment snapshot this store reads overrides from
    pub fn env(&self) -> &EnvSnapshot {
        &self.env
    }

    /// Get the project metadata, reading it on first use
    pub async fn metadata(&self) -> Result<&Metadata> {
        self.metadata.get_or_try_init(|| self.read_metadata()).await
    }

    /// Get the local overrides, reading them on first use
    pub async fn local_properties(&self) -> Result<&Properties> {
        self.load_local().await.map(|(props, _)| props)
    }

    /// Which source supplied the local overrides
    pub async fn override_source(&self) -> Result<&OverrideSource> {
        self.load_local().await.map(|(_, source)| source)
    }

    async fn load_local(&self) -> Result<&(Properties, OverrideSource)> {
        self.local.get_or_try_init(|| self.read_local()).await
    }

    async fn read_metadata(&self) -> Result<Metadata> {
        let text = match tokio::fs::read_to_string(&self.metadata_path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::ConfigMissing {
                    path: self.metadata_path.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = Metadata::new(Properties::parse(&text)?);
        info!("Loaded {} metadata keys from {:?}", metadata.len(), self.metadata_path);
        Ok(metadata)
    }

    async fn read_local(&self) -> Result<(Properties, OverrideSource)> {
        if let Some(blob) = self.env.non_blank(&self.local_env_key) {
            // Line breaks from wrapped encoders are ignored
            let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
            let bytes = OVERRIDE_BLOB.decode(compact)?;
            let props = Properties::parse(&String::from_utf8(bytes)?)?;
            info!("Using local overrides from ${}", self.local_env_key);
            return Ok((props, OverrideSource::Environment(self.local_env_key.clone())));
        }

        match tokio::fs::read_to_string(&self.local_path).await {
            Ok(text) => {
                let props = Properties::parse(&text)?;
                info!("Using local overrides from {:?}", self.local_path);
                Ok((props, OverrideSource::File(self.local_path.clone())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No local overrides found");
                Ok((Properties::new(), OverrideSource::None))
            }
            Err(e) => Err(e.into()),
        }
    }
}
