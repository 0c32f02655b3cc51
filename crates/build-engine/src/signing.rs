//! Signing Identity
//!
//! Chooses between the release keystore and the debug keystore based on which
//! secrets are available. Nothing is signed here.

use std::path::PathBuf;
use serde::Serialize;
use tracing::{info, debug};

use flavorgen_core::{EnvSnapshot, Properties};

/// Keystore password key
pub const KEYSTORE_PASS: &str = "KEYSTORE_PASS";
/// Key alias key
pub const ALIAS_NAME: &str = "ALIAS_NAME";
/// Key password key
pub const ALIAS_PASS: &str = "ALIAS_PASS";

/// Debug keystore password used by the Android tooling
pub const DEBUG_STORE_PASSWORD: &str = "android";
/// Debug key alias used by the Android tooling
pub const DEBUG_KEY_ALIAS: &str = "androiddebugkey";

/// Keystore information
#[derive(Clone, PartialEq, Eq)]
pub struct KeyStore {
    /// Path to keystore file
    pub path: PathBuf,
    /// Keystore password
    pub password: String,
    /// Key alias, passed through unvalidated
    pub alias: Option<String>,
    /// Key password, passed through unvalidated
    pub key_password: Option<String>,
}

impl KeyStore {
    /// The well-known debug keystore
    pub fn debug(path: PathBuf) -> Self {
        Self {
            path,
            password: DEBUG_STORE_PASSWORD.to_string(),
            alias: Some(DEBUG_KEY_ALIAS.to_string()),
            key_password: Some(DEBUG_STORE_PASSWORD.to_string()),
        }
    }
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("path", &self.path)
            .field("password", &"<redacted>")
            .field("alias", &self.alias)
            .field("key_password", &self.key_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Signing identity chosen for a configuration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningIdentity {
    /// Release keystore with the resolved secrets
    Release(KeyStore),
    /// Fallback to the debug keystore
    Debug(KeyStore),
}

impl SigningIdentity {
    pub fn is_release(&self) -> bool {
        matches!(self, SigningIdentity::Release(_))
    }

    pub fn keystore(&self) -> &KeyStore {
        match self {
            SigningIdentity::Release(ks) | SigningIdentity::Debug(ks) => ks,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SigningIdentity::Release(_) => "release",
            SigningIdentity::Debug(_) => "debug",
        }
    }

    /// Secret-free view for reports
    pub fn summary(&self) -> SigningSummary {
        let keystore = self.keystore();
        SigningSummary {
            identity: self.name(),
            store_file: keystore.path.clone(),
            key_alias: keystore.alias.clone(),
        }
    }
}

/// Printable description of a signing identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningSummary {
    pub identity: &'static str,
    pub store_file: PathBuf,
    pub key_alias: Option<String>,
}

/// Secret lookup: local overrides first, then the environment
#[derive(Debug, Clone, Copy)]
pub struct SecretChain<'a> {
    local: &'a Properties,
    env: &'a EnvSnapshot,
}

impl<'a> SecretChain<'a> {
    pub fn new(local: &'a Properties, env: &'a EnvSnapshot) -> Self {
        Self { local, env }
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        self.local
            .get(key)
            .or_else(|| self.env.var(key))
            .map(str::to_string)
    }
}

/// Resolves the signing identity
#[derive(Debug, Clone)]
pub struct SigningResolver {
    release_keystore: PathBuf,
    debug_keystore: PathBuf,
}

impl SigningResolver {
    pub fn new(release_keystore: PathBuf, debug_keystore: PathBuf) -> Self {
        Self {
            release_keystore,
            debug_keystore,
        }
    }

    /// Use the default debug keystore location
    pub fn with_default_debug(release_keystore: PathBuf, env: &EnvSnapshot) -> Self {
        Self::new(release_keystore, debug_keystore_path(env))
    }

    /// Release identity iff the store password resolves
    pub fn resolve(&self, secrets: &SecretChain<'_>) -> SigningIdentity {
        let Some(password) = secrets.lookup(KEYSTORE_PASS) else {
            info!("No {} available, signing with the debug keystore", KEYSTORE_PASS);
            return self.debug_identity();
        };

        let keystore = KeyStore {
            path: self.release_keystore.clone(),
            password,
            alias: secrets.lookup(ALIAS_NAME),
            key_password: secrets.lookup(ALIAS_PASS),
        };

        info!("Signing with release keystore {:?}", keystore.path);
        debug!("Release key alias: {:?}", keystore.alias);
        SigningIdentity::Release(keystore)
    }

    pub fn debug_identity(&self) -> SigningIdentity {
        SigningIdentity::Debug(KeyStore::debug(self.debug_keystore.clone()))
    }
}

/// Get the debug keystore location
pub fn debug_keystore_path(env: &EnvSnapshot) -> PathBuf {
    env.home_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".android")
        .join("debug.keystore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SigningResolver {
        SigningResolver::new(PathBuf::from("/repo/release.keystore"), PathBuf::from("/home/u/.android/debug.keystore"))
    }

    #[test]
    fn test_store_password_selects_release() {
        let local: Properties = [(KEYSTORE_PASS, "store"), (ALIAS_NAME, "sn"), (ALIAS_PASS, "key")]
            .into_iter()
            .collect();
        let env = EnvSnapshot::empty();

        let identity = resolver().resolve(&SecretChain::new(&local, &env));
        let SigningIdentity::Release(ks) = identity else {
            panic!("expected release identity");
        };
        assert_eq!(ks.path, PathBuf::from("/repo/release.keystore"));
        assert_eq!(ks.password, "store");
        assert_eq!(ks.alias.as_deref(), Some("sn"));
        assert_eq!(ks.key_password.as_deref(), Some("key"));
    }

    #[test]
    fn test_missing_alias_is_passed_through() {
        let local = Properties::new();
        let env: EnvSnapshot = [(KEYSTORE_PASS, "store")].into_iter().collect();

        let identity = resolver().resolve(&SecretChain::new(&local, &env));
        assert!(identity.is_release());
        assert_eq!(identity.keystore().alias, None);
        assert_eq!(identity.keystore().key_password, None);
    }

    #[test]
    fn test_no_store_password_falls_back_to_debug() {
        let local: Properties = [(ALIAS_NAME, "sn"), (ALIAS_PASS, "key")].into_iter().collect();
        let env: EnvSnapshot = [(ALIAS_NAME, "other")].into_iter().collect();

        let identity = resolver().resolve(&SecretChain::new(&local, &env));
        assert_eq!(identity.name(), "debug");
        assert_eq!(identity.keystore().alias.as_deref(), Some(DEBUG_KEY_ALIAS));
        assert_eq!(identity.keystore().path, PathBuf::from("/home/u/.android/debug.keystore"));
    }

    #[test]
    fn test_local_overrides_win_over_env() {
        let local: Properties = [(KEYSTORE_PASS, "local")].into_iter().collect();
        let env: EnvSnapshot = [(KEYSTORE_PASS, "env"), (ALIAS_NAME, "from-env")].into_iter().collect();
        let chain = SecretChain::new(&local, &env);

        assert_eq!(chain.lookup(KEYSTORE_PASS).as_deref(), Some("local"));
        assert_eq!(chain.lookup(ALIAS_NAME).as_deref(), Some("from-env"));
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let identity = SigningIdentity::Release(KeyStore {
            path: PathBuf::from("release.keystore"),
            password: "hunter2".into(),
            alias: Some("sn".into()),
            key_password: Some("hunter3".into()),
        });
        let rendered = format!("{:?}", identity);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("hunter3"));
        assert_eq!(identity.summary().key_alias.as_deref(), Some("sn"));
    }

    #[test]
    fn test_debug_keystore_under_home() {
        let env: EnvSnapshot = [(if cfg!(windows) { "USERPROFILE" } else { "HOME" }, "/home/dev")]
            .into_iter()
            .collect();
        assert_eq!(
            debug_keystore_path(&env),
            PathBuf::from("/home/dev").join(".android").join("debug.keystore")
        );
    }
}
