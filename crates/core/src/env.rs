//! Environment Snapshot
//!
//! Captures process environment variables once so every later lookup in a
//! configuration pass sees the same values.

use std::collections::HashMap;
use std::path::PathBuf;

/// Immutable view of environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// An empty environment
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a variable
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a variable, treating blank values as absent
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// User home directory as seen by this snapshot
    pub fn home_dir(&self) -> Option<PathBuf> {
        let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
        self.non_blank(key).map(PathBuf::from)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_absent() {
        let env: EnvSnapshot = [("LOCAL_PROPERTIES", "   "), ("KEYSTORE_PASS", "secret")]
            .into_iter()
            .collect();

        assert!(env.contains("LOCAL_PROPERTIES"));
        assert_eq!(env.non_blank("LOCAL_PROPERTIES"), None);
        assert_eq!(env.non_blank("KEYSTORE_PASS"), Some("secret"));
        assert_eq!(env.var("MISSING"), None);
    }
}
