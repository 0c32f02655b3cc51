//! Version Codes
//!
//! Derives per-flavor version codes from the raw metadata code. Each logical
//! release occupies `VERSION_SCALE` consecutive codes so that the
//! ABI-specific flavors below the primary one never collide with the next
//! release.

use serde::Serialize;
use tracing::debug;

use flavorgen_core::Metadata;

use crate::flavor::{require, Flavor, ProjectKind};
use crate::{BuildError, Result};

/// Codes reserved per logical release
pub const VERSION_SCALE: i64 = 5;

/// Largest version code accepted by Android
pub const MAX_VERSION_CODE: i64 = 2_100_000_000;

/// Inputs of one flavor's version code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionSpec {
    pub base_code: i64,
    pub skip_offset: i64,
    pub scale: i64,
    pub flavor_delta: i64,
}

impl VersionSpec {
    /// Base code after scaling, before the flavor delta. `None` on overflow.
    pub fn adjusted_base(&self) -> Option<i64> {
        self.base_code
            .checked_sub(self.skip_offset)?
            .checked_mul(self.scale)?
            .checked_add(self.skip_offset)
    }

    pub fn final_code(&self) -> Option<i64> {
        self.adjusted_base()?.checked_add(self.flavor_delta)
    }
}

/// Allocates version codes for one project
#[derive(Debug, Clone)]
pub struct VersionCodeAllocator {
    code_key: String,
    base_code: i64,
    skip_offset: i64,
    version_name: String,
}

impl VersionCodeAllocator {
    /// Read the version fields for a project kind
    pub fn from_metadata(kind: &ProjectKind, metadata: &Metadata) -> Result<Self> {
        let name_key = kind.version_name_key();
        let code_key = kind.version_code_key();

        let version_name = require(metadata, &name_key)?.to_string();
        let raw = require(metadata, &code_key)?;
        let base_code = raw.trim().parse::<i32>().map_err(|_| BuildError::VersionFieldMissing {
            key: code_key.clone(),
            reason: format!("not a 32-bit integer ({:?})", raw),
        })?;

        debug!("{} = {}, {} = {}", name_key, version_name, code_key, base_code);

        Ok(Self {
            code_key,
            base_code: i64::from(base_code),
            skip_offset: i64::from(kind.skip_offset()),
            version_name,
        })
    }

    /// Version name before flavor suffixes
    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn spec_for(&self, flavor: &Flavor) -> VersionSpec {
        VersionSpec {
            base_code: self.base_code,
            skip_offset: self.skip_offset,
            scale: VERSION_SCALE,
            flavor_delta: flavor.code_delta,
        }
    }

    /// Final version code of a flavor
    pub fn code_for(&self, flavor: &Flavor) -> Result<u32> {
        let out_of_range = |value| BuildError::VersionCodeOutOfRange {
            key: self.code_key.clone(),
            value,
        };

        let code = self.spec_for(flavor).final_code().ok_or_else(|| out_of_range(self.base_code))?;
        if !(1..=MAX_VERSION_CODE).contains(&code) {
            return Err(out_of_range(code));
        }
        u32::try_from(code).map_err(|_| out_of_range(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ProjectKind {
        ProjectKind::App {
            package_name: "io.example.app".into(),
            skip: 40,
        }
    }

    fn plugin() -> ProjectKind {
        ProjectKind::Plugin {
            prefix: "NAIVE".into(),
            application_id: "io.example.app.plugin.naive".into(),
        }
    }

    fn codes(kind: &ProjectKind, metadata: &Metadata) -> Vec<(&'static str, u32)> {
        let allocator = VersionCodeAllocator::from_metadata(kind, metadata).unwrap();
        kind.flavors()
            .iter()
            .map(|f| (f.name, allocator.code_for(f).unwrap()))
            .collect()
    }

    #[test]
    fn test_app_codes_at_skip_boundary() {
        let metadata: Metadata = [("VERSION_NAME", "1.2.0"), ("VERSION_CODE", "40")].into_iter().collect();
        let codes = codes(&app(), &metadata);

        let lookup = |name: &str| codes.iter().find(|(n, _)| *n == name).unwrap().1;
        assert_eq!(lookup("fdroidArm64"), 40);
        assert_eq!(lookup("fdroidArm"), 39);
        assert_eq!(lookup("fdroidX64"), 38);
        assert_eq!(lookup("fdroidX86"), 37);
        assert_eq!(lookup("play"), 36);
    }

    #[test]
    fn test_app_codes_scale_above_skip() {
        let metadata: Metadata = [("VERSION_NAME", "1.3.0"), ("VERSION_CODE", "42")].into_iter().collect();
        let allocator = VersionCodeAllocator::from_metadata(&app(), &metadata).unwrap();
        let primary = &app().flavors()[2];

        assert_eq!(allocator.spec_for(primary).adjusted_base(), Some(50));
        assert_eq!(allocator.code_for(primary).unwrap(), 50);
    }

    #[test]
    fn test_plugin_has_no_skip() {
        let metadata: Metadata = [("NAIVE_VERSION_NAME", "95.0"), ("NAIVE_VERSION", "3")].into_iter().collect();
        let codes = codes(&plugin(), &metadata);

        assert_eq!(codes[0], ("oss", 15));
        assert_eq!(codes.last().unwrap(), &("play", 11));
    }

    #[test]
    fn test_architecture_group_strictly_decreasing() {
        let metadata: Metadata = [("VERSION_NAME", "2.0"), ("VERSION_CODE", "117")].into_iter().collect();
        let allocator = VersionCodeAllocator::from_metadata(&app(), &metadata).unwrap();
        let group: Vec<u32> = app()
            .flavors()
            .iter()
            .filter(|f| f.abi.is_some())
            .map(|f| allocator.code_for(f).unwrap())
            .collect();

        assert!(group.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        let missing: Metadata = [("VERSION_NAME", "1.0")].into_iter().collect();
        let err = VersionCodeAllocator::from_metadata(&app(), &missing).unwrap_err();
        assert!(matches!(err, BuildError::VersionFieldMissing { ref key, .. } if key == "VERSION_CODE"));

        let invalid: Metadata = [("VERSION_NAME", "1.0"), ("VERSION_CODE", "forty")].into_iter().collect();
        let err = VersionCodeAllocator::from_metadata(&app(), &invalid).unwrap_err();
        assert!(matches!(err, BuildError::VersionFieldMissing { .. }));
    }

    #[test]
    fn test_code_below_skip_is_out_of_range() {
        let metadata: Metadata = [("VERSION_NAME", "0.1"), ("VERSION_CODE", "2")].into_iter().collect();
        let allocator = VersionCodeAllocator::from_metadata(&app(), &metadata).unwrap();
        let err = allocator.code_for(&app().flavors()[0]).unwrap_err();
        assert!(matches!(err, BuildError::VersionCodeOutOfRange { value: -150, .. }));
    }

    #[test]
    fn test_code_beyond_i32_is_rejected() {
        let metadata: Metadata = [("VERSION_NAME", "9.9"), ("VERSION_CODE", "9223372036854775807")].into_iter().collect();
        let err = VersionCodeAllocator::from_metadata(&app(), &metadata).unwrap_err();
        assert!(matches!(err, BuildError::VersionFieldMissing { ref key, .. } if key == "VERSION_CODE"));
    }

    #[test]
    fn test_largest_i32_code_is_out_of_range() {
        let raw = i32::MAX.to_string();
        let metadata: Metadata = [("VERSION_NAME", "9.9"), ("VERSION_CODE", raw.as_str())].into_iter().collect();
        let allocator = VersionCodeAllocator::from_metadata(&app(), &metadata).unwrap();
        let err = allocator.code_for(&app().flavors()[0]).unwrap_err();
        assert!(matches!(err, BuildError::VersionCodeOutOfRange { .. }));
    }

    #[test]
    fn test_overflowing_spec_has_no_code() {
        let spec = VersionSpec {
            base_code: i64::MAX,
            skip_offset: 40,
            scale: VERSION_SCALE,
            flavor_delta: 0,
        };
        assert_eq!(spec.adjusted_base(), None);
        assert_eq!(spec.final_code(), None);
    }
}
