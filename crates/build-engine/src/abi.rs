//! ABI Splits
//!
//! Target ABIs and narrowing of the ABI matrix from the invoked task names.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Target ABI for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Abi {
    #[serde(rename = "arm64-v8a")]
    Arm64V8a,
    #[serde(rename = "armeabi-v7a")]
    ArmeabiV7a,
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "x86")]
    X86,
}

impl Abi {
    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Arm64V8a => "arm64-v8a",
            Abi::ArmeabiV7a => "armeabi-v7a",
            Abi::X86_64 => "x86_64",
            Abi::X86 => "x86",
        }
    }

    /// All ABIs in split declaration order
    pub fn all() -> &'static [Abi] {
        &[Abi::Arm64V8a, Abi::ArmeabiV7a, Abi::X86_64, Abi::X86]
    }

    /// Parse an ABI name
    pub fn from_name(name: &str) -> Option<Abi> {
        Abi::all().iter().copied().find(|abi| abi.as_str() == name)
    }
}

impl std::fmt::Display for Abi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task name markers, most specific first
const SPLIT_RULES: &[(&str, Abi)] = &[
    ("arm64", Abi::Arm64V8a),
    ("arm", Abi::ArmeabiV7a),
    ("x64", Abi::X86_64),
    ("x86", Abi::X86),
];

/// Pick the single ABI named by the invocation, if any.
///
/// Only a single-task invocation can narrow the matrix.
pub fn select_abi<S: AsRef<str>>(task_names: &[S]) -> Option<Abi> {
    let [task] = task_names else {
        if task_names.len() > 1 {
            debug!("{} tasks invoked, keeping all ABIs", task_names.len());
        }
        return None;
    };

    let task = task.as_ref().to_lowercase();
    let selected = SPLIT_RULES
        .iter()
        .find(|(marker, _)| task.contains(marker))
        .map(|(_, abi)| *abi);

    debug!("Task '{}' selects ABI {:?}", task, selected);
    selected
}

/// ABIs enabled for this pass
pub fn enabled_abis(selected: Option<Abi>) -> Vec<Abi> {
    match selected {
        Some(abi) => vec![abi],
        None => Abi::all().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_task_selects_abi() {
        assert_eq!(select_abi(&["assembleArm64Release"]), Some(Abi::Arm64V8a));
        assert_eq!(select_abi(&["assembleFdroidArmRelease"]), Some(Abi::ArmeabiV7a));
        assert_eq!(select_abi(&["assembleFdroidX64Release"]), Some(Abi::X86_64));
    }

    #[test]
    fn test_specific_marker_wins() {
        assert_eq!(select_abi(&["ASSEMBLEARM64DEBUG"]), Some(Abi::Arm64V8a));
        assert_eq!(select_abi(&["assembleX86Debug"]), Some(Abi::X86));
    }

    #[test]
    fn test_multiple_tasks_never_narrow() {
        assert_eq!(select_abi(&["assembleRelease", "check"]), None);
        assert_eq!(select_abi(&["assembleArm64Release", "assembleX86Release"]), None);
    }

    #[test]
    fn test_no_match_or_no_tasks() {
        let none: [&str; 0] = [];
        assert_eq!(select_abi(&none), None);
        assert_eq!(select_abi(&["assembleRelease"]), None);
        assert_eq!(enabled_abis(None), Abi::all().to_vec());
        assert_eq!(enabled_abis(Some(Abi::X86)), vec![Abi::X86]);
    }

    #[test]
    fn test_abi_names() {
        assert_eq!(Abi::from_name("x86_64"), Some(Abi::X86_64));
        assert_eq!(Abi::from_name("mips"), None);
        assert_eq!(Abi::ArmeabiV7a.to_string(), "armeabi-v7a");
    }
}
