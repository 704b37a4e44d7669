//! Platform identity and runtime compatibility resolution
//!
//! The platform key is `"<os>-<arch>"` with both halves normalized:
//! architecture synonyms collapse (`AMD64` → `x86_64`, `aarch64` → `arm64`)
//! and the OS name matches what the registries were written against
//! (`macos` is reported as `darwin`).
//!
//! Compatibility resolution is a pure function of registry + identity.
//! Descriptors with an explicit `platforms` set use membership (or the
//! `"all"` sentinel). Descriptors without one predate the explicit schema
//! and fall back to a name-based heuristic kept for older registries.

use super::registry::{RuntimeDescriptor, RuntimeRegistry};

/// Runtimes known to work on every platform under the legacy heuristic.
const PORTABLE_RUNTIMES: &[&str] = &["interp", "llvm-ir"];

/// Sentinel in a `platforms` set meaning "every platform".
const ALL_PLATFORMS: &str = "all";

/// Normalized identity of the host environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    /// Lowercased OS name (`darwin`, `linux`, ...).
    pub os: String,
    /// Normalized architecture (`x86_64`, `arm64`, or the raw value).
    pub arch: String,
    /// `"<os>-<arch>"`.
    pub key: String,
}

impl PlatformIdentity {
    /// Detect the current host. Deterministic for a fixed build target.
    pub fn detect() -> Self {
        Self::from_raw(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build an identity from raw OS and machine strings.
    pub fn from_raw(os: &str, machine: &str) -> Self {
        let os = normalize_os(os);
        let arch = normalize_arch(machine);
        let key = format!("{os}-{arch}");
        Self { os, arch, key }
    }
}

fn normalize_os(os: &str) -> String {
    let os = os.to_lowercase();
    // Registries predate Rust's naming; they use uname-style "darwin".
    if os == "macos" {
        "darwin".to_string()
    } else {
        os
    }
}

fn normalize_arch(machine: &str) -> String {
    match machine {
        "x86_64" | "AMD64" => "x86_64".to_string(),
        "arm64" | "aarch64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

/// Names of all runtimes in the registry eligible to run on `identity`.
pub fn compatible_runtimes(registry: &RuntimeRegistry, identity: &PlatformIdentity) -> Vec<String> {
    registry
        .iter()
        .filter(|(name, desc)| is_compatible(name, desc, identity))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Whether one runtime is eligible to run on `identity`.
pub fn is_compatible(name: &str, desc: &RuntimeDescriptor, identity: &PlatformIdentity) -> bool {
    match &desc.platforms {
        Some(platforms) => platforms
            .iter()
            .any(|p| p == ALL_PLATFORMS || p == &identity.key),
        None => legacy_name_match(name, &identity.key),
    }
}

/// Heuristic for descriptors lacking explicit platform metadata: guess from
/// the runtime name, with a fixed set of platform-independent runtimes.
fn legacy_name_match(name: &str, platform_key: &str) -> bool {
    if platform_key == "darwin-arm64" && name.contains("darwin") {
        true
    } else if platform_key == "linux-x86_64" && name.contains("linux-x86") {
        true
    } else if platform_key == "linux-arm64" && name.contains("linux-arm64") {
        true
    } else {
        PORTABLE_RUNTIMES.contains(&name)
    }
}
