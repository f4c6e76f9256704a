use std::fmt;

use serde::Serialize;

/// Build metadata captured by `build.rs`
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub package_version: &'static str,
    pub version: &'static str,
    pub build_profile: &'static str,
    pub build_timestamp: &'static str,
    pub rust_version: &'static str,
    pub target: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        package_version: env!("CARGO_PKG_VERSION"),
        version: env!("VEIL_REPO_VERSION"),
        build_profile: env!("VEIL_BUILD_PROFILE"),
        build_timestamp: env!("VEIL_BUILD_TIMESTAMP"),
        rust_version: env!("VEIL_RUST_VERSION"),
        target: env!("VEIL_BUILD_TARGET"),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "veil {} ({})", self.package_version, self.version)?;
        writeln!(f, "  profile:   {}", self.build_profile)?;
        writeln!(f, "  built:     {}", self.build_timestamp)?;
        writeln!(f, "  rustc:     {}", self.rust_version)?;
        write!(f, "  target:    {}", self.target)
    }
}
