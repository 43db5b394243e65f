//! Compile-time build metadata for `ccman --version` and the HTTP root endpoint.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("CCMAN_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("CCMAN_BUILD_TIMESTAMP");

/// Version block printed by `ccman --version`.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("CCMAN_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("CCMAN_BUILD_TIMESTAMP")
);

/// Short descriptor reported by the HTTP service info endpoint.
pub fn service_version() -> String {
    format!("{VERSION}+{GIT_COMMIT}")
}
