//! Build information logged at startup.

use bootstrapper_common::constants::APP_NAME;

/// Placeholder for build data that was not provided at compile time.
const UNSET: &str = "unset";

/// Name, version, and build data of this binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    /// Application name.
    pub name: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Commit hash, from `BOOTSTRAPPER_COMMIT` at build time.
    pub commit: &'static str,
    /// Build date, from `BOOTSTRAPPER_BUILD_DATE` at build time.
    pub build_date: &'static str,
}

impl VersionInfo {
    /// Returns the information baked into this binary.
    pub const fn current() -> Self {
        Self {
            name: APP_NAME,
            version: env!("CARGO_PKG_VERSION"),
            commit: match option_env!("BOOTSTRAPPER_COMMIT") {
                Some(commit) => commit,
                None => UNSET,
            },
            build_date: match option_env!("BOOTSTRAPPER_BUILD_DATE") {
                Some(date) => date,
                None => UNSET,
            },
        }
    }

    /// Logs the banner.
    pub fn log(&self) {
        tracing::info!(
            name = self.name,
            version = self.version,
            commit = self.commit,
            build_date = self.build_date,
            "version info"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_has_name_and_version() {
        let info = VersionInfo::current();
        assert_eq!(info.name, "bootstrapper");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.commit.is_empty());
        assert!(!info.build_date.is_empty());
    }
}
