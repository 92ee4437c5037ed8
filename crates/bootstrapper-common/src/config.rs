//! Run configuration for the bootstrapper.
//!
//! Built once from the command line and passed by reference through the
//! move and configure stages.

use std::path::PathBuf;

/// Root configuration for one bootstrapper run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapperConfig {
    /// Directory the agent distribution is copied from.
    pub source: PathBuf,
    /// Directory the agent distribution is copied to.
    pub target: PathBuf,
    /// Whether debug logs are enabled.
    pub debug: bool,
    /// Whether failures are logged but reported as success.
    pub suppress_errors: bool,
    /// Settings for the move stage.
    pub mover: MoveConfig,
    /// Settings for the configure stage.
    pub configure: ConfigureConfig,
}

/// Settings for the move stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveConfig {
    /// Work directory for the atomic copy. `None` copies straight into the target.
    pub work: Option<PathBuf>,
    /// Comma-separated technology filter. `None` copies everything.
    pub technology: Option<String>,
}

/// Settings for the configure stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigureConfig {
    /// Directory the optional input files are read from.
    pub input_dir: Option<PathBuf>,
    /// Directory the configuration files are written to.
    pub config_dir: Option<PathBuf>,
    /// Path the agent is mounted at inside the workload.
    pub install_path: String,
    /// Whether the agent is configured for fullstack monitoring.
    pub fullstack: bool,
    /// Tenant the agent reports to. Required with `fullstack`.
    pub tenant: Option<String>,
    /// Raw `key=value` pod attributes.
    pub pod_attributes: Vec<String>,
    /// Raw JSON container attributes, one entry per container.
    pub container_attributes: Vec<String>,
}

impl ConfigureConfig {
    /// Returns the input and config directories when both are set.
    ///
    /// The configure stage is a no-op otherwise.
    #[must_use]
    pub fn directories(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.input_dir.as_ref().zip(self.config_dir.as_ref())
    }

    /// Returns the tenant, treating an empty string as unset.
    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref().filter(|t| !t.is_empty())
    }
}

impl Default for ConfigureConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            config_dir: None,
            install_path: crate::constants::DEFAULT_INSTALL_PATH.to_string(),
            fullstack: false,
            tenant: None,
            pod_attributes: Vec::new(),
            container_attributes: Vec::new(),
        }
    }
}
