//! `ld.so.preload` pointing the dynamic loader at the agent.

use std::path::Path;

use bootstrapper_common::constants::{LIB_AGENT_PROC_PATH, PRELOAD_CONFIG_PATH};
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::create_file;

/// Writes `<config_dir>/oneagent/ld.so.preload` with the path of the agent
/// library under `install_path`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn configure(fs: &dyn Filesystem, config_dir: &Path, install_path: &str) -> Result<()> {
    tracing::info!(
        config_directory = %config_dir.display(),
        install_path,
        "configuring ld.so.preload"
    );

    let library = Path::new(install_path).join(LIB_AGENT_PROC_PATH);
    create_file(
        fs,
        &config_dir.join(PRELOAD_CONFIG_PATH),
        &library.to_string_lossy(),
    )
}
