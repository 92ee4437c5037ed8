//! The `agent/bin/current` symlink.

use std::path::Path;

use bootstrapper_common::constants::{CURRENT_VERSION_DIR, INSTALLER_VERSION_FILE_PATH};
use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::{Filesystem, symlink};

/// Points `agent/bin/current` inside `target` at the versioned directory
/// named by `agent/installer.version`.
///
/// The link is relative, so it stays valid wherever the target is mounted.
/// Nothing happens if `agent/bin/current` already exists.
///
/// # Errors
///
/// Returns an I/O error if the version file is missing or unreadable, and
/// [`BootstrapperError::Validation`] if it is empty.
pub fn create_current_symlink(fs: &dyn Filesystem, target: &Path) -> Result<()> {
    let current = target.join(CURRENT_VERSION_DIR);

    match fs.exists(&current) {
        Ok(true) => {
            tracing::info!(
                current_version_dir = %current.display(),
                "the current version dir already exists, skipping symlinking"
            );
            return Ok(());
        }
        Ok(false) => {}
        Err(e) => {
            tracing::info!(
                current_version_dir = %current.display(),
                "failed to check the state of the current version dir"
            );
            return Err(BootstrapperError::io(&current, e));
        }
    }

    let version_file = target.join(INSTALLER_VERSION_FILE_PATH);
    let version = fs.read_to_string(&version_file).map_err(|e| {
        tracing::info!(
            version_file = %version_file.display(),
            "failed to get the version from the filesystem"
        );
        BootstrapperError::io(&version_file, e)
    })?;

    let version = version.trim();
    if version.is_empty() {
        return Err(BootstrapperError::Validation {
            message: format!("{} is empty", version_file.display()),
        });
    }

    symlink::create(fs, Path::new(version), &current)
}
