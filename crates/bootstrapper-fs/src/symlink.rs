//! Symlink creation that tolerates backends without symlinks.

use std::io;
use std::path::Path;

use bootstrapper_common::error::{BootstrapperError, Result};

use crate::Filesystem;

/// Creates a symlink at `link` pointing to `original`.
///
/// Succeeds without doing anything when `link` already exists or when the
/// backend cannot create symlinks at all.
///
/// # Errors
///
/// Returns an I/O error if the symlink cannot be created for another reason.
pub fn create(fs: &dyn Filesystem, original: &Path, link: &Path) -> Result<()> {
    if fs.exists(link).unwrap_or(false) {
        tracing::info!(location = %link.display(), "symlink already exists");
        return Ok(());
    }

    tracing::info!(
        points_to = %original.display(),
        location = %link.display(),
        "creating symlink"
    );

    match fs.symlink(original, link) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::Unsupported => {
            tracing::info!(original = %original.display(), "symlinking not possible");
            Ok(())
        }
        Err(e) => {
            tracing::info!(original = %original.display(), "symlinking failed");
            Err(BootstrapperError::io(link, e))
        }
    }
}
