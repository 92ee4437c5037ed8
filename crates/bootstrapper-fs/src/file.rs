//! Helpers for generated files and optional inputs.

use std::path::Path;

use bootstrapper_common::constants::DEFAULT_MODE;
use bootstrapper_common::error::{BootstrapperError, Result};

use crate::Filesystem;

/// Writes `content` to `path`, creating missing parent directories first.
///
/// New directories and files get [`DEFAULT_MODE`] filtered through the umask.
///
/// # Errors
///
/// Returns an I/O error if a parent cannot be created or the write fails.
pub fn create_file(fs: &dyn Filesystem, path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs.create_dir_all_masked(parent, DEFAULT_MODE)
            .map_err(|e| BootstrapperError::io(parent, e))?;
    }
    fs.write_masked(path, content.as_bytes(), DEFAULT_MODE)
        .map_err(|e| BootstrapperError::io(path, e))?;
    tracing::debug!(path = %path.display(), "created file");
    Ok(())
}

/// Reads an optional input file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns an I/O error for any failure other than the file being absent.
pub fn read_optional(fs: &dyn Filesystem, path: &Path) -> Result<Option<String>> {
    match fs.read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BootstrapperError::io(path, e)),
    }
}
