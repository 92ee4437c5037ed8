//! Plain recursive copy.

use std::path::Path;

use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::copy::copy_folder;

use crate::CopyStrategy;

/// Copies the whole source tree, preserving permission bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCopy;

impl CopyStrategy for SimpleCopy {
    fn copy(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
        tracing::info!(from = %from.display(), to = %to.display(), "starting to copy (simple)");

        if let Err(e) = copy_folder(fs, from, to) {
            tracing::error!(error = %e, "error moving folder");
            return Err(e);
        }

        tracing::info!(from = %from.display(), to = %to.display(), "successfully copied");
        Ok(())
    }
}
