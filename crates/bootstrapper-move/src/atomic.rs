//! All-or-nothing copies through a work directory.
//!
//! The inner strategy writes into the work directory, which is renamed onto
//! the target once the copy is complete. The rename is the only commit
//! point: on failure the work directory is removed and the target is never
//! created.

use std::path::{Path, PathBuf};

use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::Filesystem;

use crate::CopyStrategy;

/// Wraps another [`CopyStrategy`] so that the target appears in one step.
///
/// The work directory must be on the same filesystem as the target. It is
/// created with the mode of the source root, which the target keeps after
/// the rename.
#[derive(Debug, Clone)]
pub struct Atomic<S> {
    work: PathBuf,
    inner: S,
}

impl<S> Atomic<S> {
    /// Creates the wrapper around `inner`, using `work` as scratch space.
    pub fn new(work: impl Into<PathBuf>, inner: S) -> Self {
        Self {
            work: work.into(),
            inner,
        }
    }
}

impl<S: CopyStrategy> Atomic<S> {
    fn copy_and_commit(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
        if let Err(e) = self.inner.copy(fs, from, &self.work) {
            tracing::error!(error = %e, "error copying folder");
            return Err(e);
        }

        fs.rename(&self.work, to).map_err(|e| {
            tracing::error!(error = %e, "error moving folder");
            BootstrapperError::io(to, e)
        })
    }
}

impl<S: CopyStrategy> CopyStrategy for Atomic<S> {
    fn copy(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
        tracing::info!(
            from = %from.display(),
            to = %to.display(),
            work = %self.work.display(),
            "setting up atomic operation"
        );

        fs.remove_dir_all(&self.work).map_err(|e| {
            tracing::error!(error = %e, "failed initial cleanup of workdir");
            BootstrapperError::io(&self.work, e)
        })?;

        let mode = fs
            .metadata(from)
            .map_err(|e| BootstrapperError::io(from, e))?
            .mode();
        fs.create_dir_all(&self.work, mode).map_err(|e| {
            tracing::error!(error = %e, "failed to create the base workdir");
            BootstrapperError::io(&self.work, e)
        })?;

        if let Err(e) = self.copy_and_commit(fs, from, to) {
            if let Err(cleanup) = fs.remove_dir_all(&self.work) {
                tracing::error!(
                    error = %cleanup,
                    work = %self.work.display(),
                    "failed cleanup of workdir after failure"
                );
            }
            return Err(e);
        }

        tracing::info!(
            from = %from.display(),
            to = %to.display(),
            work = %self.work.display(),
            "successfully finalized atomic operation"
        );
        Ok(())
    }
}
