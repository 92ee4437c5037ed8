//! Manifest-filtered copy.
//!
//! The source root carries a `manifest.json` that lists, per technology and
//! architecture, the files belonging to it. Only the files of the requested
//! technologies are copied; checksums and versions are carried but not
//! verified.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bootstrapper_common::constants::MANIFEST_FILE_NAME;
use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::copy::copy_file;

use crate::CopyStrategy;

/// Technology name to its per-architecture file lists.
pub type TechEntries = BTreeMap<String, ArchEntries>;

/// Architecture name to the files shipped for it.
pub type ArchEntries = BTreeMap<String, Vec<FileEntry>>;

/// Contents of `manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Files grouped by technology and architecture.
    #[serde(default)]
    pub technologies: TechEntries,
    /// Version of the distribution.
    #[serde(default)]
    pub version: String,
}

/// One file listed in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    /// Version of the file.
    #[serde(default)]
    pub version: String,
    /// MD5 checksum of the file.
    #[serde(default)]
    pub md5: String,
}

impl Manifest {
    /// Reads and decodes `manifest.json` from the `source` root.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the manifest is missing or unreadable, or a
    /// serialization error if it is not valid JSON.
    pub fn load(fs: &dyn Filesystem, source: &Path) -> Result<Self> {
        let path = source.join(MANIFEST_FILE_NAME);
        let raw = fs
            .read(&path)
            .map_err(|e| BootstrapperError::io(&path, e))?;
        serde_json::from_slice(&raw).map_err(|e| BootstrapperError::serialization(&path, e))
    }

    /// Collects the file paths of every requested technology across all
    /// architectures, deduplicated and sorted.
    ///
    /// Names are trimmed; unknown technologies are logged and skipped.
    pub fn files_for<'a>(&self, technologies: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut paths = BTreeSet::new();

        for tech in technologies {
            let tech = tech.trim();
            let Some(archs) = self.technologies.get(tech) else {
                tracing::info!(tech, "technology not found");
                continue;
            };

            for (arch, files) in archs {
                tracing::debug!(tech, arch = %arch, "collecting files for technology");
                paths.extend(files.iter().map(|file| file.path.clone()));
            }
        }

        paths.into_iter().collect()
    }
}

/// Returns the manifest paths for a comma-separated `technology` list.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded.
pub fn filter_files_by_technology(
    fs: &dyn Filesystem,
    source: &Path,
    technology: &str,
) -> Result<Vec<String>> {
    let manifest = Manifest::load(fs, source)?;
    Ok(manifest.files_for(technology.split(',')))
}

/// Copies the listed `paths` from `from` to `to`.
///
/// Every directory on the way to a file is created with the mode of its
/// source counterpart before the file itself is copied with its own mode.
/// `to` is created with the mode of `from`.
///
/// # Errors
///
/// Returns an I/O error for the first path component that cannot be
/// inspected, created, or copied.
pub fn copy_by_list(fs: &dyn Filesystem, from: &Path, to: &Path, paths: &[String]) -> Result<()> {
    let from_meta = fs.metadata(from).map_err(|e| {
        tracing::error!(error = %e, "error checking stat mode from source folder");
        BootstrapperError::io(from, e)
    })?;

    fs.create_dir_all(to, from_meta.mode()).map_err(|e| {
        tracing::error!(error = %e, "error creating target folder");
        BootstrapperError::io(to, e)
    })?;

    for path in paths {
        let mut walked = PathBuf::new();

        for part in path.split('/').filter(|p| !p.is_empty() && *p != ".") {
            walked.push(part);
            let source_path = from.join(&walked);
            let target_path = to.join(&walked);

            let source_meta = fs.metadata(&source_path).map_err(|e| {
                tracing::error!(
                    error = %e,
                    path = %source_path.display(),
                    "failed checking stat mode from source"
                );
                BootstrapperError::io(&source_path, e)
            })?;

            if source_meta.is_dir() {
                match fs.create_dir(&target_path, source_meta.mode()) {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            path = %target_path.display(),
                            "failed to create new dir"
                        );
                        return Err(BootstrapperError::io(&target_path, e));
                    }
                }
                tracing::debug!(
                    from = %source_path.display(),
                    to = %target_path.display(),
                    mode = %format!("{:o}", source_meta.mode()),
                    "created new dir"
                );
                continue;
            }

            tracing::debug!(
                from = %source_path.display(),
                to = %target_path.display(),
                mode = %format!("{:o}", source_meta.mode()),
                "copying file"
            );
            copy_file(fs, &source_path, &target_path)?;
        }
    }

    Ok(())
}

/// Copies only the files the manifest lists for the configured technologies.
#[derive(Debug, Clone)]
pub struct TechnologyCopy {
    technology: String,
}

impl TechnologyCopy {
    /// Creates the strategy for a comma-separated technology list.
    pub fn new(technology: impl Into<String>) -> Self {
        Self {
            technology: technology.into(),
        }
    }
}

impl CopyStrategy for TechnologyCopy {
    fn copy(&self, fs: &dyn Filesystem, from: &Path, to: &Path) -> Result<()> {
        tracing::info!(
            from = %from.display(),
            to = %to.display(),
            technology = %self.technology,
            "starting to copy (filtered)"
        );

        let paths = filter_files_by_technology(fs, from, &self.technology)?;
        copy_by_list(fs, from, to, &paths)
    }
}
