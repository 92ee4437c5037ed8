//! Process module config (`ruxitagentproc.conf`) generation.
//!
//! The agent ships a baseline config in the target tree. An optional JSON
//! payload from the input directory is merged on top of it and the result is
//! written into each container's config directory, adjusted for a read-only
//! install.

pub mod process_config;
pub mod section_map;

use std::path::{Path, PathBuf};

use bootstrapper_common::constants::{
    DEFAULT_MODE, PMC_DESTINATION_PATH, PMC_INPUT_FILE_NAME, PMC_SOURCE_PATH,
};
use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::read_optional;

pub use process_config::{ProcessConfig, Property};
pub use section_map::SectionMap;

/// Returns where the baseline config lives inside the target tree.
#[must_use]
pub fn source_path(target: &Path) -> PathBuf {
    target.join(PMC_SOURCE_PATH)
}

/// Returns where the merged config is written for a container.
#[must_use]
pub fn destination_path(container_config_dir: &Path) -> PathBuf {
    container_config_dir.join(PMC_DESTINATION_PATH)
}

/// Merges the input payload onto the baseline config for one container.
///
/// A missing payload is skipped.
///
/// # Errors
///
/// Returns an error if the payload cannot be read or decoded, or if
/// [`create`] fails.
pub fn configure(
    fs: &dyn Filesystem,
    input_dir: &Path,
    target: &Path,
    container_config_dir: &Path,
    install_path: &str,
) -> Result<()> {
    let Some(mut overlay) = load_overlay(fs, input_dir)? else {
        tracing::info!(
            path = %input_dir.join(PMC_INPUT_FILE_NAME).display(),
            "input file not present, skipping ruxitagentproc.conf configuration"
        );
        return Ok(());
    };
    overlay.install_path = Some(install_path.to_string());

    let src = source_path(target);
    let dst = destination_path(container_config_dir);
    tracing::info!(
        source = %src.display(),
        destination = %dst.display(),
        "creating ruxitagentproc.conf"
    );

    create(fs, &src, &dst, &overlay)
}

/// Writes `src` merged with `overlay` to `dst`.
///
/// `dst` gets the permission bits of `src`; missing parents of `dst` are
/// created subject to the umask. Bytes of `src` that are not valid UTF-8 are
/// replaced rather than rejected.
///
/// # Errors
///
/// Returns an I/O error if `src` cannot be read or `dst` cannot be written.
pub fn create(fs: &dyn Filesystem, src: &Path, dst: &Path, overlay: &ProcessConfig) -> Result<()> {
    let mode = fs
        .metadata(src)
        .map_err(|e| BootstrapperError::io(src, e))?
        .mode();
    let content = fs.read(src).map_err(|e| BootstrapperError::io(src, e))?;

    let merged = ProcessConfig::from_conf(&String::from_utf8_lossy(&content)).merge(overlay);

    if let Some(parent) = dst.parent() {
        fs.create_dir_all_masked(parent, DEFAULT_MODE)
            .map_err(|e| BootstrapperError::io(parent, e))?;
    }
    fs.write(dst, merged.to_string().as_bytes(), mode)
        .map_err(|e| BootstrapperError::io(dst, e))?;

    tracing::debug!(
        path = %dst.display(),
        properties = merged.properties.len(),
        "wrote merged process module config"
    );
    Ok(())
}

/// Returns the payload for `input_dir`, if there is one.
///
/// # Errors
///
/// Returns an error if the payload exists but cannot be read or decoded.
pub fn load_overlay(fs: &dyn Filesystem, input_dir: &Path) -> Result<Option<ProcessConfig>> {
    let input_path = input_dir.join(PMC_INPUT_FILE_NAME);
    read_optional(fs, &input_path)?
        .map(|raw| {
            ProcessConfig::from_json(raw.as_bytes())
                .map_err(|e| BootstrapperError::serialization(&input_path, e))
        })
        .transpose()
}
