//! `endpoint.properties` passthrough.

use std::path::Path;

use bootstrapper_common::constants::{ENDPOINT_DIR, ENDPOINT_FILE_NAME};
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::{create_file, read_optional};

/// Copies `endpoint.properties` from the input directory into the
/// container's enrichment directory. A missing input is skipped.
///
/// # Errors
///
/// Returns an I/O error if the input cannot be read or the copy written.
pub fn configure(fs: &dyn Filesystem, input_dir: &Path, container_config_dir: &Path) -> Result<()> {
    let input = input_dir.join(ENDPOINT_FILE_NAME);
    let Some(properties) = read_optional(fs, &input)? else {
        tracing::info!(
            path = %input.display(),
            "input file not present, skipping endpoint.properties configuration"
        );
        return Ok(());
    };

    create_file(
        fs,
        &container_config_dir.join(ENDPOINT_DIR).join(ENDPOINT_FILE_NAME),
        &properties,
    )
}
