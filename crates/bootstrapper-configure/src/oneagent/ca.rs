//! Certificate bundles for the agent.

use std::path::Path;

use bootstrapper_common::constants::{
    ACTIVEGATE_CERTS_INPUT_FILE, CERTS_FILE_NAME, CUSTOM_KEYS_PATH, PROXY_CERTS_FILE_NAME,
    TRUSTED_CERTS_INPUT_FILE,
};
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::{create_file, read_optional};

/// Writes `custom.pem` and `custom_proxy.pem` from the certificate inputs.
///
/// `custom.pem` holds the `ActiveGate` certificates, a newline, then the
/// trusted certificates; it is written if either input has content.
/// `custom_proxy.pem` holds only the trusted certificates and is written if
/// they have content. Missing inputs count as empty.
///
/// # Errors
///
/// Returns an I/O error if an input exists but cannot be read, or if an
/// output cannot be written.
pub fn configure(fs: &dyn Filesystem, input_dir: &Path, container_config_dir: &Path) -> Result<()> {
    let trusted = read_optional(fs, &input_dir.join(TRUSTED_CERTS_INPUT_FILE))?.unwrap_or_default();
    let activegate =
        read_optional(fs, &input_dir.join(ACTIVEGATE_CERTS_INPUT_FILE))?.unwrap_or_default();

    let keys_dir = container_config_dir.join(CUSTOM_KEYS_PATH);

    if !activegate.is_empty() || !trusted.is_empty() {
        let path = keys_dir.join(CERTS_FILE_NAME);
        tracing::info!(path = %path.display(), "creating cert file");
        create_file(fs, &path, &format!("{activegate}\n{trusted}"))?;
    }

    if !trusted.is_empty() {
        let path = keys_dir.join(PROXY_CERTS_FILE_NAME);
        tracing::info!(path = %path.display(), "creating cert file");
        create_file(fs, &path, &trusted)?;
    }

    Ok(())
}
