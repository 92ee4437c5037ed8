//! Curl options for the agent's initial connection.

use std::path::Path;

use bootstrapper_common::constants::{
    CURL_OPTIONS_FILE_NAME, CUSTOM_KEYS_PATH, INITIAL_CONNECT_RETRY_INPUT_FILE,
};
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::{create_file, read_optional};

/// Writes `curl_options.conf` from the `initial-connect-retry` input.
///
/// The input is inserted as it is. A missing input is skipped.
///
/// # Errors
///
/// Returns an I/O error if the input cannot be read or the output written.
pub fn configure(fs: &dyn Filesystem, input_dir: &Path, container_config_dir: &Path) -> Result<()> {
    let input = input_dir.join(INITIAL_CONNECT_RETRY_INPUT_FILE);
    let Some(retry) = read_optional(fs, &input)? else {
        tracing::info!(
            path = %input.display(),
            "input file not present, skipping curl options configuration"
        );
        return Ok(());
    };

    let path = container_config_dir
        .join(CUSTOM_KEYS_PATH)
        .join(CURL_OPTIONS_FILE_NAME);
    tracing::info!(path = %path.display(), "configuring curl_options.conf");

    create_file(fs, &path, &format!("initialConnectRetryMs {retry}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootstrapper_fs::MemoryFs;

    const OUTPUT: &str = "/config/app/oneagent/agent/customkeys/curl_options.conf";

    #[test]
    fn retry_is_written() {
        let fs = MemoryFs::new();
        create_file(&fs, Path::new("/input/initial-connect-retry"), "6500").expect("seed");

        configure(&fs, Path::new("/input"), Path::new("/config/app")).expect("configure");

        assert_eq!(
            fs.read_to_string(Path::new(OUTPUT)).expect("read"),
            "initialConnectRetryMs 6500\n"
        );
    }

    #[test]
    fn missing_input_is_skipped() {
        let fs = MemoryFs::new();

        configure(&fs, Path::new("/input"), Path::new("/config/app")).expect("skip");

        assert!(!fs.exists(Path::new(OUTPUT)).expect("exists"));
    }
}
