//! # bootstrapper
//!
//! Init-container entry point: copies the agent from a read-only source
//! volume to a shared target volume, then renders its per-container
//! configuration.

mod args;
mod logging;
mod pipeline;
mod version;

use bootstrapper_common::config::BootstrapperConfig;
use bootstrapper_fs::DiskFs;

use crate::args::Cli;
use crate::version::VersionInfo;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_lenient(
        std::env::args_os().map(|arg| arg.to_string_lossy().into_owned()),
    );
    logging::init(cli.debug);
    VersionInfo::current().log();

    if !cli.rest.is_empty() {
        tracing::debug!(ignored = ?cli.rest, "ignoring stray arguments");
    }

    let config = BootstrapperConfig::from(cli);
    tracing::debug!(config = ?config, "parsed configuration");

    pipeline::run(&DiskFs::new(), &config)?;
    Ok(())
}
