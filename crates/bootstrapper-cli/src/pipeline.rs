//! The move-then-configure run and its error suppression.

use bootstrapper_common::config::BootstrapperConfig;
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;

/// Moves the agent, then configures it.
///
/// With `suppress_errors` a failing stage is logged and the run reports
/// success; a suppressed move failure skips the configure stage.
///
/// # Errors
///
/// Returns the first stage error unless errors are suppressed.
pub fn run(fs: &dyn Filesystem, config: &BootstrapperConfig) -> Result<()> {
    tracing::info!(
        source = %config.source.display(),
        target = %config.target.display(),
        "starting to move the agent"
    );
    if let Err(e) = bootstrapper_move::execute(fs, &config.source, &config.target, &config.mover) {
        if config.suppress_errors {
            tracing::error!(error = %e, "error during moving, the error was suppressed");
            return Ok(());
        }
        tracing::error!(error = %e, "error during moving");
        return Err(e);
    }

    if let Err(e) = bootstrapper_configure::execute(fs, &config.target, &config.configure) {
        if config.suppress_errors {
            tracing::error!(error = %e, "error during configuration, the error was suppressed");
            return Ok(());
        }
        tracing::error!(error = %e, "error during configuration");
        return Err(e);
    }

    tracing::info!("bootstrapper finished");
    Ok(())
}
