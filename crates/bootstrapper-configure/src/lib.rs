//! # bootstrapper-configure
//!
//! Renders the agent configuration for every container of the workload.
//!
//! Handles:
//! - **Attributes**: pod `key=value` and container JSON attributes.
//! - **PMC**: the `ruxitagentproc.conf` merge engine and read-only rewrite.
//! - **Agent files**: `ld.so.preload`, `container.conf`, certificates, and
//!   curl options.
//! - **Enrichment**: metadata files and the `endpoint.properties` copy.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod attributes;
pub mod enrichment;
pub mod oneagent;
pub mod pmc;

use std::path::Path;

use bootstrapper_common::config::ConfigureConfig;
use bootstrapper_common::error::Result;
use bootstrapper_fs::Filesystem;

use attributes::container::ContainerAttributes;
use attributes::pod::PodAttributes;

/// Writes the configuration for every container described in `config`.
///
/// Does nothing unless both the input and the config directory are set.
/// The preload file is written once; all other files go to
/// `<config_dir>/<container name>`. The first failure stops the run.
///
/// # Errors
///
/// Returns the first attribute parsing, validation, or I/O error.
pub fn execute(fs: &dyn Filesystem, target: &Path, config: &ConfigureConfig) -> Result<()> {
    let Some((input_dir, config_dir)) = config.directories() else {
        tracing::debug!("input or config directory not set, skipping configuration");
        return Ok(());
    };

    tracing::info!(
        config_directory = %config_dir.display(),
        input_directory = %input_dir.display(),
        "starting configuration"
    );

    oneagent::preload::configure(fs, config_dir, &config.install_path)
        .inspect_err(|_| tracing::info!("failed to configure the ld.so.preload"))?;

    let pod = attributes::pod::parse_attributes(&config.pod_attributes)?;
    let containers = attributes::container::parse_attributes(&config.container_attributes)?;

    for container in &containers {
        let container_dir = config_dir.join(&container.container_name);
        tracing::info!(path = %container_dir.display(), "starting to configure the container");
        configure_container(fs, input_dir, target, &container_dir, config, &pod, container)?;
    }

    tracing::info!(
        config_directory = %config_dir.display(),
        containers = containers.len(),
        "finished configuration"
    );
    Ok(())
}

fn configure_container(
    fs: &dyn Filesystem,
    input_dir: &Path,
    target: &Path,
    container_dir: &Path,
    config: &ConfigureConfig,
    pod: &PodAttributes,
    container: &ContainerAttributes,
) -> Result<()> {
    pmc::configure(fs, input_dir, target, container_dir, &config.install_path)
        .inspect_err(|_| failed("ruxitagentproc.conf", container_dir))?;
    oneagent::container_conf::configure(
        fs,
        container_dir,
        container,
        pod,
        config.tenant(),
        config.fullstack,
    )
    .inspect_err(|_| failed("container.conf", container_dir))?;
    enrichment::metadata::configure(fs, container_dir, pod, container)
        .inspect_err(|_| failed("metadata enrichment", container_dir))?;
    enrichment::endpoint::configure(fs, input_dir, container_dir)
        .inspect_err(|_| failed("endpoint.properties", container_dir))?;
    oneagent::ca::configure(fs, input_dir, container_dir)
        .inspect_err(|_| failed("certificates", container_dir))?;
    oneagent::curl::configure(fs, input_dir, container_dir)
        .inspect_err(|_| failed("curl options", container_dir))?;
    Ok(())
}

fn failed(step: &str, container_dir: &Path) {
    tracing::info!(
        step,
        config_directory = %container_dir.display(),
        "failed to configure the container"
    );
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use bootstrapper_common::error::BootstrapperError;
    use bootstrapper_fs::MemoryFs;
    use bootstrapper_fs::file::create_file;

    fn config() -> ConfigureConfig {
        ConfigureConfig {
            input_dir: Some(PathBuf::from("/input")),
            config_dir: Some(PathBuf::from("/config")),
            pod_attributes: vec!["k8s.pod.name=pod-1".into()],
            container_attributes: vec![
                r#"{"k8s.container.name":"app"}"#.into(),
                r#"{"k8s.container.name":"sidecar"}"#.into(),
            ],
            ..ConfigureConfig::default()
        }
    }

    #[test]
    fn missing_directories_skip_everything() {
        let fs = MemoryFs::new();
        let config = ConfigureConfig {
            config_dir: None,
            ..config()
        };

        execute(&fs, Path::new("/target"), &config).expect("skip");

        assert!(!fs.exists(Path::new("/config")).expect("exists"));
    }

    #[test]
    fn every_container_gets_its_directory() {
        let fs = MemoryFs::new();
        create_file(&fs, Path::new("/input/initial-connect-retry"), "100").expect("seed");

        execute(&fs, Path::new("/target"), &config()).expect("configure");

        assert!(fs.exists(Path::new("/config/oneagent/ld.so.preload")).expect("exists"));
        for name in ["app", "sidecar"] {
            let dir = Path::new("/config").join(name);
            assert!(fs.exists(&dir.join("oneagent/agent/config/container.conf")).expect("conf"));
            assert!(fs.exists(&dir.join("enrichment/dt_metadata.json")).expect("json"));
            assert!(
                fs.exists(&dir.join("oneagent/agent/customkeys/curl_options.conf"))
                    .expect("curl")
            );
        }
    }

    #[test]
    fn invalid_container_attribute_stops_before_containers() {
        let fs = MemoryFs::new();
        let config = ConfigureConfig {
            container_attributes: vec!["not json".into()],
            ..config()
        };

        let err = execute(&fs, Path::new("/target"), &config).expect_err("invalid");

        assert!(matches!(err, BootstrapperError::Serialization { .. }));
        assert!(fs.exists(Path::new("/config/oneagent/ld.so.preload")).expect("exists"));
    }

    #[test]
    fn fullstack_without_tenant_fails() {
        let fs = MemoryFs::new();
        let config = ConfigureConfig {
            fullstack: true,
            ..config()
        };

        let err = execute(&fs, Path::new("/target"), &config).expect_err("no tenant");

        assert!(matches!(err, BootstrapperError::Validation { .. }));
        assert!(
            !fs.exists(Path::new("/config/app/oneagent/agent/config/container.conf"))
                .expect("exists")
        );
    }
}
