//! `container.conf` describing the workload to the agent.

use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use bootstrapper_common::constants::CONTAINER_CONF_PATH;
use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::create_file;

use crate::attributes::container::ContainerAttributes;
use crate::attributes::pod::PodAttributes;
use crate::attributes::to_string_map;

/// Origin used in serialization errors.
const ORIGIN: &str = "container.conf";

#[derive(Debug, Serialize)]
struct ContainerSection<'a> {
    #[serde(rename = "k8s_node_name")]
    node_name: &'a str,
    #[serde(rename = "k8s_fullpodname")]
    pod_name: &'a str,
    #[serde(rename = "k8s_poduid")]
    pod_uid: &'a str,
    #[serde(rename = "k8s_namespace")]
    namespace: &'a str,
    #[serde(rename = "k8s_cluster_id")]
    cluster_id: &'a str,
    #[serde(rename = "k8s_containername")]
    container_name: &'a str,
    #[serde(rename = "containerName")]
    deprecated_container_name: &'a str,
    #[serde(rename = "imageName")]
    image_name: String,
}

#[derive(Debug, Serialize)]
struct HostSection<'a> {
    tenant: &'a str,
    #[serde(rename = "isCloudNativeFullStack")]
    is_fullstack: &'a str,
}

/// Writes `<container_config_dir>/oneagent/agent/config/container.conf`.
///
/// The `[container]` section is always written. In fullstack mode the node
/// name is added to it and a `[host]` section with the tenant follows.
///
/// # Errors
///
/// Returns a validation error when `fullstack` is set without a tenant,
/// before anything is written, or an I/O error if the file cannot be written.
pub fn configure(
    fs: &dyn Filesystem,
    container_config_dir: &Path,
    container: &ContainerAttributes,
    pod: &PodAttributes,
    tenant: Option<&str>,
    fullstack: bool,
) -> Result<()> {
    tracing::info!(
        config_directory = %container_config_dir.display(),
        "configuring container.conf"
    );

    let host_tenant = if fullstack {
        tracing::info!(
            tenant = tenant.unwrap_or_default(),
            "fullstack flag detected, configuring accordingly"
        );
        let tenant = tenant
            .filter(|t| !t.is_empty())
            .ok_or_else(|| BootstrapperError::Validation {
                message: "fullstack mode is set, but no tenant was provided".into(),
            })?;
        Some(tenant)
    } else {
        None
    };

    let content = render(container, pod, host_tenant)?;
    create_file(fs, &container_config_dir.join(CONTAINER_CONF_PATH), &content)
}

fn render(
    container: &ContainerAttributes,
    pod: &PodAttributes,
    tenant: Option<&str>,
) -> Result<String> {
    let container_section = ContainerSection {
        node_name: if tenant.is_some() {
            pod.pod_info.node_name.as_str()
        } else {
            ""
        },
        pod_name: &pod.pod_info.pod_name,
        pod_uid: &pod.pod_info.pod_uid,
        namespace: &pod.pod_info.namespace_name,
        cluster_id: &pod.cluster_info.cluster_uid,
        container_name: &container.container_name,
        deprecated_container_name: &container.container_name,
        image_name: container.image_info.to_uri(),
    };

    let mut content = section("container", &container_section)?;
    if let Some(tenant) = tenant {
        let host_section = HostSection {
            tenant,
            is_fullstack: "true",
        };
        content.push_str(&section("host", &host_section)?);
    }
    Ok(content)
}

/// Renders `[name]`, one `key value` line per non-empty field in key order,
/// and a closing blank line.
fn section<T: Serialize>(name: &str, fields: &T) -> Result<String> {
    let mut content = format!("[{name}]\n");
    for (key, value) in to_string_map(fields, ORIGIN)? {
        if !value.is_empty() {
            let _ = writeln!(content, "{key} {value}");
        }
    }
    content.push('\n');
    Ok(content)
}
