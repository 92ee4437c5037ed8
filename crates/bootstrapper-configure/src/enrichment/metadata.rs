//! Metadata enrichment files: `dt_metadata.json` and `dt_metadata.properties`.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::Serialize;

use bootstrapper_common::constants::{METADATA_JSON_PATH, METADATA_PROPERTIES_PATH};
use bootstrapper_common::error::{BootstrapperError, Result};
use bootstrapper_fs::Filesystem;
use bootstrapper_fs::file::create_file;

use crate::attributes::container::ContainerAttributes;
use crate::attributes::pod::PodAttributes;
use crate::attributes::to_string_map;

const ORIGIN: &str = "dt_metadata";

#[derive(Debug, Serialize)]
struct Metadata<'a> {
    #[serde(flatten)]
    pod: &'a PodAttributes,
    #[serde(rename = "k8s.container.name")]
    container_name: &'a str,
    #[serde(rename = "dt.kubernetes.cluster.id", skip_serializing_if = "Option::is_none")]
    cluster_id: Option<&'a str>,
    #[serde(
        rename = "dt.kubernetes.workload.kind",
        skip_serializing_if = "Option::is_none"
    )]
    workload_kind: Option<&'a str>,
    #[serde(
        rename = "dt.kubernetes.workload.name",
        skip_serializing_if = "Option::is_none"
    )]
    workload_name: Option<&'a str>,
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

/// Returns the flat metadata map for one container.
///
/// Holds the recognised pod attributes, `k8s.container.name`, the legacy
/// `dt.kubernetes.*` aliases of the cluster and workload attributes, and
/// finally the user-defined pod attributes, which win on conflicts.
///
/// # Errors
///
/// Returns a serialization error if the attributes cannot be flattened.
pub fn metadata_map(
    pod: &PodAttributes,
    container: &ContainerAttributes,
) -> Result<BTreeMap<String, String>> {
    let metadata = Metadata {
        pod,
        container_name: &container.container_name,
        cluster_id: non_empty(&pod.cluster_info.cluster_uid),
        workload_kind: non_empty(&pod.workload_info.workload_kind),
        workload_name: non_empty(&pod.workload_info.workload_name),
    };

    let mut map = to_string_map(&metadata, ORIGIN)?;
    map.extend(
        pod.user_defined
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    Ok(map)
}

/// Writes the metadata of one container as JSON and as properties.
///
/// # Errors
///
/// Returns a serialization error if the map cannot be built or encoded, or
/// an I/O error if a file cannot be written.
pub fn configure(
    fs: &dyn Filesystem,
    container_config_dir: &Path,
    pod: &PodAttributes,
    container: &ContainerAttributes,
) -> Result<()> {
    let map = metadata_map(pod, container)?;
    tracing::debug!(entries = map.len(), "formatted metadata");

    let json_path = container_config_dir.join(METADATA_JSON_PATH);
    let json =
        serde_json::to_string(&map).map_err(|e| BootstrapperError::serialization(&json_path, e))?;
    create_file(fs, &json_path, &json)?;

    let mut properties = String::new();
    for (key, value) in &map {
        let _ = writeln!(properties, "{key}={value}");
    }
    create_file(
        fs,
        &container_config_dir.join(METADATA_PROPERTIES_PATH),
        &properties,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::pod::{ClusterInfo, PodInfo, WorkloadInfo};
    use bootstrapper_fs::MemoryFs;

    fn pod() -> PodAttributes {
        PodAttributes {
            user_defined: BTreeMap::from([("beep".to_string(), "boop".to_string())]),
            pod_info: PodInfo {
                pod_name: "pod-1".into(),
                namespace_name: "prod".into(),
                ..PodInfo::default()
            },
            workload_info: WorkloadInfo {
                workload_kind: "Deployment".into(),
                workload_name: "shop".into(),
            },
            cluster_info: ClusterInfo {
                cluster_uid: "cluster-uid".into(),
                ..ClusterInfo::default()
            },
        }
    }

    fn container() -> ContainerAttributes {
        ContainerAttributes {
            container_name: "app".into(),
            ..ContainerAttributes::default()
        }
    }

    #[test]
    fn map_holds_known_legacy_and_user_keys() {
        let map = metadata_map(&pod(), &container()).expect("map");

        assert_eq!(map["k8s.pod.name"], "pod-1");
        assert_eq!(map["k8s.namespace.name"], "prod");
        assert_eq!(map["k8s.container.name"], "app");
        assert_eq!(map["k8s.cluster.uid"], "cluster-uid");
        assert_eq!(map["dt.kubernetes.cluster.id"], "cluster-uid");
        assert_eq!(map["dt.kubernetes.workload.kind"], "Deployment");
        assert_eq!(map["dt.kubernetes.workload.name"], "shop");
        assert_eq!(map["beep"], "boop");
        assert!(!map.contains_key("k8s.pod.uid"));
    }

    #[test]
    fn legacy_keys_are_left_out_when_empty() {
        let map = metadata_map(&PodAttributes::default(), &container()).expect("map");

        assert_eq!(
            map,
            BTreeMap::from([("k8s.container.name".to_string(), "app".to_string())])
        );
    }

    #[test]
    fn user_defined_wins_on_conflict() {
        let mut pod = pod();
        let _ = pod
            .user_defined
            .insert("k8s.container.name".into(), "custom".into());

        let map = metadata_map(&pod, &container()).expect("map");

        assert_eq!(map["k8s.container.name"], "custom");
    }

    #[test]
    fn files_are_written() {
        let fs = MemoryFs::new();
        let dir = Path::new("/config/app");

        configure(&fs, dir, &pod(), &container()).expect("configure");

        let json = fs
            .read_to_string(&dir.join("enrichment/dt_metadata.json"))
            .expect("json");
        let decoded: BTreeMap<String, String> = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, metadata_map(&pod(), &container()).expect("map"));

        let properties = fs
            .read_to_string(&dir.join("enrichment/dt_metadata.properties"))
            .expect("properties");
        assert!(properties.starts_with("beep=boop\ndt.kubernetes.cluster.id=cluster-uid\n"));
        assert_eq!(properties.lines().count(), decoded.len());
    }
}
