//! Pod attributes from repeated `--attribute key=value` flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bootstrapper_common::error::{BootstrapperError, Result};

use super::to_string_map;

/// Flag the raw attributes arrive on.
pub const FLAG: &str = "attribute";

/// Pod attributes: the recognised keys plus everything else the user passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodAttributes {
    /// Attributes with keys that are not recognised.
    #[serde(skip)]
    pub user_defined: BTreeMap<String, String>,
    /// Pod identity.
    #[serde(flatten)]
    pub pod_info: PodInfo,
    /// Owning workload.
    #[serde(flatten)]
    pub workload_info: WorkloadInfo,
    /// Cluster identity.
    #[serde(flatten)]
    pub cluster_info: ClusterInfo,
}

/// Pod identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodInfo {
    /// `k8s.pod.name`
    #[serde(rename = "k8s.pod.name", default, skip_serializing_if = "String::is_empty")]
    pub pod_name: String,
    /// `k8s.pod.uid`
    #[serde(rename = "k8s.pod.uid", default, skip_serializing_if = "String::is_empty")]
    pub pod_uid: String,
    /// `k8s.node.name`
    #[serde(rename = "k8s.node.name", default, skip_serializing_if = "String::is_empty")]
    pub node_name: String,
    /// `k8s.namespace.name`
    #[serde(
        rename = "k8s.namespace.name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub namespace_name: String,
}

/// Owning workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadInfo {
    /// `k8s.workload.kind`
    #[serde(
        rename = "k8s.workload.kind",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub workload_kind: String,
    /// `k8s.workload.name`
    #[serde(
        rename = "k8s.workload.name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub workload_name: String,
}

/// Cluster identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// `k8s.cluster.uid`
    #[serde(rename = "k8s.cluster.uid", default, skip_serializing_if = "String::is_empty")]
    pub cluster_uid: String,
    /// `k8s.cluster.name`
    #[serde(
        rename = "k8s.cluster.name",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub cluster_name: String,
    /// `dt.entity.kubernetes_cluster`
    #[serde(
        rename = "dt.entity.kubernetes_cluster",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub dt_cluster_entity: String,
}

impl PodAttributes {
    /// Returns the recognised, non-empty attributes as a flat map.
    ///
    /// User-defined attributes are not included.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the record cannot be flattened.
    pub fn to_map(&self) -> Result<BTreeMap<String, String>> {
        to_string_map(self, FLAG)
    }

    /// Converts the attributes back into `--attribute=key=value` arguments.
    ///
    /// Empty values are skipped.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the record cannot be flattened.
    pub fn to_args(&self) -> Result<Vec<String>> {
        let known = self.to_map()?;
        Ok(known
            .iter()
            .chain(&self.user_defined)
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("--{FLAG}={key}={value}"))
            .collect())
    }
}

/// Parses raw `key=value` attributes.
///
/// Entries that do not split into exactly two parts on `=` are ignored.
/// Recognised keys with non-empty values fill the typed fields; all other
/// entries end up in [`PodAttributes::user_defined`]. A later duplicate key
/// wins.
///
/// # Errors
///
/// Returns a serialization error if the collected map cannot be decoded.
pub fn parse_attributes(raw: &[String]) -> Result<PodAttributes> {
    let mut raw_map = BTreeMap::new();
    for attribute in raw {
        let parts: Vec<&str> = attribute.split('=').collect();
        if let [key, value] = parts.as_slice() {
            let _ = raw_map.insert((*key).to_string(), (*value).to_string());
        }
    }

    let value =
        serde_json::to_value(&raw_map).map_err(|e| BootstrapperError::serialization(FLAG, e))?;
    let mut attributes: PodAttributes =
        serde_json::from_value(value).map_err(|e| BootstrapperError::serialization(FLAG, e))?;

    let known = attributes.to_map()?;
    raw_map.retain(|key, _| !known.contains_key(key));
    attributes.user_defined = raw_map;

    Ok(attributes)
}
