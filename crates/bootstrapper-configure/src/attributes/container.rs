//! Container attributes from repeated `--attribute-container <json>` flags.

use serde::{Deserialize, Serialize};

use bootstrapper_common::error::{BootstrapperError, Result};

/// Flag the raw attributes arrive on.
pub const FLAG: &str = "attribute-container";

/// One container of the workload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerAttributes {
    /// Image the container runs.
    #[serde(flatten)]
    pub image_info: ImageInfo,
    /// `k8s.container.name`; also names the per-container config directory.
    #[serde(rename = "k8s.container.name", default)]
    pub container_name: String,
}

/// Image reference parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// `container_image.registry`
    #[serde(
        rename = "container_image.registry",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub registry: String,
    /// `container_image.repository`
    #[serde(
        rename = "container_image.repository",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub repository: String,
    /// `container_image.tags`
    #[serde(
        rename = "container_image.tags",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub tag: String,
    /// `container_image.digest`
    #[serde(
        rename = "container_image.digest",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub image_digest: String,
}

impl ImageInfo {
    /// Formats the image as `registry/repository:tag@digest`, leaving out
    /// the parts that are empty.
    #[must_use]
    pub fn to_uri(&self) -> String {
        let mut uri = if self.registry.is_empty() {
            self.repository.clone()
        } else {
            format!("{}/{}", self.registry, self.repository)
        };
        if !self.tag.is_empty() {
            uri.push(':');
            uri.push_str(&self.tag);
        }
        if !self.image_digest.is_empty() {
            uri.push('@');
            uri.push_str(&self.image_digest);
        }
        uri
    }
}

/// Parses one JSON object per container.
///
/// # Errors
///
/// Returns a serialization error if any entry is not a valid object; no
/// partial result is returned.
pub fn parse_attributes(raw: &[String]) -> Result<Vec<ContainerAttributes>> {
    raw.iter()
        .map(|attribute| {
            serde_json::from_str(attribute).map_err(|e| BootstrapperError::serialization(FLAG, e))
        })
        .collect()
}

/// Converts container attributes back into `--attribute-container=<json>`
/// arguments.
///
/// # Errors
///
/// Returns a serialization error if an entry cannot be encoded.
pub fn to_args(attributes: &[ContainerAttributes]) -> Result<Vec<String>> {
    attributes
        .iter()
        .map(|attribute| {
            serde_json::to_string(attribute)
                .map(|json| format!("--{FLAG}={json}"))
                .map_err(|e| BootstrapperError::serialization(FLAG, e))
        })
        .collect()
}
