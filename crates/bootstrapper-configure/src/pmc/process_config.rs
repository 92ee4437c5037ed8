//! Wire representation of a process module config.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::section_map::SectionMap;

/// Characters trimmed from section names, keys and values.
const WHITESPACE: &[char] = &['\t', '\n', '\u{0B}', '\u{0C}', '\r', ' '];

/// A process module config: a flat list of properties plus deployment data.
///
/// Property order carries no meaning; every view that matters goes through
/// [`SectionMap`], where `(section, key)` is unique and the last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// All properties, possibly with duplicates.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Vec<Property>,
    /// Opaque version counter of the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    /// Where the agent is mounted read-only. Rendering adjusts paths when set.
    #[serde(skip)]
    pub install_path: Option<String>,
}

/// A single `key value` entry of a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Section name, `""` for entries before the first header.
    #[serde(default)]
    pub section: String,
    /// Property key.
    #[serde(default)]
    pub key: String,
    /// Property value, possibly empty.
    #[serde(default)]
    pub value: String,
}

impl Property {
    /// Creates a property.
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

impl ProcessConfig {
    /// Parses the line-oriented `ruxitagentproc.conf` format.
    ///
    /// A line like `[name]` opens a section. Every other line that is not
    /// empty and does not start with `#` becomes a property: the text is
    /// split on spaces, the first part is the key, and the second part is
    /// the value only if there are exactly two parts. Nothing in a line is
    /// ever rejected.
    #[must_use]
    pub fn from_conf(content: &str) -> Self {
        let mut properties = Vec::new();
        let mut section = String::new();

        for line in content.lines() {
            if let Some(header) = section_header(line) {
                section = header.to_string();
                continue;
            }
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split(' ').collect();
            let (key, value) = match parts.as_slice() {
                [key, value] => (*key, *value),
                [key, ..] => (*key, ""),
                [] => continue,
            };
            properties.push(Property::new(
                section.clone(),
                key.trim_matches(WHITESPACE),
                value.trim_matches(WHITESPACE),
            ));
        }

        Self {
            properties,
            revision: None,
            install_path: None,
        }
    }

    /// Decodes the JSON payload served for the process module config.
    ///
    /// # Errors
    ///
    /// Returns the decode error if `raw` is not a valid payload.
    pub fn from_json(raw: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(raw)
    }

    /// Returns the section view of the properties.
    #[must_use]
    pub fn to_section_map(&self) -> SectionMap {
        self.properties
            .iter()
            .map(|p| (p.section.as_str(), p.key.as_str(), p.value.as_str()))
            .collect()
    }

    /// Overlays `overlay` onto `self` and returns the result.
    ///
    /// Neither input is modified. Every `(section, key)` of the overlay wins;
    /// everything else in `self` is kept. The revision and install path are
    /// taken from the overlay as they are.
    #[must_use]
    pub fn merge(&self, overlay: &Self) -> Self {
        let mut merged = self.to_section_map();
        merged.merge(&overlay.to_section_map());

        Self {
            revision: overlay.revision,
            install_path: overlay.install_path.clone(),
            ..Self::from(merged)
        }
    }
}

impl From<SectionMap> for ProcessConfig {
    fn from(map: SectionMap) -> Self {
        Self {
            properties: map
                .iter()
                .map(|(section, key, value)| Property::new(section, key, value))
                .collect(),
            revision: None,
            install_path: None,
        }
    }
}

impl fmt::Display for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.to_section_map();
        match &self.install_path {
            Some(install_path) => map.setup_readonly(install_path).fmt(f),
            None => map.fmt(f),
        }
    }
}

fn section_header(line: &str) -> Option<&str> {
    line.trim_matches(WHITESPACE)
        .strip_prefix('[')?
        .strip_suffix(']')
        .map(|name| name.trim_matches(WHITESPACE))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Property>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Property>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
