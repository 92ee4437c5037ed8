//! Section-keyed view of a process module config.

use std::collections::BTreeMap;
use std::fmt;

use bootstrapper_common::constants::READONLY_STORAGE_PATH;

/// Keys that point at writable locations and are dropped for read-only installs.
const REDUNDANT_ENTRIES: &[(&str, &[&str])] = &[("general", &["logDir", "dataStorageDir"])];

/// Prefix of keys whose values are paths relative to the agent directory.
const LIBRARY_PATH_PREFIX: &str = "libraryPath";

/// Section name to key to value, both levels sorted.
///
/// Rendering is deterministic: sections in order, keys in order, one blank
/// line after each section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap(BTreeMap<String, BTreeMap<String, String>>);

impl SectionMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `key` in `section`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.0.get(section)?.get(key).map(String::as_str)
    }

    /// Sets `key` in `section`, replacing any previous value.
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let _ = self
            .0
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Removes `key` from `section`, returning its value.
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        self.0.get_mut(section)?.remove(key)
    }

    /// Returns the number of properties across all sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no section holds a property.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over `(section, key, value)` in render order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.0.iter().flat_map(|(section, props)| {
            props
                .iter()
                .map(move |(key, value)| (section.as_str(), key.as_str(), value.as_str()))
        })
    }

    /// Overlays `overlay` onto this map: its values win, everything else is kept.
    pub fn merge(&mut self, overlay: &Self) {
        for (section, key, value) in overlay.iter() {
            self.insert(section, key, value);
        }
    }

    /// Adjusts the map for an agent mounted read-only at `install_path`.
    ///
    /// Drops `general.logDir` and `general.dataStorageDir`, anchors every
    /// `libraryPath*` value under `<install_path>/agent` with `../` removed,
    /// and sets `general.storage` to the writable storage location.
    #[must_use]
    pub fn setup_readonly(mut self, install_path: &str) -> Self {
        for (section, keys) in REDUNDANT_ENTRIES {
            for key in *keys {
                let _ = self.remove(section, key);
            }
        }

        for props in self.0.values_mut() {
            for (key, value) in props.iter_mut() {
                if key.starts_with(LIBRARY_PATH_PREFIX) {
                    *value = readonly_library_path(install_path, value);
                }
            }
        }

        let mut additional = Self::new();
        additional.insert("general", "storage", format!("\"{READONLY_STORAGE_PATH}\""));
        self.merge(&additional);
        self
    }
}

impl fmt::Display for SectionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (section, props) in &self.0 {
            writeln!(f, "[{section}]")?;
            for (key, value) in props {
                writeln!(f, "{key} {value}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<S, K, V> FromIterator<(S, K, V)> for SectionMap
where
    S: Into<String>,
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (section, key, value) in iter {
            map.insert(section, key, value);
        }
        map
    }
}

/// Rewrites a library path so that it points into the read-only install.
fn readonly_library_path(install_path: &str, value: &str) -> String {
    let sanitized = value.replace("../", "");
    match sanitized.strip_prefix('"') {
        Some(unquoted) => format!("\"{}", join_clean(&[install_path, "agent", unquoted])),
        None => join_clean(&[install_path, "agent", &sanitized]),
    }
}

/// Joins `/`-separated parts and normalises the result lexically.
///
/// Empty parts are skipped, and a leading `/` on a later part does not
/// reset the path.
fn join_clean(parts: &[&str]) -> String {
    let joined = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");
    clean(&joined)
}

fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    let _ = parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let body = parts.join("/");
    if rooted {
        format!("/{body}")
    } else if body.is_empty() {
        ".".to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_sorts_sections_and_keys() {
        let map: SectionMap = [
            ("general", "key", "value"),
            ("agentType", "java", "on"),
            ("general", "add", ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            map.to_string(),
            "[agentType]\njava on\n\n[general]\nadd \nkey value\n\n"
        );
    }

    #[test]
    fn merge_overrides_and_keeps() {
        let mut base: SectionMap = [("a", "keep", "1"), ("a", "change", "old")]
            .into_iter()
            .collect();
        let overlay: SectionMap = [("a", "change", "new"), ("b", "added", "x")]
            .into_iter()
            .collect();

        base.merge(&overlay);

        assert_eq!(base.get("a", "keep"), Some("1"));
        assert_eq!(base.get("a", "change"), Some("new"));
        assert_eq!(base.get("b", "added"), Some("x"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn setup_readonly_drops_writable_locations() {
        let map: SectionMap = [
            ("general", "logDir", "some-path"),
            ("general", "dataStorageDir", "some-path"),
            ("other", "logDir", "kept"),
        ]
        .into_iter()
        .collect();

        let map = map.setup_readonly("/opt/dynatrace/oneagent");

        assert_eq!(map.get("general", "logDir"), None);
        assert_eq!(map.get("general", "dataStorageDir"), None);
        assert_eq!(map.get("other", "logDir"), Some("kept"));
        assert_eq!(
            map.get("general", "storage"),
            Some("\"/var/lib/dynatrace/oneagent\"")
        );
    }

    #[test]
    fn setup_readonly_overrides_existing_storage() {
        let map: SectionMap = [("general", "storage", "/somewhere/else")]
            .into_iter()
            .collect();
        let map = map.setup_readonly("/install");
        assert_eq!(
            map.get("general", "storage"),
            Some("\"/var/lib/dynatrace/oneagent\"")
        );
    }

    #[test]
    fn setup_readonly_rewrites_library_paths() {
        let map: SectionMap = [
            ("java", "libraryPath", "\"../../lib64/liboneagentjava.so\""),
            ("php", "libraryPath64", "../lib64/liboneagentphp.so"),
            ("php", "libraryPathMusl", "/lib64/musl.so"),
            ("test", "keyWithPath", "\"../../relative/path\""),
        ]
        .into_iter()
        .collect();

        let map = map.setup_readonly("/absolute/path");

        assert_eq!(
            map.get("java", "libraryPath"),
            Some("\"/absolute/path/agent/lib64/liboneagentjava.so\"")
        );
        assert_eq!(
            map.get("php", "libraryPath64"),
            Some("/absolute/path/agent/lib64/liboneagentphp.so")
        );
        assert_eq!(
            map.get("php", "libraryPathMusl"),
            Some("/absolute/path/agent/lib64/musl.so")
        );
        assert_eq!(map.get("test", "keyWithPath"), Some("\"../../relative/path\""));
    }

    #[test]
    fn clean_matches_lexical_rules() {
        assert_eq!(clean("/a/./b//c/"), "/a/b/c");
        assert_eq!(clean("/a/b/../c"), "/a/c");
        assert_eq!(clean("/.."), "/");
        assert_eq!(clean("a/../.."), "..");
        assert_eq!(clean(""), ".");
        assert_eq!(join_clean(&["rel/install", "agent", "lib"]), "rel/install/agent/lib");
    }
}
