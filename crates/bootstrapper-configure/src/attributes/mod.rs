//! Pod and container attributes passed on the command line.
//!
//! Both records flatten to a single-level map of dotted keys, which is the
//! shape the renderers consume.

pub mod container;
pub mod pod;

use std::collections::BTreeMap;

use serde::Serialize;

use bootstrapper_common::error::{BootstrapperError, Result};

/// Serializes a flat record into a sorted string map.
///
/// `origin` names the flag the record came from, for error messages.
pub(crate) fn to_string_map<T: Serialize>(
    value: &T,
    origin: &str,
) -> Result<BTreeMap<String, String>> {
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| BootstrapperError::serialization(origin, e))
}
