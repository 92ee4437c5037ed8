//! Enrichment files under `<config>/<container>/enrichment`.

pub mod endpoint;
pub mod metadata;
