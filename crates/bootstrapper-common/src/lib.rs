//! # bootstrapper-common
//!
//! Shared error definitions, well-known paths, and the run configuration
//! used across the bootstrapper workspace.
//!
//! This crate is the leaf of the dependency graph and depends on no other
//! internal crate.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod constants;
pub mod error;
