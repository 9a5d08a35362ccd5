//! Core shared library for the rulegen workspace.
//!
//! This crate exposes the primitives the rule crates and the CLI depend on:
//! common errors, configuration loading, logging setup and serde helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::RulegenConfig;
pub use errors::{ConfigError, Result as CoreResult, RulegenError};
