//! Parsing and validation of `autodep.toml` project configuration files.
//!
//! This crate reads the project configuration and produces a strongly-typed
//! [`ProjectConfig`], then flattens global flags, per-library flag sets and
//! target settings into a [`ResolvedTarget`] the build model consumes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::{resolve_all, resolve_target, ResolvedTarget};
pub use types::*;
