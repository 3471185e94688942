//! Parsing and validation of `zsv.toml` generator configuration files.
//!
//! Every table is optional: an empty file (or no file at all) yields the
//! defaults of [`ProjectConfig`]. Command-line flags are layered on top of
//! the loaded values by the CLI.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
