//! Configuration for the terrain generator.
//!
//! Settings persist to disk as RON, are overridable from the command line
//! via clap, and are clamped into their valid ranges before use.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, ExportConfig, GenerationConfig, default_config_dir};
pub use error::ConfigError;
