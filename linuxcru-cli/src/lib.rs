//! # linux-cru CLI
//!
//! Front end for `linuxcru-core`: argument parsing, YAML configuration, the
//! blanking fallback policy and output handling.

pub mod app;
pub mod cli;
pub mod config;
pub mod policy;

pub use app::{execute, write_output, Report};
pub use cli::{Args, OutputFormat};
pub use config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
pub use policy::{select_modeline, BlankingChoice, Selection, SelectionError, SelectionRequest};
