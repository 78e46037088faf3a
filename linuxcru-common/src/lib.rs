//! # linux-cru Common
//!
//! Shared utilities for the linux-cru components.
//!
//! ## Logging
//!
//! ```rust
//! use linuxcru_common::{init, LogFormat};
//!
//! init("info", LogFormat::Pretty).unwrap();
//! tracing::info!(display = "DP-1", "Ready");
//! ```

pub mod logging;

pub use logging::{init, init_logging, init_logging_json, LogFormat};
