//! # linux-cru
//!
//! Computes a CVT modeline for a requested resolution and prints the Xorg
//! (or NVIDIA) configuration fragment that enables it. Nothing is applied
//! to the running system.
//!
//! ## Usage
//! ```bash
//! linux-cru 2560 1440 144 --display DP-0 --dialect nvidia
//! linux-cru 1920 1080 59.94 --blanking reduced --xrandr
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use linuxcru_cli::{execute, write_output, Args, Config};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Configuration decides the log level, so it is loaded first
    let (config, source) = Config::resolve(&args)?;

    linuxcru_common::init(&config.logging.level, config.log_format())?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting linux-cru");
    match &source {
        Some(path) => info!(config_path = %path.display(), "Configuration loaded"),
        None => info!("No config file found, using CLI arguments and defaults"),
    }

    let text = match execute(&args, &config) {
        Ok(text) => text,
        Err(e) => {
            error!(error = %e, "Failed to generate configuration");
            return Err(e);
        }
    };

    write_output(&text, args.output.as_deref())
}
