//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use linuxcru_core::RefreshRate;

use crate::policy::BlankingChoice;

/// linux-cru - Custom resolution modeline generator for X11
#[derive(Parser, Debug, Clone)]
#[command(name = "linux-cru")]
#[command(about = "Compute CVT modelines and render Xorg/NVIDIA configuration")]
#[command(version)]
pub struct Args {
    /// Active horizontal pixels
    pub width: u32,

    /// Active vertical lines
    pub height: u32,

    /// Refresh rate in Hz (e.g. 60, 59.94, 143.856)
    pub refresh: RefreshRate,

    /// Blanking mode (auto tries standard, reduced, reduced-v2)
    #[arg(short, long, value_enum)]
    pub blanking: Option<BlankingChoice>,

    /// Apply the mode even if the display constraints reject it
    #[arg(short, long)]
    pub force: bool,

    /// Display (xrandr output) name, e.g. DP-0 or HDMI-1
    #[arg(short, long)]
    pub display: Option<String>,

    /// Configuration dialect (generic, xorg, nvidia, vendor, nvidia-modprobe)
    #[arg(long)]
    pub dialect: Option<String>,

    /// Capability constraint file (YAML or JSON)
    #[arg(long)]
    pub constraints: Option<PathBuf>,

    /// Use hand-tuned modelines for known panels when available
    #[arg(long)]
    pub quirks: bool,

    /// Print xrandr registration commands instead of a config fragment
    #[arg(long)]
    pub xrandr: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration file (defaults used if not found)
    #[arg(short, long, env = "LINUX_CRU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    pub log_format: Option<String>,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Configuration text
    #[default]
    Text,
    /// JSON report with the modeline, validation outcome and fragment
    Json,
}
