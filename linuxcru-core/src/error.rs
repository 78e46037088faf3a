//! Error types for timing calculation and configuration rendering.

use thiserror::Error;

/// Errors returned by the timing calculator.
///
/// Every variant describes an input the calculator cannot turn into a valid
/// modeline, with enough detail for a front end to re-prompt the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingError {
    /// Refresh rate is below 0.01 Hz or above the supported ceiling.
    #[error(
        "Refresh rate {millihertz} mHz is out of range \
         (must be in [{min_millihertz}, {max_millihertz}] mHz)"
    )]
    RefreshOutOfRange {
        millihertz: u32,
        min_millihertz: u32,
        max_millihertz: u32,
    },

    /// Refresh rate is so low that the rounded pixel clock is zero.
    #[error(
        "Refresh rate {millihertz} mHz is too low for {width}x{height}: \
         pixel clock rounds to zero"
    )]
    PixelClockUnderflow { width: u32, height: u32, millihertz: u32 },

    /// Refresh rate text could not be parsed.
    #[error("Invalid refresh rate: {0}")]
    InvalidRefreshRate(String),

    /// A dimension is below the minimum (or rounds down to zero).
    #[error("Resolution {width}x{height} is too small (each dimension must be at least {min})")]
    ResolutionTooSmall { width: u32, height: u32, min: u32 },

    /// A dimension exceeds what the calculator accepts.
    #[error("Resolution {width}x{height} is too large (each dimension must be at most {max})")]
    ResolutionTooLarge { width: u32, height: u32, max: u32 },

    /// The requested blanking mode is not implemented.
    #[error("Unsupported blanking mode: {0}")]
    UnsupportedBlankingMode(String),

    /// Blanking intervals collapsed so that sync pulses no longer fit.
    #[error(
        "Degenerate {axis} timing: active {active}, \
         sync {sync_start}-{sync_end}, total {total}"
    )]
    DegenerateTiming {
        axis: &'static str,
        active: u32,
        sync_start: u32,
        sync_end: u32,
        total: u32,
    },
}

/// Errors returned by the configuration emitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The emitter has no renderer for the requested dialect.
    #[error("Unknown configuration dialect: {0}")]
    UnknownDialect(String),
}

/// Result type alias for timing operations.
pub type Result<T> = std::result::Result<T, TimingError>;
