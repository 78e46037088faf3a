//! # linux-cru Core
//!
//! Display timing computation and configuration emission.
//!
//! Given a resolution, a refresh rate and a blanking mode, this crate
//! computes a CVT modeline, checks it against what a display declares it
//! can accept, and renders it into Xorg configuration text. Everything here
//! is pure: no files, no processes, no global state.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Resolution request  │
//! │ (w, h, refresh, mode)│
//! └──────────┬───────────┘
//!            ▼
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │  timing::compute_    │      │   quirks::lookup     │
//! │      modeline        │      │  (opt-in overrides)  │
//! └──────────┬───────────┘      └──────────┬───────────┘
//!            └──────────────┬──────────────┘
//!                           ▼
//!              ┌──────────────────────────┐
//!              │  constraint::validate    │
//!              │ (EDID / driver limits)   │
//!              └────────────┬─────────────┘
//!                           ▼
//!              ┌──────────────────────────┐
//!              │  emit::render            │
//!              │ (generic / nvidia text)  │
//!              └──────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use linuxcru_core::{compute_modeline, render, validate, BlankingMode, Resolution};
//!
//! let modeline = compute_modeline(&Resolution::at_hz(1920, 1080, 60), BlankingMode::Standard)?;
//! assert!(validate(&modeline, None, false).is_accepted());
//!
//! let fragment = render(&modeline, "generic", "HDMI-0")?;
//! println!("{}", fragment);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod constraint;
pub mod emit;
pub mod error;
pub mod quirks;
pub mod timing;
pub mod types;

pub use constraint::{check, validate, CapabilityConstraint, ValidationIssue, ValidationOutcome};
pub use emit::{
    render, render_dialect, ConfigurationFragment, Directive, ModeRegistration, RenderOptions,
    TargetDialect,
};
pub use error::{RenderError, Result, TimingError};
pub use timing::compute_modeline;
pub use types::*;
