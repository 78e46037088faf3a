//! Capability constraints and modeline validation.
//!
//! A [`CapabilityConstraint`] describes what a display (from its EDID) or a
//! driver declares it can accept. The core never reads EDID itself; the
//! caller supplies the constraint, typically deserialized from YAML or JSON:
//!
//! ```yaml
//! display: DP-2
//! max_pixel_clock_khz: 650000
//! refresh_tolerance: 0.5
//! modes:
//!   - { width: 2560, height: 1440, refresh: 144 }
//!   - { width: 2560, height: 1440, refresh: 59.95 }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{Modeline, PixelClock, RefreshRate, Resolution};

/// Default refresh tolerance when matching declared modes (0.5 Hz).
pub const DEFAULT_REFRESH_TOLERANCE: RefreshRate = RefreshRate::from_millihertz(500);

/// Display- or driver-declared limits used to validate a modeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConstraint {
    /// Display the constraint applies to (informational)
    pub display: String,
    /// Declared modes; empty means no mode list was declared
    pub modes: Vec<Resolution>,
    /// Maximum pixel clock the display or driver accepts
    pub max_pixel_clock_khz: Option<PixelClock>,
    /// How far a requested refresh may be from a declared one and still match
    pub refresh_tolerance: RefreshRate,
}

impl Default for CapabilityConstraint {
    fn default() -> Self {
        Self {
            display: String::new(),
            modes: Vec::new(),
            max_pixel_clock_khz: None,
            refresh_tolerance: DEFAULT_REFRESH_TOLERANCE,
        }
    }
}

impl CapabilityConstraint {
    /// Create an empty constraint for a display.
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            ..Default::default()
        }
    }

    /// Set the pixel clock ceiling.
    pub fn with_max_pixel_clock(mut self, max: PixelClock) -> Self {
        self.max_pixel_clock_khz = Some(max);
        self
    }

    /// Add a declared mode.
    pub fn with_mode(mut self, mode: Resolution) -> Self {
        self.modes.push(mode);
        self
    }

    /// Set the refresh matching tolerance.
    pub fn with_refresh_tolerance(mut self, tolerance: RefreshRate) -> Self {
        self.refresh_tolerance = tolerance;
        self
    }

    /// Whether any declared mode matches the modeline's resolution and
    /// requested refresh.
    ///
    /// A declared width also matches when it rounds down to the modeline's
    /// active width on an 8-pixel cell (1366 declared, 1360 computed).
    pub fn declares(&self, modeline: &Modeline) -> bool {
        let width = modeline.horizontal().active;
        let height = modeline.vertical().active;
        let refresh = modeline.requested_refresh().millihertz();
        let tolerance = self.refresh_tolerance.millihertz();

        self.modes.iter().any(|mode| {
            let width_matches = mode.width == width || mode.width - mode.width % 8 == width;
            width_matches
                && mode.height == height
                && mode.refresh.millihertz().abs_diff(refresh) <= tolerance
        })
    }
}

/// Why a modeline does not fit a capability constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Pixel clock is above the declared ceiling.
    #[error("Pixel clock {required} MHz exceeds the {max} MHz limit")]
    PixelClockExceeded { required: PixelClock, max: PixelClock },

    /// No declared mode matches the resolution and refresh.
    #[error("Mode {width}x{height} @ {refresh} Hz is not declared by {display}")]
    ModeNotDeclared {
        width: u32,
        height: u32,
        refresh: RefreshRate,
        display: String,
    },
}

/// Result of validating a modeline against an optional constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "issue", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// The modeline fits the constraint (or no constraint was given).
    Accepted,
    /// The modeline does not fit, but force-enable was requested.
    AcceptedWithWarning(ValidationIssue),
    /// The modeline is known to be unsafe for the declared display.
    Rejected(ValidationIssue),
}

impl ValidationOutcome {
    /// Whether the caller may proceed with this modeline.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, ValidationOutcome::Rejected(_))
    }

    /// The issue found, if any.
    pub fn issue(&self) -> Option<&ValidationIssue> {
        match self {
            ValidationOutcome::Accepted => None,
            ValidationOutcome::AcceptedWithWarning(issue) | ValidationOutcome::Rejected(issue) => {
                Some(issue)
            }
        }
    }
}

/// Validate a modeline against an optional capability constraint.
///
/// The pixel clock ceiling is checked before the declared mode list. With
/// `force_enable` any issue is downgraded to
/// [`ValidationOutcome::AcceptedWithWarning`]. The modeline is never
/// modified.
pub fn validate(
    modeline: &Modeline,
    constraint: Option<&CapabilityConstraint>,
    force_enable: bool,
) -> ValidationOutcome {
    let Some(constraint) = constraint else {
        return ValidationOutcome::Accepted;
    };

    let issue = match check(modeline, Some(constraint)) {
        Some(issue) => issue,
        None => {
            debug!(mode = %modeline.name(), display = %constraint.display, "Modeline accepted");
            return ValidationOutcome::Accepted;
        }
    };

    if force_enable {
        warn!(
            mode = %modeline.name(),
            display = %constraint.display,
            issue = %issue,
            "Constraint violated, force-enable requested"
        );
        ValidationOutcome::AcceptedWithWarning(issue)
    } else {
        warn!(
            mode = %modeline.name(),
            display = %constraint.display,
            issue = %issue,
            "Modeline rejected"
        );
        ValidationOutcome::Rejected(issue)
    }
}

/// Find the first issue without logging or applying force-enable.
///
/// Used by callers that try several candidates and only report the one they
/// keep.
pub fn check(
    modeline: &Modeline,
    constraint: Option<&CapabilityConstraint>,
) -> Option<ValidationIssue> {
    let constraint = constraint?;

    if let Some(max) = constraint.max_pixel_clock_khz {
        if modeline.pixel_clock() > max {
            return Some(ValidationIssue::PixelClockExceeded {
                required: modeline.pixel_clock(),
                max,
            });
        }
    }

    if !constraint.modes.is_empty() && !constraint.declares(modeline) {
        return Some(ValidationIssue::ModeNotDeclared {
            width: modeline.horizontal().active,
            height: modeline.vertical().active,
            refresh: modeline.requested_refresh(),
            display: constraint.display.clone(),
        });
    }

    None
}
