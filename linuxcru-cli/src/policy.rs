//! Blanking fallback policy.
//!
//! The core computes one modeline per call. Picking a blanking mode when the
//! user asked for `auto`, and deciding what to do with a rejected mode, is a
//! front-end decision made here.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use linuxcru_core::{
    check, compute_modeline, quirks, validate, BlankingMode, CapabilityConstraint, Modeline,
    Resolution, TimingError, ValidationIssue, ValidationOutcome,
};

/// Blanking mode requested on the command line or in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankingChoice {
    /// Try standard, then reduced, then reduced-v2
    #[default]
    Auto,
    Standard,
    Reduced,
    ReducedV2,
}

impl BlankingChoice {
    /// Blanking modes to try, in order.
    pub fn candidates(&self) -> &'static [BlankingMode] {
        match self {
            BlankingChoice::Auto => &BlankingMode::ALL,
            BlankingChoice::Standard => &[BlankingMode::Standard],
            BlankingChoice::Reduced => &[BlankingMode::Reduced],
            BlankingChoice::ReducedV2 => &[BlankingMode::ReducedV2],
        }
    }
}

/// Why no modeline could be selected.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Timing calculation failed: {0}")]
    Timing(#[from] TimingError),

    #[error("Mode {mode} rejected: {issue} (use --force to apply anyway)")]
    Rejected { mode: String, issue: ValidationIssue },
}

/// The modeline picked for a request and how it validated.
#[derive(Debug, Clone)]
pub struct Selection {
    pub modeline: Modeline,
    pub outcome: ValidationOutcome,
    /// Whether the modeline came from the quirk table
    pub from_quirk: bool,
}

/// Inputs to [`select_modeline`].
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub resolution: Resolution,
    pub blanking: BlankingChoice,
    pub constraint: Option<&'a CapabilityConstraint>,
    pub force_enable: bool,
    pub use_quirks: bool,
}

/// Compute candidates and pick the first one the constraint accepts.
///
/// With no accepted candidate, force-enable takes the first computed one
/// with its warning; otherwise the first rejection is returned.
pub fn select_modeline(request: &SelectionRequest<'_>) -> Result<Selection, SelectionError> {
    let (candidates, from_quirk) = match quirk_candidate(request) {
        Some(modeline) => (vec![modeline], true),
        None => (compute_candidates(request)?, false),
    };

    for modeline in &candidates {
        match check(modeline, request.constraint) {
            None => {
                info!(
                    mode = %modeline.name(),
                    blanking = %modeline.blanking(),
                    "Selected modeline"
                );
                return Ok(Selection {
                    modeline: *modeline,
                    outcome: ValidationOutcome::Accepted,
                    from_quirk,
                });
            }
            Some(issue) => {
                debug!(mode = %modeline.name(), issue = %issue, "Candidate not accepted");
            }
        }
    }

    // Every candidate failed validation; candidates is never empty here.
    let first = candidates[0];
    match validate(&first, request.constraint, request.force_enable) {
        ValidationOutcome::Rejected(issue) => Err(SelectionError::Rejected {
            mode: first.name(),
            issue,
        }),
        outcome => {
            warn!(mode = %first.name(), "Applying modeline despite constraint violation");
            Ok(Selection {
                modeline: first,
                outcome,
                from_quirk,
            })
        }
    }
}

/// Quirks only replace the automatic choice; an explicit blanking mode
/// always gets its CVT calculation.
fn quirk_candidate(request: &SelectionRequest<'_>) -> Option<Modeline> {
    if !request.use_quirks || request.blanking != BlankingChoice::Auto {
        return None;
    }
    quirks::lookup(&request.resolution)
}

/// Compute every candidate blanking mode, skipping modes that fail.
///
/// Fails with the first timing error when no mode can be computed.
fn compute_candidates(request: &SelectionRequest<'_>) -> Result<Vec<Modeline>, TimingError> {
    let mut candidates = Vec::new();
    let mut first_error = None;

    for &mode in request.blanking.candidates() {
        match compute_modeline(&request.resolution, mode) {
            Ok(modeline) => candidates.push(modeline),
            Err(e) => {
                debug!(blanking = %mode, error = %e, "Blanking mode not usable");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if candidates.is_empty() => Err(e),
        _ => Ok(candidates),
    }
}
