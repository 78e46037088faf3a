//! Timing calculator.
//!
//! Derives a complete [`Modeline`](crate::types::Modeline) from a requested
//! resolution using the CVT algorithm family. Each
//! [`BlankingMode`](crate::types::BlankingMode) selects one static
//! [`BlankingProfile`] table.

mod cvt;
pub mod tables;

pub use cvt::{compute_modeline, MAX_DIMENSION, MIN_DIMENSION};
pub use tables::BlankingProfile;
