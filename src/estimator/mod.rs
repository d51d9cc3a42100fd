//! Yield estimation.
//!
//! The estimate is a fixed base plus a short list of additive adjustments, each
//! keyed on an exact value of one profile field. Everything here is pure:
//! the same profile and settings always give the same numbers.
//!
//! - `adjust`: the adjustment table, `estimate` and `breakdown`
//! - `series`: the year-by-year trend used by the yield chart
//! - `curve`: the sensitivity curve used by the second chart

use serde::{Deserialize, Serialize};

use crate::domain::Variant;

pub mod adjust;
pub mod curve;
pub mod series;

pub use adjust::*;
pub use curve::*;
pub use series::*;

/// Knobs that change how a profile is scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    pub variant: Variant,
    /// Clamp the final estimate at zero. Off by default: extreme inputs can
    /// legitimately produce a negative raw total.
    pub clamp_at_zero: bool,
}

impl EstimatorSettings {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            clamp_at_zero: false,
        }
    }
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self::new(Variant::Lifecycle)
    }
}
