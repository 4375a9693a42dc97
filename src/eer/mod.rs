//! Equal Error Rate estimation.
//!
//! Two estimators share one contract: given two rate curves over the same
//! strictly increasing thresholds, find where they are closest and report that
//! threshold and rate.
//!
//! - `interpolated`: linear interpolation onto a dense uniform grid, then argmin
//! - `direct`: argmin over the sampled operating points themselves

pub mod direct;
pub mod interpolated;

pub use direct::*;
pub use interpolated::*;

use crate::domain::{DEFAULT_GRID_POINTS, MetricsConfig, RatePolicy, TieBreak};
use crate::error::MetricsError;

/// Knobs shared by both estimators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EerOptions {
    /// Dense grid size (interpolated estimator only).
    pub grid_points: usize,
    pub tie_break: TieBreak,
    /// `None` selects the estimator's own default.
    pub rate_policy: Option<RatePolicy>,
}

impl Default for EerOptions {
    fn default() -> Self {
        Self {
            grid_points: DEFAULT_GRID_POINTS,
            tie_break: TieBreak::First,
            rate_policy: None,
        }
    }
}

impl EerOptions {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            grid_points: config.grid_points,
            tie_break: config.tie_break,
            rate_policy: config.rate_policy,
        }
    }
}

/// Shared shape checks: at least two increasing thresholds and one finite value
/// per threshold on each curve.
fn ensure_curves(thresholds: &[f64], a: &[f64], b: &[f64]) -> Result<(), MetricsError> {
    crate::math::ensure_thresholds(thresholds, 2)?;
    for (name, curve) in [("first", a), ("second", b)] {
        if curve.len() != thresholds.len() {
            return Err(MetricsError::invalid(format!(
                "{name} curve has {} values for {} thresholds",
                curve.len(),
                thresholds.len()
            )));
        }
        if let Some(pos) = curve.iter().position(|v| !v.is_finite()) {
            return Err(MetricsError::invalid(format!(
                "{name} curve value #{pos} is not finite ({})",
                curve[pos]
            )));
        }
    }
    Ok(())
}
