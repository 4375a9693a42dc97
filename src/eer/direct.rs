//! Direct-index EER estimator.
//!
//! Used when both curves were measured at the same discrete operating points
//! (e.g. FPR and FNR derived from confusion counts): no interpolation, the
//! sampled point with the smallest gap wins.

use crate::domain::{EerEstimate, EerMethod, RatePolicy};
use crate::eer::{EerOptions, ensure_curves};
use crate::error::MetricsError;
use crate::math::{argmin_gap, has_crossing};

/// Estimate the EER over the sampled points.
///
/// Defaults to [`RatePolicy::Mean`]: the reported rate is the midpoint of the
/// two curves at the chosen point. `options.grid_points` is ignored.
pub fn estimate_direct(
    thresholds: &[f64],
    curve_a: &[f64],
    curve_b: &[f64],
    options: EerOptions,
) -> Result<EerEstimate, MetricsError> {
    ensure_curves(thresholds, curve_a, curve_b)?;

    let index = argmin_gap(curve_a, curve_b, options.tie_break)
        .ok_or_else(|| MetricsError::invalid("no operating points"))?;

    let rate_policy = options.rate_policy.unwrap_or(RatePolicy::Mean);
    let rate_a = curve_a[index];
    let rate_b = curve_b[index];

    Ok(EerEstimate {
        method: EerMethod::Direct,
        threshold: thresholds[index],
        rate: rate_policy.pick(rate_a, rate_b),
        rate_policy,
        index,
        rate_a,
        rate_b,
        crossing: has_crossing(curve_a, curve_b),
    })
}
