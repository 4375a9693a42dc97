//! Interpolated EER estimator.
//!
//! Both curves are linearly interpolated over `[min(thresholds), max(thresholds)]`,
//! evaluated on a uniform grid of `grid_points` points, and the grid point with
//! the smallest absolute gap is reported. Precision is bounded by the grid step
//! `(max - min) / (grid_points - 1)`.

use crate::domain::{EerEstimate, EerMethod, RatePolicy};
use crate::eer::{EerOptions, ensure_curves};
use crate::error::MetricsError;
use crate::math::{LinearInterpolant, argmin_gap, has_crossing, lin_space};

/// Both curves evaluated on the dense grid.
#[derive(Debug, Clone)]
pub struct DenseCurves {
    pub grid: Vec<f64>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

/// Interpolate both curves onto a uniform grid spanning the thresholds.
pub fn densify(
    thresholds: &[f64],
    curve_a: &[f64],
    curve_b: &[f64],
    grid_points: usize,
) -> Result<DenseCurves, MetricsError> {
    ensure_curves(thresholds, curve_a, curve_b)?;

    let fa = LinearInterpolant::new(thresholds, curve_a)?;
    let fb = LinearInterpolant::new(thresholds, curve_b)?;
    let (lo, hi) = fa.domain();
    let grid = lin_space(lo, hi, grid_points)?;

    let a = fa.eval_many(&grid)?;
    let b = fb.eval_many(&grid)?;
    Ok(DenseCurves { grid, a, b })
}

/// Estimate the EER threshold and rate by dense interpolation.
///
/// Defaults to [`RatePolicy::CurveA`]: the reported rate is the first curve's
/// interpolated value at the chosen grid point.
pub fn estimate_interpolated(
    thresholds: &[f64],
    curve_a: &[f64],
    curve_b: &[f64],
    options: EerOptions,
) -> Result<EerEstimate, MetricsError> {
    let dense = densify(thresholds, curve_a, curve_b, options.grid_points)?;
    estimate_on_grid(&dense, options)
}

/// Pick the closest approach on an already densified pair of curves.
pub fn estimate_on_grid(dense: &DenseCurves, options: EerOptions) -> Result<EerEstimate, MetricsError> {
    let index = argmin_gap(&dense.a, &dense.b, options.tie_break)
        .ok_or_else(|| MetricsError::invalid("empty interpolation grid"))?;

    let rate_policy = options.rate_policy.unwrap_or(RatePolicy::CurveA);
    let rate_a = dense.a[index];
    let rate_b = dense.b[index];

    Ok(EerEstimate {
        method: EerMethod::Interpolated {
            grid_points: dense.grid.len(),
        },
        threshold: dense.grid[index],
        rate: rate_policy.pick(rate_a, rate_b),
        rate_policy,
        index,
        rate_a,
        rate_b,
        crossing: has_crossing(&dense.a, &dense.b),
    })
}
