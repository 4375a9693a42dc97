//! Piecewise-linear interpolation over a sampled curve.
//!
//! Evaluation outside `[x_min, x_max]` is refused rather than extrapolated.

use crate::error::MetricsError;
use crate::math::grid::ensure_thresholds;

/// Linear interpolant through `(xs[i], ys[i])`.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolant<'a> {
    xs: &'a [f64],
    ys: &'a [f64],
}

impl<'a> LinearInterpolant<'a> {
    pub fn new(xs: &'a [f64], ys: &'a [f64]) -> Result<Self, MetricsError> {
        ensure_thresholds(xs, 2)?;
        if xs.len() != ys.len() {
            return Err(MetricsError::invalid(format!(
                "curve has {} values for {} thresholds",
                ys.len(),
                xs.len()
            )));
        }
        if let Some(pos) = ys.iter().position(|y| !y.is_finite()) {
            return Err(MetricsError::invalid(format!(
                "curve value #{pos} is not finite ({})",
                ys[pos]
            )));
        }
        Ok(Self { xs, ys })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate at `x`.
    pub fn eval(&self, x: f64) -> Result<f64, MetricsError> {
        let (lo, hi) = self.domain();
        if !(x >= lo && x <= hi) {
            return Err(MetricsError::invalid(format!(
                "x={x} is outside the interpolation range [{lo}, {hi}]"
            )));
        }

        // Segment whose right end is the first sample >= x; the first segment
        // also covers x == lo.
        let hi_idx = self.xs.partition_point(|&v| v < x).clamp(1, self.xs.len() - 1);
        let lo_idx = hi_idx - 1;

        let (x0, x1) = (self.xs[lo_idx], self.xs[hi_idx]);
        let (y0, y1) = (self.ys[lo_idx], self.ys[hi_idx]);
        let slope = (y1 - y0) / (x1 - x0);
        Ok(slope * (x - x0) + y0)
    }

    /// Evaluate at every point of `grid`.
    pub fn eval_many(&self, grid: &[f64]) -> Result<Vec<f64>, MetricsError> {
        grid.iter().map(|&x| self.eval(x)).collect()
    }
}
