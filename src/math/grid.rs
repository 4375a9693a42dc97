//! Threshold validation and uniform grid generation.
//!
//! The interpolated EER estimator scans a dense uniform grid. The grid layout is
//! part of the result contract: argmin ties are resolved by grid position, so
//! two implementations only agree bit-for-bit if they build the same grid.

use crate::domain::MAX_GRID_POINTS;
use crate::error::MetricsError;

/// Check that `thresholds` is finite, strictly increasing, and has at least
/// `min_len` points.
pub fn ensure_thresholds(thresholds: &[f64], min_len: usize) -> Result<(), MetricsError> {
    if thresholds.len() < min_len {
        return Err(MetricsError::invalid(format!(
            "need at least {min_len} thresholds, got {}",
            thresholds.len()
        )));
    }
    if let Some(pos) = thresholds.iter().position(|t| !t.is_finite()) {
        return Err(MetricsError::invalid(format!(
            "threshold #{pos} is not finite ({})",
            thresholds[pos]
        )));
    }
    for (i, pair) in thresholds.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(MetricsError::invalid(format!(
                "thresholds must be strictly increasing: #{} ({}) >= #{} ({})",
                i,
                pair[0],
                i + 1,
                pair[1]
            )));
        }
    }
    Ok(())
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// Point `i` is `min + i * step` with `step = (max - min) / (steps - 1)`; the
/// last point is pinned to `max` exactly so rounding never pushes it outside
/// an interpolation domain.
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, MetricsError> {
    if !(min.is_finite() && max.is_finite() && max > min) {
        return Err(MetricsError::invalid(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>min)."
        )));
    }
    if steps < 2 {
        return Err(MetricsError::invalid("Grid points must be >= 2."));
    }
    if steps > MAX_GRID_POINTS {
        return Err(MetricsError::invalid(format!(
            "Grid points must be <= {MAX_GRID_POINTS}, got {steps}."
        )));
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + i as f64 * step).collect();
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lin_space_includes_endpoints() {
        let v = lin_space(0.2, 0.5, 500).unwrap();
        assert_eq!(v.len(), 500);
        assert_eq!(v[0], 0.2);
        assert_eq!(v[499], 0.5);
        assert!(v.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn lin_space_rejects_degenerate_inputs() {
        assert!(lin_space(1.0, 1.0, 10).is_err());
        assert!(lin_space(0.0, 1.0, 1).is_err());
        assert!(lin_space(f64::NAN, 1.0, 10).is_err());
    }

    #[test]
    fn lin_space_caps_grid_size() {
        assert_eq!(lin_space(0.0, 1.0, MAX_GRID_POINTS).unwrap().len(), MAX_GRID_POINTS);
        let err = lin_space(0.0, 1.0, usize::MAX).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidInput(_)));
        assert!(err.message().contains("<= 1000000"));
    }

    #[test]
    fn thresholds_must_increase() {
        assert!(ensure_thresholds(&[0.1, 0.2, 0.3], 2).is_ok());
        assert!(ensure_thresholds(&[0.1], 2).is_err());
        assert!(ensure_thresholds(&[0.1, 0.1], 2).is_err());
        assert!(ensure_thresholds(&[0.3, 0.2], 2).is_err());
        assert!(ensure_thresholds(&[0.1, f64::INFINITY], 2).is_err());
    }
}
