//! Orientation (quaternion) utilities for comparing two device streams.
//!
//! Samples are `(w, x, y, z)` records in index order; streams are paired by
//! index, not resampled to a common clock.
//!
//! - `normalize_*`: scale every record to unit norm (zero norm is refused)
//! - `align_hemisphere`: remove `q`/`-q` sign flips between consecutive samples
//! - `compare_streams`: compare sample-to-sample rotations of two streams
//!   (normalized and hemisphere-aligned first)

use nalgebra::Quaternion;

use crate::domain::{OrientationSample, OrientationStream, StreamComparison};
use crate::error::MetricsError;

fn to_quaternion(s: &OrientationSample) -> Quaternion<f64> {
    Quaternion::new(s.w, s.x, s.y, s.z)
}

fn from_quaternion(q: &Quaternion<f64>) -> OrientationSample {
    OrientationSample::new(q.w, q.i, q.j, q.k)
}

/// Euclidean norm of the four components.
pub fn norm(sample: &OrientationSample) -> f64 {
    to_quaternion(sample).norm()
}

/// Divide a record by its norm.
pub fn normalize_sample(sample: &OrientationSample) -> Result<OrientationSample, MetricsError> {
    if sample.components().iter().any(|c| !c.is_finite()) {
        return Err(MetricsError::invalid(format!(
            "quaternion has non-finite components: {sample:?}"
        )));
    }
    let q = to_quaternion(sample);
    let n = q.norm();
    if n == 0.0 || !n.is_finite() {
        return Err(MetricsError::degenerate(format!(
            "quaternion {sample:?} has norm {n} and cannot be normalized"
        )));
    }
    Ok(from_quaternion(&q.normalize()))
}

/// Normalize every record, keeping order.
pub fn normalize_samples(samples: &[OrientationSample]) -> Result<Vec<OrientationSample>, MetricsError> {
    samples
        .iter()
        .enumerate()
        .map(|(i, s)| {
            normalize_sample(s).map_err(|e| match e {
                MetricsError::InvalidInput(m) => MetricsError::invalid(format!("sample #{i}: {m}")),
                MetricsError::NumericDegeneracy(m) => MetricsError::degenerate(format!("sample #{i}: {m}")),
            })
        })
        .collect()
}

pub fn normalize_stream(stream: &OrientationStream) -> Result<OrientationStream, MetricsError> {
    let samples = normalize_samples(&stream.samples).map_err(|e| match e {
        MetricsError::InvalidInput(m) => MetricsError::invalid(format!("{}: {m}", stream.label)),
        MetricsError::NumericDegeneracy(m) => MetricsError::degenerate(format!("{}: {m}", stream.label)),
    })?;
    Ok(OrientationStream {
        label: stream.label.clone(),
        samples,
    })
}

/// Flip any sample pointing into the opposite hemisphere of its predecessor.
///
/// `q` and `-q` encode the same rotation; after alignment every consecutive pair
/// has a non-negative dot product.
pub fn align_hemisphere(samples: &[OrientationSample]) -> Vec<OrientationSample> {
    let mut out: Vec<OrientationSample> = Vec::with_capacity(samples.len());
    for s in samples {
        let q = to_quaternion(s);
        let aligned = match out.last() {
            Some(prev) if to_quaternion(prev).dot(&q) < 0.0 => -q,
            _ => q,
        };
        out.push(from_quaternion(&aligned));
    }
    out
}

/// Rotation taking `from` to `to`: `to * conj(from)` (unit inputs).
pub fn delta_rotation(from: &OrientationSample, to: &OrientationSample) -> OrientationSample {
    let q = to_quaternion(to) * to_quaternion(from).conjugate();
    from_quaternion(&q)
}

/// Angle in radians between two unit quaternions: `2 * acos(dot)`.
///
/// The dot product is clamped to `[-1, 1]` before `acos`. `acos` is steep near 1,
/// so one ulp of rounding in `dot` costs about 3e-8 rad: nearly identical inputs
/// give an angle around 1e-8 rather than exactly 0.
pub fn angular_difference(a: &OrientationSample, b: &OrientationSample) -> f64 {
    let dot = to_quaternion(a).dot(&to_quaternion(b)).clamp(-1.0, 1.0);
    2.0 * dot.acos()
}

/// Compare how two streams rotate from one sample to the next.
///
/// Samples are paired by index up to the shorter stream. For each consecutive
/// pair the two delta rotations are compared; the streams match when at least
/// `required_run` consecutive deltas agree within `threshold` radians.
pub fn compare_streams(
    a: &OrientationStream,
    b: &OrientationStream,
    threshold: f64,
    required_run: usize,
) -> Result<StreamComparison, MetricsError> {
    if !(threshold.is_finite() && threshold >= 0.0) {
        return Err(MetricsError::invalid(format!(
            "alignment threshold must be finite and >= 0, got {threshold}"
        )));
    }
    if required_run == 0 {
        return Err(MetricsError::invalid("required alignment run must be >= 1"));
    }

    let pairs = a.samples.len().min(b.samples.len());
    if pairs < 2 {
        return Err(MetricsError::invalid(format!(
            "need at least 2 paired samples to compare '{}' and '{}', got {pairs}",
            a.label, b.label
        )));
    }

    // Sign flips between consecutive samples would read as full turns.
    let qa = align_hemisphere(&normalize_stream(a)?.samples);
    let qb = align_hemisphere(&normalize_stream(b)?.samples);

    let mut delta_angles = Vec::with_capacity(pairs - 1);
    let mut run = 0usize;
    let mut longest_run = 0usize;
    for i in 0..pairs - 1 {
        let da = delta_rotation(&qa[i], &qa[i + 1]);
        let db = delta_rotation(&qb[i], &qb[i + 1]);
        let angle = angular_difference(&da, &db);
        delta_angles.push(angle);

        if angle <= threshold {
            run += 1;
            longest_run = longest_run.max(run);
        } else {
            run = 0;
        }
    }

    Ok(StreamComparison {
        label_a: a.label.clone(),
        label_b: b.label.clone(),
        pairs,
        delta_angles,
        threshold,
        required_run,
        longest_run,
        matched: longest_run >= required_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn yaw(angle: f64) -> OrientationSample {
        OrientationSample::new((angle / 2.0).cos(), 0.0, 0.0, (angle / 2.0).sin())
    }

    #[test]
    fn normalizes_three_four_five() {
        let n = normalize_sample(&OrientationSample::new(3.0, 0.0, 4.0, 0.0)).unwrap();
        assert!(close(n.w, 0.6));
        assert!(close(n.x, 0.0));
        assert!(close(n.y, 0.8));
        assert!(close(n.z, 0.0));
        assert!(close(norm(&n), 1.0));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_sample(&OrientationSample::new(0.9, -0.1, -0.07, 0.004)).unwrap();
        let twice = normalize_sample(&once).unwrap();
        for (a, b) in once.components().iter().zip(twice.components().iter()) {
            assert!(close(*a, *b));
        }
    }

    #[test]
    fn zero_norm_is_degenerate() {
        let err = normalize_sample(&OrientationSample::new(0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, MetricsError::NumericDegeneracy(_)));

        let err = normalize_sample(&OrientationSample::new(f64::NAN, 0.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidInput(_)));
    }

    #[test]
    fn stream_errors_name_the_sample() {
        let stream = OrientationStream {
            label: "Watch".to_string(),
            samples: vec![OrientationSample::new(1.0, 0.0, 0.0, 0.0), OrientationSample::new(0.0, 0.0, 0.0, 0.0)],
        };
        let err = normalize_stream(&stream).unwrap_err();
        assert!(err.message().contains("Watch"));
        assert!(err.message().contains("#1"));
    }

    #[test]
    fn hemisphere_alignment_removes_sign_flips() {
        let q = yaw(0.2);
        let flipped = OrientationSample::new(-q.w, -q.x, -q.y, -q.z);
        let aligned = align_hemisphere(&[yaw(0.1), flipped, yaw(0.3)]);
        assert!(close(aligned[1].w, q.w));
        assert!(close(aligned[1].z, q.z));
        assert!(aligned.windows(2).all(|w| to_quaternion(&w[0]).dot(&to_quaternion(&w[1])) >= 0.0));
    }

    #[test]
    fn delta_of_yaw_steps_is_the_step() {
        let d = delta_rotation(&yaw(0.3), &yaw(0.5));
        let expected = yaw(0.2);
        for (a, b) in d.components().iter().zip(expected.components().iter()) {
            assert!(close(*a, *b));
        }
        assert!(angular_difference(&d, &expected) < 1e-6);
    }

    #[test]
    fn streams_with_same_motion_match() {
        // Same yaw motion, different constant mounting offset on the second device.
        let offset = Quaternion::new(0.9, 0.3, -0.2, 0.1).normalize();
        let a: Vec<OrientationSample> = (0..8).map(|k| yaw(0.05 * k as f64)).collect();
        let b: Vec<OrientationSample> = a
            .iter()
            .map(|s| from_quaternion(&(to_quaternion(s) * offset)))
            .collect();

        let cmp = compare_streams(
            &OrientationStream { label: "Watch".to_string(), samples: a },
            &OrientationStream { label: "iPhone".to_string(), samples: b },
            0.1,
            5,
        )
        .unwrap();

        assert_eq!(cmp.pairs, 8);
        assert_eq!(cmp.delta_angles.len(), 7);
        assert!(cmp.delta_angles.iter().all(|&a| a < 1e-6));
        assert_eq!(cmp.longest_run, 7);
        assert!(cmp.matched);
    }

    #[test]
    fn sign_flipped_sample_does_not_break_a_run() {
        let a: Vec<OrientationSample> = (0..6).map(|k| yaw(0.05 * k as f64)).collect();
        let mut b = a.clone();
        let q = b[3];
        b[3] = OrientationSample::new(-q.w, -q.x, -q.y, -q.z);

        let cmp = compare_streams(
            &OrientationStream { label: "Watch".to_string(), samples: a },
            &OrientationStream { label: "iPhone".to_string(), samples: b },
            0.1,
            5,
        )
        .unwrap();
        assert_eq!(cmp.longest_run, 5);
        assert!(cmp.matched);
    }

    #[test]
    fn still_stream_does_not_match_moving_stream() {
        let moving: Vec<OrientationSample> = (0..6).map(|k| yaw(0.5 * k as f64)).collect();
        let still = vec![OrientationSample::new(1.0, 0.0, 0.0, 0.0); 6];
        let cmp = compare_streams(
            &OrientationStream { label: "Watch".to_string(), samples: moving },
            &OrientationStream { label: "iPhone".to_string(), samples: still },
            0.1,
            5,
        )
        .unwrap();
        assert_eq!(cmp.longest_run, 0);
        assert!(!cmp.matched);
        assert!(cmp.delta_angles.iter().all(|&a| close(a, 0.5)));
    }
}
