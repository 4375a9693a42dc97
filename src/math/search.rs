//! Closest-approach search between two sampled series.

use crate::domain::TieBreak;

/// Index minimizing `|a[i] - b[i]|`, resolving ties by `tie_break`.
///
/// Returns `None` for empty input. Only the overlapping prefix is scanned when
/// the slices differ in length; callers validate lengths beforehand.
pub fn argmin_gap(a: &[f64], b: &[f64], tie_break: TieBreak) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, (&va, &vb)) in a.iter().zip(b.iter()).enumerate() {
        let gap = (va - vb).abs();
        let better = match best {
            None => true,
            Some((_, g)) => match tie_break {
                TieBreak::First => gap < g,
                TieBreak::Last => gap <= g,
            },
        };
        if better {
            best = Some((i, gap));
        }
    }
    best.map(|(i, _)| i)
}

/// Whether `a - b` touches zero or changes sign between consecutive points.
pub fn has_crossing(a: &[f64], b: &[f64]) -> bool {
    let diffs: Vec<f64> = a.iter().zip(b.iter()).map(|(&va, &vb)| va - vb).collect();
    if diffs.iter().any(|&d| d == 0.0) {
        return true;
    }
    diffs
        .windows(2)
        .any(|w| (w[0] < 0.0 && w[1] > 0.0) || (w[0] > 0.0 && w[1] < 0.0))
}
