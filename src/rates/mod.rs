//! Confusion counts to rates.
//!
//! For each threshold the true negatives are derived from an estimated attempt
//! population:
//!
//! ```text
//! TN  = total - (TP + FN) - FP
//! TPR = TP / (TP + FN)        FNR = 1 - TPR
//! FPR = FP / (FP + TN)        TNR = 1 - FPR
//! ```
//!
//! Inputs that would make TN negative or a denominator zero are refused.

pub mod session;

pub use session::*;

use crate::domain::{ConfusionRow, RateRow, RateTable};
use crate::error::MetricsError;
use crate::math::ensure_thresholds;

/// Convert one row of counts against `total` attempts.
pub fn convert_row(row: &ConfusionRow, total: f64) -> Result<RateRow, MetricsError> {
    let tp = f64::from(row.tp);
    let fp = f64::from(row.fp);
    let fn_ = f64::from(row.fn_);

    let positives = tp + fn_;
    if positives > total {
        return Err(MetricsError::invalid(format!(
            "threshold {}: TP+FN={positives} exceeds the population estimate {total}",
            row.threshold
        )));
    }
    let negatives = total - positives;
    if fp > negatives {
        return Err(MetricsError::invalid(format!(
            "threshold {}: FP={fp} exceeds the {negatives} negatives left by the population estimate {total}",
            row.threshold
        )));
    }
    let tn = negatives - fp;

    if positives == 0.0 {
        return Err(MetricsError::degenerate(format!(
            "threshold {}: TP+FN is zero, TPR is undefined",
            row.threshold
        )));
    }
    if fp + tn == 0.0 {
        return Err(MetricsError::degenerate(format!(
            "threshold {}: FP+TN is zero, FPR is undefined",
            row.threshold
        )));
    }

    let tpr = tp / positives;
    let fpr = fp / (fp + tn);
    let fnr = 1.0 - tpr;
    let tnr = 1.0 - fpr;

    Ok(RateRow {
        threshold: row.threshold,
        tp: row.tp,
        fp: row.fp,
        fn_: row.fn_,
        tn,
        tpr,
        fpr,
        fnr,
        tnr,
        error_mean: (fpr + fnr) / 2.0,
    })
}

/// Convert every row; output rows stay index-aligned with the input.
pub fn convert_counts(rows: &[ConfusionRow], total: f64) -> Result<RateTable, MetricsError> {
    if !(total.is_finite() && total > 0.0) {
        return Err(MetricsError::invalid(format!(
            "population estimate must be finite and > 0, got {total}"
        )));
    }
    let thresholds: Vec<f64> = rows.iter().map(|r| r.threshold).collect();
    ensure_thresholds(&thresholds, 1)?;

    let rows = rows
        .iter()
        .map(|row| convert_row(row, total))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RateTable {
        total_population: total,
        rows,
    })
}
