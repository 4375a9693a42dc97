//! Built-in evaluation tables.
//!
//! These are the measured tables from the unlock experiments: FRR/FAR per
//! matching threshold, confusion counts for the acceleration thresholds, and a
//! short watch/phone quaternion capture.

use crate::domain::{
    ConfusionDataset, ConfusionRow, CurvesDataset, Dataset, OrientationDataset, OrientationSample,
    OrientationStream, RateCurve, SessionModel,
};
use crate::error::MetricsError;

/// Dataset used when nothing else is requested.
pub const DEFAULT_DATASET: &str = "accel-stationary-high";

/// Names of every built-in dataset, in listing order.
pub const BUILTIN_NAMES: [&str; 5] = [
    "frr-far",
    "accel-difference",
    "accel-stationary",
    "accel-stationary-high",
    "watch-vs-iphone",
];

/// Look up a built-in dataset by name.
pub fn builtin(name: &str) -> Result<Dataset, MetricsError> {
    match name {
        "frr-far" => Ok(frr_far()),
        "accel-difference" => Ok(accel_difference()),
        "accel-stationary" => Ok(accel_stationary()),
        "accel-stationary-high" => Ok(accel_stationary_high()),
        "watch-vs-iphone" => Ok(watch_vs_iphone()),
        _ => Err(MetricsError::invalid(format!(
            "Unknown dataset '{name}'. Built-in datasets: {}.",
            BUILTIN_NAMES.join(", ")
        ))),
    }
}

/// All built-in datasets, in listing order.
pub fn all_builtins() -> Vec<Dataset> {
    vec![
        frr_far(),
        accel_difference(),
        accel_stationary(),
        accel_stationary_high(),
        watch_vs_iphone(),
    ]
}

fn frr_far() -> Dataset {
    Dataset::Curves(CurvesDataset {
        name: "frr-far".to_string(),
        description: "FRR and FAR of the orientation matcher vs matching threshold".to_string(),
        thresholds: vec![0.2, 0.25, 0.3, 0.35, 0.4, 0.45, 0.50],
        curve_a: RateCurve::new("FRR", vec![0.80, 0.59, 0.47, 0.40, 0.32, 0.13, 0.08]),
        curve_b: RateCurve::new("FAR", vec![0.00, 0.00, 0.05, 0.13, 0.18, 0.22, 0.24]),
    })
}

fn confusion(name: &str, description: &str, rows: &[(f64, u32, u32, u32)]) -> Dataset {
    Dataset::Confusion(ConfusionDataset {
        name: name.to_string(),
        description: description.to_string(),
        session: SessionModel::default(),
        rows: rows
            .iter()
            .map(|&(t, tp, fp, fn_)| ConfusionRow::new(t, tp, fp, fn_))
            .collect(),
    })
}

fn accel_difference() -> Dataset {
    confusion(
        "accel-difference",
        "Acceleration difference threshold sweep",
        &[
            (0.10, 0, 0, 6),
            (0.15, 4, 2, 1),
            (0.20, 6, 2, 1),
            (0.25, 7, 2, 1),
            (0.30, 8, 3, 1),
            (0.35, 9, 3, 1),
            (0.40, 10, 4, 1),
        ],
    )
}

fn accel_stationary() -> Dataset {
    confusion(
        "accel-stationary",
        "Acceleration stationary threshold sweep",
        &[
            (0.10, 6, 2, 1),
            (0.12, 6, 2, 2),
            (0.15, 5, 2, 3),
            (0.18, 4, 1, 4),
            (0.20, 3, 1, 5),
        ],
    )
}

fn accel_stationary_high() -> Dataset {
    confusion(
        "accel-stationary-high",
        "Acceleration stationary threshold sweep, upper range",
        &[(0.60, 7, 2, 1), (0.65, 5, 3, 1), (0.70, 3, 4, 1)],
    )
}

const WATCH_SAMPLES: [OrientationSample; 5] = [
    OrientationSample::new(0.99338910981071, -0.08896809767140239, -0.07243631560779627, 0.00395885874141174),
    OrientationSample::new(0.9892510901214987, -0.11102670434156024, -0.06304882554321911, 0.07127492368762303),
    OrientationSample::new(0.9833627707773328, -0.1161834435776221, -0.04650217047140389, 0.1316681174174741),
    OrientationSample::new(0.9797505140962445, -0.11306648203349248, -0.03840059409545206, 0.160717515072507),
    OrientationSample::new(0.9816656130913097, -0.11278011973090066, -0.039129235629486996, 0.1486003330867925),
];

const IPHONE_SAMPLE: OrientationSample =
    OrientationSample::new(1.0, -3.3881317890172014e-21, -1.8973538018496328e-19, 0.0);

fn watch_vs_iphone() -> Dataset {
    Dataset::Orientation(OrientationDataset {
        name: "watch-vs-iphone".to_string(),
        description: "Watch and iPhone attitude quaternions captured side by side".to_string(),
        streams: vec![
            OrientationStream {
                label: "Watch".to_string(),
                samples: WATCH_SAMPLES.to_vec(),
            },
            OrientationStream {
                label: "iPhone".to_string(),
                samples: vec![IPHONE_SAMPLE; 5],
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DatasetKind;

    #[test]
    fn every_listed_name_resolves() {
        for name in BUILTIN_NAMES {
            let dataset = builtin(name).unwrap();
            assert_eq!(dataset.name(), name);
        }
        assert_eq!(all_builtins().len(), BUILTIN_NAMES.len());
        assert!(builtin(DEFAULT_DATASET).is_ok());
    }

    #[test]
    fn unknown_name_lists_alternatives() {
        let err = builtin("nope").unwrap_err();
        assert!(err.message().contains("frr-far"));
    }

    #[test]
    fn kinds_match_contents() {
        assert_eq!(builtin("frr-far").unwrap().kind(), DatasetKind::Curves);
        assert_eq!(builtin("accel-difference").unwrap().kind(), DatasetKind::Confusion);
        assert_eq!(builtin("watch-vs-iphone").unwrap().kind(), DatasetKind::Orientation);
    }
}
