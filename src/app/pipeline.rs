//! Shared "metrics pipeline" logic used by both CLI and TUI front-ends.
//!
//! One entry point per dataset kind:
//! curves -> dense interpolation -> interpolated EER
//! confusion -> population -> rate table -> direct EER
//! orientation -> normalization -> delta-rotation comparison
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{
    ConfusionDataset, CurvesDataset, Dataset, DatasetKind, EerEstimate, MetricsConfig, OrientationDataset,
    OrientationStream, RateTable, ReportBody, SessionModel, StreamComparison,
};
use crate::eer::{DenseCurves, EerOptions, densify, estimate_direct, estimate_on_grid};
use crate::error::MetricsError;
use crate::orientation::{compare_streams, normalize_stream};
use crate::plot::{ChartData, crossing_chart, error_mean_chart, orientation_chart, rates_chart, roc_chart};
use crate::rates::{convert_counts, total_population};

/// Outputs of the interpolated estimator on a curve pair.
#[derive(Debug, Clone)]
pub struct CrossingRun {
    pub dataset: CurvesDataset,
    pub dense: DenseCurves,
    pub eer: EerEstimate,
}

/// Outputs of the confusion-count conversion.
#[derive(Debug, Clone)]
pub struct RatesRun {
    pub name: String,
    pub session: SessionModel,
    pub table: RateTable,
    /// Skipped for tables with fewer than 2 thresholds.
    pub eer: Option<EerEstimate>,
}

/// Normalized streams and, when two streams are present, their comparison.
#[derive(Debug, Clone)]
pub struct OrientationRun {
    pub name: String,
    pub raw: Vec<OrientationStream>,
    pub normalized: Vec<OrientationStream>,
    pub comparison: Option<StreamComparison>,
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub enum RunOutput {
    Crossing(CrossingRun),
    Rates(RatesRun),
    Orientation(OrientationRun),
}

impl RunOutput {
    pub fn name(&self) -> &str {
        match self {
            RunOutput::Crossing(run) => &run.dataset.name,
            RunOutput::Rates(run) => &run.name,
            RunOutput::Orientation(run) => &run.name,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            RunOutput::Crossing(_) => DatasetKind::Curves,
            RunOutput::Rates(_) => DatasetKind::Confusion,
            RunOutput::Orientation(_) => DatasetKind::Orientation,
        }
    }

    pub fn eer(&self) -> Option<&EerEstimate> {
        match self {
            RunOutput::Crossing(run) => Some(&run.eer),
            RunOutput::Rates(run) => run.eer.as_ref(),
            RunOutput::Orientation(_) => None,
        }
    }

    /// Text report for stdout.
    pub fn summary(&self) -> String {
        match self {
            RunOutput::Crossing(run) => crate::report::format_crossing_summary(&run.dataset, &run.eer),
            RunOutput::Rates(run) => {
                crate::report::format_rate_report(&run.name, &run.session, &run.table, run.eer.as_ref())
            }
            RunOutput::Orientation(run) => {
                crate::report::format_orientation_report(&run.name, &run.normalized, run.comparison.as_ref())
            }
        }
    }

    /// Charts in display order.
    pub fn charts(&self) -> Vec<ChartData> {
        match self {
            RunOutput::Crossing(run) => vec![crossing_chart(
                &run.dataset.thresholds,
                &run.dataset.curve_a,
                &run.dataset.curve_b,
                &run.eer,
            )],
            RunOutput::Rates(run) => vec![
                rates_chart(&run.table, run.eer.as_ref()),
                roc_chart(&run.table),
                error_mean_chart(&run.table),
            ],
            RunOutput::Orientation(run) => vec![orientation_chart(&run.normalized)],
        }
    }

    /// Serializable form for `--export-json`.
    pub fn report_body(&self) -> ReportBody {
        match self {
            RunOutput::Crossing(run) => ReportBody::Crossing {
                thresholds: run.dataset.thresholds.clone(),
                curve_a: run.dataset.curve_a.clone(),
                curve_b: run.dataset.curve_b.clone(),
                eer: run.eer.clone(),
            },
            RunOutput::Rates(run) => ReportBody::Rates {
                session: run.session,
                table: run.table.clone(),
                eer: run.eer.clone(),
            },
            RunOutput::Orientation(run) => ReportBody::Orientation {
                streams: run.normalized.clone(),
                comparison: run.comparison.clone(),
            },
        }
    }
}

/// Run whichever analysis matches the dataset's kind.
pub fn run_dataset(dataset: &Dataset, config: &MetricsConfig) -> Result<RunOutput, MetricsError> {
    match dataset {
        Dataset::Curves(d) => Ok(RunOutput::Crossing(run_crossing(d, config)?)),
        Dataset::Confusion(d) => Ok(RunOutput::Rates(run_rates(d, config)?)),
        Dataset::Orientation(d) => Ok(RunOutput::Orientation(run_orientation(d, config)?)),
    }
}

/// Interpolated EER for a curve pair.
pub fn run_crossing(dataset: &CurvesDataset, config: &MetricsConfig) -> Result<CrossingRun, MetricsError> {
    let options = EerOptions::from_config(config);
    let dense = densify(
        &dataset.thresholds,
        &dataset.curve_a.values,
        &dataset.curve_b.values,
        options.grid_points,
    )?;
    let eer = estimate_on_grid(&dense, options)?;
    Ok(CrossingRun {
        dataset: dataset.clone(),
        dense,
        eer,
    })
}

/// Rates from confusion counts, then the direct EER over (FPR, FNR).
///
/// A single-threshold table still yields its rates; the EER needs at least 2.
pub fn run_rates(dataset: &ConfusionDataset, config: &MetricsConfig) -> Result<RatesRun, MetricsError> {
    let session = config.session_for(dataset.session);
    let total = total_population(&session)?;
    let table = convert_counts(&dataset.rows, total)?;
    let eer = if table.rows.len() >= 2 {
        Some(estimate_direct(
            &table.thresholds(),
            &table.fpr(),
            &table.fnr(),
            EerOptions::from_config(config),
        )?)
    } else {
        None
    };
    Ok(RatesRun {
        name: dataset.name.clone(),
        session,
        table,
        eer,
    })
}

/// Normalize every stream; compare the first two when both have enough samples.
pub fn run_orientation(dataset: &OrientationDataset, config: &MetricsConfig) -> Result<OrientationRun, MetricsError> {
    if dataset.streams.is_empty() {
        return Err(MetricsError::invalid(format!(
            "orientation dataset '{}' has no streams",
            dataset.name
        )));
    }

    let normalized = dataset
        .streams
        .iter()
        .map(normalize_stream)
        .collect::<Result<Vec<_>, _>>()?;

    let comparison = match dataset.streams.as_slice() {
        [a, b, ..] if a.samples.len().min(b.samples.len()) >= 2 => Some(compare_streams(
            a,
            b,
            config.alignment_threshold,
            config.alignment_run,
        )?),
        _ => None,
    };

    Ok(OrientationRun {
        name: dataset.name.clone(),
        raw: dataset.streams.clone(),
        normalized,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin;
    use crate::domain::{DatasetSource, OrientationSample, RatePolicy};

    fn config() -> MetricsConfig {
        MetricsConfig::for_source(DatasetSource::Builtin("frr-far".to_string()))
    }

    #[test]
    fn frr_far_reference_crossing() {
        let run = run_dataset(&builtin("frr-far").unwrap(), &config()).unwrap();
        let eer = run.eer().unwrap();
        // Grid point 383 of 500 on [0.2, 0.5]; the exact crossing (0.430435, 0.204348)
        // lies between grid points.
        assert_eq!(eer.index, 383);
        assert!((eer.threshold - (0.2 + 383.0 * 0.3 / 499.0)).abs() < 1e-12);
        assert!((eer.threshold - 0.430261).abs() < 1e-6);
        assert!((eer.rate - 0.205010).abs() < 1e-6);
        assert!((eer.threshold - 0.430435).abs() < 0.3 / 499.0);
        assert_eq!(run.kind(), DatasetKind::Curves);
        assert_eq!(run.charts().len(), 1);
        assert!(run.summary().contains("FRR vs FAR"));
    }

    #[test]
    fn rates_pipeline_uses_session_overrides() {
        let Dataset::Confusion(d) = builtin("accel-stationary-high").unwrap() else {
            panic!("expected a confusion dataset");
        };

        let run = run_rates(&d, &config()).unwrap();
        assert_eq!(run.table.total_population, 150.0);
        let eer = run.eer.as_ref().unwrap();
        assert_eq!(eer.index, 0);
        assert_eq!(eer.rate_policy, RatePolicy::Mean);

        let mut cfg = config();
        cfg.unlock_interval_secs = Some(1.0);
        let run = run_rates(&d, &cfg).unwrap();
        assert_eq!(run.table.total_population, 300.0);
        assert_eq!(run.session.duration_secs, 300.0);
    }

    #[test]
    fn single_threshold_table_keeps_rates_without_eer() {
        let d = ConfusionDataset {
            name: "one-row".to_string(),
            description: String::new(),
            session: SessionModel::default(),
            rows: vec![crate::domain::ConfusionRow::new(0.60, 7, 2, 1)],
        };

        let run = run_rates(&d, &config()).unwrap();
        assert!(run.eer.is_none());
        assert_eq!(run.table.rows.len(), 1);
        assert!((run.table.rows[0].tpr - 0.875).abs() < 1e-12);

        let out = RunOutput::Rates(run);
        assert!(out.eer().is_none());
        assert!(out.summary().contains("needs at least 2 thresholds"));
        assert_eq!(out.charts()[0].series.len(), 3);
        assert!(matches!(out.report_body(), ReportBody::Rates { eer: None, .. }));
    }

    #[test]
    fn rates_pipeline_reports_impossible_population() {
        let Dataset::Confusion(d) = builtin("accel-difference").unwrap() else {
            panic!("expected a confusion dataset");
        };
        let mut cfg = config();
        cfg.duration_secs = Some(10.0);
        // 5 attempts cannot hold TP+FN = 6.
        let err = run_rates(&d, &cfg).unwrap_err();
        assert!(matches!(err, MetricsError::InvalidInput(_)));
    }

    #[test]
    fn orientation_pipeline_compares_first_two_streams() {
        let run = run_dataset(&builtin("watch-vs-iphone").unwrap(), &config()).unwrap();
        let RunOutput::Orientation(o) = &run else {
            panic!("expected orientation output");
        };
        assert_eq!(o.normalized.len(), 2);
        let cmp = o.comparison.as_ref().unwrap();
        assert_eq!(cmp.pairs, 5);
        assert_eq!(cmp.delta_angles.len(), 4);
        assert!(run.eer().is_none());
    }

    #[test]
    fn single_sample_streams_skip_comparison() {
        let d = OrientationDataset {
            name: "one".to_string(),
            description: String::new(),
            streams: vec![
                OrientationStream {
                    label: "a".to_string(),
                    samples: vec![OrientationSample::new(2.0, 0.0, 0.0, 0.0)],
                },
                OrientationStream {
                    label: "b".to_string(),
                    samples: vec![OrientationSample::new(0.0, 0.0, 3.0, 0.0)],
                },
            ],
        };
        let run = run_orientation(&d, &config()).unwrap();
        assert!(run.comparison.is_none());
        assert_eq!(run.normalized[1].samples[0], OrientationSample::new(0.0, 0.0, 1.0, 0.0));
    }
}
