//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built from literal tables (built-in datasets) or JSON dataset files
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Dense grid resolution used by the interpolated EER estimator.
pub const DEFAULT_GRID_POINTS: usize = 500;

/// Largest dense grid accepted from flags, the environment, or the TUI.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Session length assumed when turning confusion counts into a population (5 min).
pub const DEFAULT_SESSION_SECS: f64 = 300.0;

/// Assumed spacing between unlock attempts within a session.
pub const DEFAULT_UNLOCK_INTERVAL_SECS: f64 = 2.0;

/// Maximum angular difference (radians) for two orientation deltas to agree.
pub const DEFAULT_ALIGNMENT_THRESHOLD: f64 = 0.1;

/// Consecutive agreeing deltas required before two streams count as matched.
pub const DEFAULT_ALIGNMENT_RUN: usize = 5;

/// Which minimizer wins when several indices share the smallest gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Lowest index (matches a forward scan).
    First,
    /// Highest index.
    Last,
}

/// Which value is reported as the equal error rate at the chosen index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RatePolicy {
    /// The first curve's value (FRR / FPR side).
    CurveA,
    /// Midpoint of both curves.
    Mean,
}

impl RatePolicy {
    pub fn pick(self, a: f64, b: f64) -> f64 {
        match self {
            RatePolicy::CurveA => a,
            RatePolicy::Mean => (a + b) / 2.0,
        }
    }
}

/// How an [`EerEstimate`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum EerMethod {
    /// Both curves linearly interpolated onto a uniform grid.
    Interpolated { grid_points: usize },
    /// Argmin over the sampled operating points.
    Direct,
}

/// A labelled rate curve sampled at the thresholds of its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCurve {
    pub label: String,
    pub values: Vec<f64>,
}

impl RateCurve {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Estimated crossing point of two rate curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EerEstimate {
    pub method: EerMethod,
    /// Threshold at the closest approach.
    pub threshold: f64,
    /// Reported equal error rate (see [`RatePolicy`]).
    pub rate: f64,
    pub rate_policy: RatePolicy,
    /// Index into the grid (interpolated) or the sampled points (direct).
    pub index: usize,
    pub rate_a: f64,
    pub rate_b: f64,
    /// `true` if `a - b` reaches zero or changes sign over the evaluated points;
    /// `false` means the result is only the closest approach.
    pub crossing: bool,
}

impl EerEstimate {
    pub fn gap(&self) -> f64 {
        (self.rate_a - self.rate_b).abs()
    }
}

/// Raw confusion counts observed at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfusionRow {
    pub threshold: f64,
    pub tp: u32,
    pub fp: u32,
    #[serde(rename = "fn")]
    pub fn_: u32,
}

impl ConfusionRow {
    pub fn new(threshold: f64, tp: u32, fp: u32, fn_: u32) -> Self {
        Self { threshold, tp, fp, fn_ }
    }
}

/// Assumed capture session used to estimate the attempt population.
///
/// The population is not measured: it is `duration / interval`, the number of
/// unlock opportunities a session of that length would offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionModel {
    pub duration_secs: f64,
    pub unlock_interval_secs: f64,
}

impl Default for SessionModel {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
            unlock_interval_secs: DEFAULT_UNLOCK_INTERVAL_SECS,
        }
    }
}

/// Derived rates for one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub threshold: f64,
    pub tp: u32,
    pub fp: u32,
    #[serde(rename = "fn")]
    pub fn_: u32,
    /// Derived true negatives (fractional when the population is).
    pub tn: f64,
    pub tpr: f64,
    pub fpr: f64,
    pub fnr: f64,
    pub tnr: f64,
    /// `(fpr + fnr) / 2`, the per-threshold error midpoint.
    pub error_mean: f64,
}

/// A single ROC operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    pub fpr: f64,
    pub tpr: f64,
}

/// Per-threshold rates, index-aligned with the input rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub total_population: f64,
    pub rows: Vec<RateRow>,
}

impl RateTable {
    pub fn thresholds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.threshold).collect()
    }

    pub fn tpr(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.tpr).collect()
    }

    pub fn fpr(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.fpr).collect()
    }

    pub fn fnr(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.fnr).collect()
    }

    pub fn error_mean(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.error_mean).collect()
    }

    pub fn roc_points(&self) -> Vec<RocPoint> {
        self.rows
            .iter()
            .map(|r| RocPoint {
                threshold: r.threshold,
                fpr: r.fpr,
                tpr: r.tpr,
            })
            .collect()
    }
}

/// One orientation record (unit norm after normalization).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OrientationSample {
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn components(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }
}

/// A labelled, index-ordered sequence of orientation samples from one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationStream {
    pub label: String,
    pub samples: Vec<OrientationSample>,
}

/// Outcome of comparing how two streams rotate sample-to-sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamComparison {
    pub label_a: String,
    pub label_b: String,
    /// Number of index-paired samples considered.
    pub pairs: usize,
    /// Angular difference (radians) between paired delta rotations.
    pub delta_angles: Vec<f64>,
    pub threshold: f64,
    pub required_run: usize,
    pub longest_run: usize,
    pub matched: bool,
}

/// Two rate curves over shared thresholds (FRR/FAR style).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvesDataset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub thresholds: Vec<f64>,
    pub curve_a: RateCurve,
    pub curve_b: RateCurve,
}

/// Confusion counts per threshold plus the session assumed for the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionDataset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub session: SessionModel,
    pub rows: Vec<ConfusionRow>,
}

/// Orientation streams to be normalized and compared component by component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationDataset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub streams: Vec<OrientationStream>,
}

/// Any input table understood by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dataset {
    Curves(CurvesDataset),
    Confusion(ConfusionDataset),
    Orientation(OrientationDataset),
}

impl Dataset {
    pub fn name(&self) -> &str {
        match self {
            Dataset::Curves(d) => &d.name,
            Dataset::Confusion(d) => &d.name,
            Dataset::Orientation(d) => &d.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Dataset::Curves(d) => &d.description,
            Dataset::Confusion(d) => &d.description,
            Dataset::Orientation(d) => &d.description,
        }
    }

    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Curves(_) => DatasetKind::Curves,
            Dataset::Confusion(_) => DatasetKind::Confusion,
            Dataset::Orientation(_) => DatasetKind::Orientation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Curves,
    Confusion,
    Orientation,
}

impl DatasetKind {
    pub fn display_name(self) -> &'static str {
        match self {
            DatasetKind::Curves => "curves",
            DatasetKind::Confusion => "confusion",
            DatasetKind::Orientation => "orientation",
        }
    }
}

/// Where the dataset for a run comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// A built-in table, by name.
    Builtin(String),
    /// A JSON dataset file.
    File(PathBuf),
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` defaults).
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub source: DatasetSource,

    pub grid_points: usize,
    pub tie_break: TieBreak,
    /// `None` keeps each estimator's own default policy.
    pub rate_policy: Option<RatePolicy>,

    /// Overrides applied on top of a confusion dataset's session.
    pub duration_secs: Option<f64>,
    pub unlock_interval_secs: Option<f64>,

    pub alignment_threshold: f64,
    pub alignment_run: usize,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub debug: bool,
}

impl MetricsConfig {
    /// Defaults for a given dataset source.
    pub fn for_source(source: DatasetSource) -> Self {
        Self {
            source,
            grid_points: DEFAULT_GRID_POINTS,
            tie_break: TieBreak::First,
            rate_policy: None,
            duration_secs: None,
            unlock_interval_secs: None,
            alignment_threshold: DEFAULT_ALIGNMENT_THRESHOLD,
            alignment_run: DEFAULT_ALIGNMENT_RUN,
            plot: true,
            plot_width: 72,
            plot_height: 20,
            export_csv: None,
            export_json: None,
            debug: false,
        }
    }

    /// Session for a confusion dataset after applying CLI overrides.
    pub fn session_for(&self, base: SessionModel) -> SessionModel {
        SessionModel {
            duration_secs: self.duration_secs.unwrap_or(base.duration_secs),
            unlock_interval_secs: self.unlock_interval_secs.unwrap_or(base.unlock_interval_secs),
        }
    }
}

/// A saved metrics report (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub body: ReportBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportBody {
    Crossing {
        thresholds: Vec<f64>,
        curve_a: RateCurve,
        curve_b: RateCurve,
        eer: EerEstimate,
    },
    Rates {
        session: SessionModel,
        table: RateTable,
        /// `None` when the table has fewer than 2 thresholds.
        #[serde(default)]
        eer: Option<EerEstimate>,
    },
    Orientation {
        streams: Vec<OrientationStream>,
        comparison: Option<StreamComparison>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_policy_picks_expected_value() {
        assert_eq!(RatePolicy::CurveA.pick(0.2, 0.4), 0.2);
        assert!((RatePolicy::Mean.pick(0.2, 0.4) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn confusion_dataset_parses_with_default_session() {
        let json = r#"{
            "kind": "confusion",
            "name": "adhoc",
            "rows": [{"threshold": 0.6, "tp": 7, "fp": 2, "fn": 1}]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let Dataset::Confusion(d) = dataset else {
            panic!("expected a confusion dataset");
        };
        assert_eq!(d.session, SessionModel::default());
        assert_eq!(d.rows[0], ConfusionRow::new(0.6, 7, 2, 1));
    }

    #[test]
    fn session_overrides_apply_per_field() {
        let mut config = MetricsConfig::for_source(DatasetSource::Builtin("x".to_string()));
        config.unlock_interval_secs = Some(3.0);
        let session = config.session_for(SessionModel::default());
        assert_eq!(session.duration_secs, 300.0);
        assert_eq!(session.unlock_interval_secs, 3.0);
    }
}
