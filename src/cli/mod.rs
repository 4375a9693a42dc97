//! Command-line parsing for the EER / ROC metrics tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimators and conversions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_ALIGNMENT_RUN, DEFAULT_ALIGNMENT_THRESHOLD, RatePolicy, TieBreak};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "eer", version, about = "Biometric EER, ROC rates and orientation metrics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the EER of a curve pair by dense linear interpolation.
    Crossing(RunArgs),
    /// Convert confusion counts into TPR/FPR/FNR/TNR and estimate the EER directly.
    Rates(RunArgs),
    /// Normalize quaternion streams and compare their delta rotations.
    Orientation(RunArgs),
    /// List the built-in datasets.
    Datasets(DatasetsArgs),
    /// Plot a previously exported JSON report.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same pipeline as the other subcommands, but renders results
    /// in a terminal UI using Ratatui.
    Tui(RunArgs),
}

/// Common options for every analysis.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Built-in dataset name (see `eer datasets`).
    #[arg(short = 'd', long)]
    pub dataset: Option<String>,

    /// JSON dataset file (takes the place of `--dataset`).
    #[arg(short = 'i', long, value_name = "JSON", conflicts_with = "dataset")]
    pub input: Option<PathBuf>,

    /// Dense grid resolution for the interpolated estimator (default 500, or `EER_GRID_POINTS`).
    #[arg(long)]
    pub grid_points: Option<usize>,

    /// Which index wins when several share the smallest gap.
    #[arg(long, value_enum, default_value_t = TieBreak::First)]
    pub tie_break: TieBreak,

    /// Reported rate at the EER (default: curve-a when interpolating, mean for confusion tables).
    #[arg(long, value_enum)]
    pub rate_policy: Option<RatePolicy>,

    /// Override the session length (seconds) used for the population estimate.
    #[arg(long)]
    pub duration_secs: Option<f64>,

    /// Override the spacing (seconds) between unlock attempts.
    #[arg(long)]
    pub unlock_interval_secs: Option<f64>,

    /// Maximum angle (radians) between paired delta rotations.
    #[arg(long, default_value_t = DEFAULT_ALIGNMENT_THRESHOLD)]
    pub alignment_threshold: f64,

    /// Consecutive agreeing deltas needed for two streams to match.
    #[arg(long, default_value_t = DEFAULT_ALIGNMENT_RUN)]
    pub alignment_run: usize,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-threshold rates to CSV (confusion datasets).
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full report to JSON (re-plot with `eer plot --report`).
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Write a markdown debug bundle into `debug/`.
    #[arg(long)]
    pub debug: bool,
}

/// Options for listing datasets.
#[derive(Debug, Parser)]
pub struct DatasetsArgs {
    /// Also write every built-in dataset as a JSON template into this directory.
    #[arg(long, value_name = "DIR")]
    pub dump: Option<PathBuf>,
}

/// Options for plotting a saved report.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Report JSON file produced by `--export-json`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rates_flags() {
        let cli = Cli::parse_from([
            "eer",
            "rates",
            "--dataset",
            "accel-difference",
            "--tie-break",
            "last",
            "--rate-policy",
            "curve-a",
            "--unlock-interval-secs",
            "1.5",
            "--no-plot",
        ]);
        let Command::Rates(args) = cli.command else {
            panic!("expected rates");
        };
        assert_eq!(args.dataset.as_deref(), Some("accel-difference"));
        assert_eq!(args.tie_break, TieBreak::Last);
        assert_eq!(args.rate_policy, Some(RatePolicy::CurveA));
        assert_eq!(args.unlock_interval_secs, Some(1.5));
        assert!(args.no_plot);
        assert_eq!(args.alignment_run, DEFAULT_ALIGNMENT_RUN);
    }

    #[test]
    fn dataset_and_input_conflict() {
        let res = Cli::try_parse_from(["eer", "crossing", "--dataset", "frr-far", "--input", "x.json"]);
        assert!(res.is_err());
    }
}
