//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` defaults and parses CLI arguments
//! - resolves the dataset (built-in or JSON file)
//! - runs the matching pipeline
//! - prints reports/plots
//! - writes optional exports and debug bundles

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, DatasetsArgs, PlotArgs, RunArgs};
use crate::domain::{DEFAULT_GRID_POINTS, DatasetKind, DatasetSource, MAX_GRID_POINTS, MetricsConfig};
use crate::error::AppError;

pub mod pipeline;

/// Defaults read from the environment (and `.env`), below explicit flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvDefaults {
    /// `EER_GRID_POINTS`
    pub grid_points: Option<usize>,
    /// `EER_DATASET`, used by the TUI.
    pub dataset: Option<String>,
}

impl EnvDefaults {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let grid_points = match std::env::var("EER_GRID_POINTS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<usize>()
                    .map_err(|e| AppError::new(2, format!("Invalid EER_GRID_POINTS '{raw}': {e}")))?,
            ),
            Err(_) => None,
        };
        if let Some(n) = grid_points {
            check_grid_points(n, "EER_GRID_POINTS")?;
        }
        let dataset = std::env::var("EER_DATASET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self { grid_points, dataset })
    }
}

/// Entry point for the `eer` binary.
pub fn run() -> Result<(), AppError> {
    // `eer` and `eer --dataset frr-far` behave like `eer tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let env = EnvDefaults::from_env()?;

    match cli.command {
        Command::Crossing(args) => handle_run(args, DatasetKind::Curves, "frr-far", &env),
        Command::Rates(args) => handle_run(args, DatasetKind::Confusion, crate::data::DEFAULT_DATASET, &env),
        Command::Orientation(args) => handle_run(args, DatasetKind::Orientation, "watch-vs-iphone", &env),
        Command::Datasets(args) => handle_datasets(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args, &env),
    }
}

fn handle_run(args: RunArgs, expected: DatasetKind, default_dataset: &str, env: &EnvDefaults) -> Result<(), AppError> {
    let config = metrics_config_from_args(&args, default_dataset, env)?;
    let dataset = crate::data::load_dataset(&config.source)?;
    if dataset.kind() != expected {
        return Err(AppError::new(
            2,
            format!(
                "Dataset '{}' is a {} dataset; this command needs a {} dataset.",
                dataset.name(),
                dataset.kind().display_name(),
                expected.display_name()
            ),
        ));
    }

    let run = pipeline::run_dataset(&dataset, &config)?;

    println!("{}", run.summary());
    if config.plot {
        println!(
            "{}",
            crate::plot::render_ascii_plots(&run.charts(), config.plot_width, config.plot_height)
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        write_csv_export(path, &run)?;
        println!("Wrote rates CSV: {}", path.display());
    }
    if let Some(path) = &config.export_json {
        let report = crate::io::build_report(run.name(), run.report_body());
        crate::io::write_report_json(path, &report)?;
        println!("Wrote report JSON: {}", path.display());
    }
    if config.debug {
        let path = crate::debug::write_debug_bundle(&run, &config)?;
        println!("Wrote debug bundle: {}", path.display());
    }

    Ok(())
}

fn write_csv_export(path: &Path, run: &pipeline::RunOutput) -> Result<(), AppError> {
    match run {
        pipeline::RunOutput::Rates(r) => crate::io::write_rates_csv(path, &r.table, r.eer.as_ref()),
        _ => Err(AppError::new(
            2,
            "--export writes per-threshold rates and needs a confusion dataset (use --export-json instead)",
        )),
    }
}

fn handle_datasets(args: DatasetsArgs) -> Result<(), AppError> {
    let datasets = crate::data::all_builtins();
    print!("{}", crate::report::format_dataset_list(&datasets));

    if let Some(dir) = &args.dump {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", dir.display())))?;
        for dataset in &datasets {
            let path = dir.join(format!("{}.json", dataset.name()));
            crate::io::write_dataset_json(&path, dataset)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let report = crate::io::read_report_json(&args.report)?;
    println!(
        "Report: {} ({}, generated {})",
        report.dataset,
        report.tool,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let charts = crate::plot::report_charts(&report.body);
    println!("{}", crate::plot::render_ascii_plots(&charts, args.width, args.height));
    Ok(())
}

fn handle_tui(args: RunArgs, env: &EnvDefaults) -> Result<(), AppError> {
    let default_dataset = env.dataset.as_deref().unwrap_or(crate::data::DEFAULT_DATASET);
    let config = metrics_config_from_args(&args, default_dataset, env)?;
    crate::tui::run(config)
}

/// Map parsed flags onto a pipeline config.
///
/// Precedence: explicit flag, then environment default, then built-in default.
pub fn metrics_config_from_args(
    args: &RunArgs,
    default_dataset: &str,
    env: &EnvDefaults,
) -> Result<MetricsConfig, AppError> {
    let source = match (&args.input, &args.dataset) {
        (Some(path), _) => DatasetSource::File(path.clone()),
        (None, Some(name)) => DatasetSource::Builtin(name.clone()),
        (None, None) => DatasetSource::Builtin(default_dataset.to_string()),
    };

    let grid_points = args.grid_points.or(env.grid_points).unwrap_or(DEFAULT_GRID_POINTS);
    check_grid_points(grid_points, "--grid-points")?;

    Ok(MetricsConfig {
        source,
        grid_points,
        tie_break: args.tie_break,
        rate_policy: args.rate_policy,
        duration_secs: args.duration_secs,
        unlock_interval_secs: args.unlock_interval_secs,
        alignment_threshold: args.alignment_threshold,
        alignment_run: args.alignment_run,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        debug: args.debug,
    })
}

fn check_grid_points(n: usize, origin: &str) -> Result<(), AppError> {
    if n > MAX_GRID_POINTS {
        return Err(AppError::new(
            2,
            format!("{origin} must be <= {MAX_GRID_POINTS}, got {n}"),
        ));
    }
    Ok(())
}

/// Rewrite argv so `eer` defaults to `eer tui`.
///
/// Rules:
/// - `eer`                      -> `eer tui`
/// - `eer -d frr-far ...`       -> `eer tui -d frr-far ...`
/// - `eer --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    // Flags without a subcommand are TUI flags.
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn run_args(args: &[&str]) -> RunArgs {
        let mut full = vec!["eer", "crossing"];
        full.extend_from_slice(args);
        match Cli::parse_from(full).command {
            Command::Crossing(a) => a,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["eer"])), argv(&["eer", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["eer", "-d", "frr-far"])),
            argv(&["eer", "tui", "-d", "frr-far"])
        );
        assert_eq!(rewrite_args(argv(&["eer", "--help"])), argv(&["eer", "--help"]));
        assert_eq!(rewrite_args(argv(&["eer", "rates"])), argv(&["eer", "rates"]));
    }

    #[test]
    fn flags_override_env_defaults() {
        let env = EnvDefaults {
            grid_points: Some(1000),
            dataset: Some("accel-difference".to_string()),
        };

        let config = metrics_config_from_args(&run_args(&[]), "frr-far", &env).unwrap();
        assert_eq!(config.grid_points, 1000);
        assert_eq!(config.source, DatasetSource::Builtin("frr-far".to_string()));
        assert!(config.plot);

        let config = metrics_config_from_args(&run_args(&["--grid-points", "50", "--no-plot"]), "frr-far", &env).unwrap();
        assert_eq!(config.grid_points, 50);
        assert!(!config.plot);

        let config = metrics_config_from_args(&run_args(&[]), "frr-far", &EnvDefaults::default()).unwrap();
        assert_eq!(config.grid_points, DEFAULT_GRID_POINTS);
    }

    #[test]
    fn input_file_selects_file_source() {
        let config =
            metrics_config_from_args(&run_args(&["--input", "lab.json"]), "frr-far", &EnvDefaults::default()).unwrap();
        assert_eq!(config.source, DatasetSource::File("lab.json".into()));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = metrics_config_from_args(&run_args(&["--grid-points", "1000001"]), "frr-far", &EnvDefaults::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let env = EnvDefaults {
            grid_points: Some(usize::MAX),
            dataset: None,
        };
        assert!(metrics_config_from_args(&run_args(&[]), "frr-far", &env).is_err());

        let config =
            metrics_config_from_args(&run_args(&["--grid-points", "1000000"]), "frr-far", &env).unwrap();
        assert_eq!(config.grid_points, MAX_GRID_POINTS);
    }
}
