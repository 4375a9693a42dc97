//! Debug bundle writer for inspecting inputs, derived rates, and the EER search.
//!
//! A bundle is a single markdown file under `debug/`, named after the dataset
//! and a local timestamp.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::pipeline::{CrossingRun, OrientationRun, RatesRun, RunOutput};
use crate::domain::{EerEstimate, MetricsConfig};
use crate::error::AppError;
use crate::orientation::norm;

/// Dense grid rows shown on each side of the EER index.
const GRID_WINDOW: usize = 5;

/// Write a bundle for `run` into `debug/` and return its path.
pub fn write_debug_bundle(run: &RunOutput, config: &MetricsConfig) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), run, config)
}

/// Same as [`write_debug_bundle`] with an explicit directory.
pub fn write_debug_bundle_in(dir: &Path, run: &RunOutput, config: &MetricsConfig) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("eer_debug_{}_{ts}.md", file_stem(run.name())));

    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(render_bundle(run, config).as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

/// Dataset name reduced to `[A-Za-z0-9_-]` so it stays a single file name.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() { "dataset".to_string() } else { stem }
}

/// Markdown body of a bundle.
pub fn render_bundle(run: &RunOutput, config: &MetricsConfig) -> String {
    let mut out = String::new();
    out.push_str("# eer debug bundle\n");
    out.push_str(&format!("- generated: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!("- dataset: {} ({})\n", run.name(), run.kind().display_name()));
    out.push_str(&format!("- source: {:?}\n", config.source));
    out.push_str(&format!(
        "- grid_points: {} | tie_break: {:?} | rate_policy: {}\n",
        config.grid_points,
        config.tie_break,
        config
            .rate_policy
            .map(|p| format!("{p:?}"))
            .unwrap_or_else(|| "estimator default".to_string())
    ));
    out.push_str(&format!(
        "- alignment: threshold={:.3} rad, run={}\n",
        config.alignment_threshold, config.alignment_run
    ));

    match run {
        RunOutput::Crossing(r) => push_crossing(&mut out, r),
        RunOutput::Rates(r) => push_rates(&mut out, r),
        RunOutput::Orientation(r) => push_orientation(&mut out, r),
    }
    out
}

fn push_crossing(out: &mut String, run: &CrossingRun) {
    let a = &run.dataset.curve_a;
    let b = &run.dataset.curve_b;

    out.push_str("\n## Input curves\n");
    out.push_str(&format!("| threshold | {} | {} | diff |\n", a.label, b.label));
    out.push_str("| - | - | - | - |\n");
    for (i, t) in run.dataset.thresholds.iter().enumerate() {
        let va = a.values.get(i).copied().unwrap_or(f64::NAN);
        let vb = b.values.get(i).copied().unwrap_or(f64::NAN);
        out.push_str(&format!("| {t:.4} | {va:.6} | {vb:.6} | {:+.6} |\n", va - vb));
    }

    let dense = &run.dense;
    let lo = run.eer.index.saturating_sub(GRID_WINDOW);
    let hi = (run.eer.index + GRID_WINDOW + 1).min(dense.grid.len());
    out.push_str(&format!("\n## Dense grid near the EER (n={})\n", dense.grid.len()));
    out.push_str(&format!("| idx | threshold | {} | {} | gap |\n", a.label, b.label));
    out.push_str("| - | - | - | - | - |\n");
    for i in lo..hi {
        let mark = if i == run.eer.index { " *" } else { "" };
        out.push_str(&format!(
            "| {i}{mark} | {:.6} | {:.6} | {:.6} | {:.6} |\n",
            dense.grid[i],
            dense.a[i],
            dense.b[i],
            (dense.a[i] - dense.b[i]).abs()
        ));
    }

    push_eer(out, &run.eer);
}

fn push_rates(out: &mut String, run: &RatesRun) {
    out.push_str("\n## Session\n");
    out.push_str(&format!(
        "- duration: {:.1}s | interval: {:.2}s | population: {:.2}\n",
        run.session.duration_secs, run.session.unlock_interval_secs, run.table.total_population
    ));

    out.push_str("\n## Rates\n");
    out.push_str("| threshold | tp | fp | fn | tn | tpr | fpr | fnr | tnr | (fpr+fnr)/2 |\n");
    out.push_str("| - | - | - | - | - | - | - | - | - | - |\n");
    for r in &run.table.rows {
        out.push_str(&format!(
            "| {:.4} | {} | {} | {} | {:.2} | {:.6} | {:.6} | {:.6} | {:.6} | {:.6} |\n",
            r.threshold, r.tp, r.fp, r.fn_, r.tn, r.tpr, r.fpr, r.fnr, r.tnr, r.error_mean
        ));
    }

    match &run.eer {
        Some(eer) => push_eer(out, eer),
        None => out.push_str("\n## EER\n- skipped: needs at least 2 thresholds\n"),
    }
}

fn push_orientation(out: &mut String, run: &OrientationRun) {
    for (raw, normalized) in run.raw.iter().zip(&run.normalized) {
        out.push_str(&format!("\n## Stream: {} (n={})\n", raw.label, raw.samples.len()));
        out.push_str("| idx | raw norm | w | x | y | z |\n");
        out.push_str("| - | - | - | - | - | - |\n");
        for (i, (r, n)) in raw.samples.iter().zip(&normalized.samples).enumerate() {
            out.push_str(&format!(
                "| {i} | {:.9} | {:.6} | {:.6} | {:.6} | {:.6} |\n",
                norm(r),
                n.w,
                n.x,
                n.y,
                n.z
            ));
        }
    }

    let Some(cmp) = &run.comparison else {
        out.push_str("\n- comparison: skipped (needs two streams with at least 2 samples)\n");
        return;
    };
    out.push_str(&format!("\n## Delta rotations: {} vs {}\n", cmp.label_a, cmp.label_b));
    out.push_str("| step | angle (rad) | within threshold |\n");
    out.push_str("| - | - | - |\n");
    for (i, angle) in cmp.delta_angles.iter().enumerate() {
        out.push_str(&format!(
            "| {}->{} | {angle:.6} | {} |\n",
            i,
            i + 1,
            if *angle <= cmp.threshold { "yes" } else { "no" }
        ));
    }
    out.push_str(&format!(
        "- longest run: {} / required {} -> matched={}\n",
        cmp.longest_run, cmp.required_run, cmp.matched
    ));
}

fn push_eer(out: &mut String, eer: &EerEstimate) {
    out.push_str("\n## EER\n");
    out.push_str(&format!("- method: {:?}\n", eer.method));
    out.push_str(&format!("- index: {}\n", eer.index));
    out.push_str(&format!("- threshold: {:.6}\n", eer.threshold));
    out.push_str(&format!("- rate: {:.6} ({:?})\n", eer.rate, eer.rate_policy));
    out.push_str(&format!(
        "- rate_a: {:.6} | rate_b: {:.6} | gap: {:.6}\n",
        eer.rate_a,
        eer.rate_b,
        eer.gap()
    ));
    out.push_str(&format!("- crossing: {}\n", eer.crossing));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_dataset;
    use crate::data::builtin;
    use crate::domain::DatasetSource;

    fn run_for(name: &str) -> (RunOutput, MetricsConfig) {
        let config = MetricsConfig::for_source(DatasetSource::Builtin(name.to_string()));
        let run = run_dataset(&builtin(name).unwrap(), &config).unwrap();
        (run, config)
    }

    #[test]
    fn crossing_bundle_shows_grid_window_around_eer() {
        let (run, config) = run_for("frr-far");
        let md = render_bundle(&run, &config);
        assert!(md.contains("## Dense grid near the EER (n=500)"));
        let marked: Vec<&str> = md.lines().filter(|l| l.contains(" * |")).collect();
        assert_eq!(marked.len(), 1);
        assert!(md.contains("- crossing: true"));
    }

    #[test]
    fn rates_bundle_lists_every_row() {
        let (run, config) = run_for("accel-stationary");
        let md = render_bundle(&run, &config);
        let rows = md.lines().filter(|l| l.starts_with("| 0.")).count();
        assert_eq!(rows, 5);
        assert!(md.contains("population: 150.00"));
    }

    #[test]
    fn orientation_bundle_lists_delta_steps() {
        let (run, config) = run_for("watch-vs-iphone");
        let md = render_bundle(&run, &config);
        assert!(md.contains("## Delta rotations: Watch vs iPhone"));
        assert!(md.contains("| 3->4 |"));
    }

    #[test]
    fn bundle_is_written_to_directory() {
        let (run, config) = run_for("accel-stationary-high");
        let dir = std::env::temp_dir().join(format!("eer_debug_test_{}", std::process::id()));
        let path = write_debug_bundle_in(&dir, &run, &config).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# eer debug bundle"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn dataset_names_cannot_leave_the_debug_dir() {
        assert_eq!(file_stem("lab/run-1"), "lab_run-1");
        assert_eq!(file_stem("../x"), "___x");
        assert_eq!(file_stem(""), "dataset");

        let (run, config) = run_for("accel-stationary");
        let RunOutput::Rates(mut rates) = run else {
            panic!("expected a rates run");
        };
        rates.name = "../lab/run-1".to_string();
        let run = RunOutput::Rates(rates);

        let dir = std::env::temp_dir().join(format!("eer_debug_names_{}", std::process::id()));
        let path = write_debug_bundle_in(&dir, &run, &config).unwrap();
        assert_eq!(path.parent(), Some(dir.as_path()));
        let file = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file.starts_with("eer_debug____lab_run-1_"));
        assert!(path.is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
