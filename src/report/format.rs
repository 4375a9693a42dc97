//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the estimators stay clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{
    CurvesDataset, Dataset, EerEstimate, EerMethod, OrientationStream, RateTable, SessionModel,
    StreamComparison,
};

/// Summary for the interpolated estimator on a curve pair.
pub fn format_crossing_summary(dataset: &CurvesDataset, eer: &EerEstimate) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== eer - {} vs {} ({}) ===\n", dataset.curve_a.label, dataset.curve_b.label, dataset.name));
    if !dataset.description.is_empty() {
        out.push_str(&format!("{}\n", dataset.description));
    }
    out.push_str(&format!(
        "Thresholds: n={} | range=[{:.3}, {:.3}]\n",
        dataset.thresholds.len(),
        dataset.thresholds.first().copied().unwrap_or(f64::NAN),
        dataset.thresholds.last().copied().unwrap_or(f64::NAN),
    ));
    out.push_str(&format!("{}: {}\n", dataset.curve_a.label, fmt_vec(&dataset.curve_a.values)));
    out.push_str(&format!("{}: {}\n", dataset.curve_b.label, fmt_vec(&dataset.curve_b.values)));
    out.push('\n');
    out.push_str(&format_eer(eer, &dataset.curve_a.label, &dataset.curve_b.label));

    out
}

/// Per-threshold metrics table followed by the direct EER estimate.
pub fn format_rate_report(name: &str, session: &SessionModel, table: &RateTable, eer: Option<&EerEstimate>) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== eer - confusion rates ({name}) ===\n"));
    out.push_str(&format!(
        "Population: {:.1} unlocks ({:.0}s session / {:.2}s interval, assumed)\n\n",
        table.total_population, session.duration_secs, session.unlock_interval_secs
    ));

    out.push_str(
        format!(
            "{:>9} {:>4} {:>4} {:>4} {:>8} {:>7} {:>7} {:>7} {:>7} {:>7}",
            "threshold", "TP", "FP", "FN", "TN", "TPR", "FPR", "FNR", "TNR", "EER"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<9} {:-<4} {:-<4} {:-<4} {:-<8} {:-<7} {:-<7} {:-<7} {:-<7} {:-<7}",
            "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, r) in table.rows.iter().enumerate() {
        let mark = if eer.is_some_and(|e| e.index == i) { " *" } else { "" };
        out.push_str(&format!(
            "{:>9.3} {:>4} {:>4} {:>4} {:>8.2} {:>7.4} {:>7.4} {:>7.4} {:>7.4} {:>7.4}{mark}\n",
            r.threshold, r.tp, r.fp, r.fn_, r.tn, r.tpr, r.fpr, r.fnr, r.tnr, r.error_mean,
        ));
    }
    out.push('\n');
    match eer {
        Some(eer) => out.push_str(&format_eer(eer, "FPR", "FNR")),
        None => out.push_str("EER: skipped (needs at least 2 thresholds)\n"),
    }

    out
}

/// Normalized streams side by side plus the delta-rotation comparison.
pub fn format_orientation_report(
    name: &str,
    streams: &[OrientationStream],
    comparison: Option<&StreamComparison>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== eer - normalized orientation ({name}) ===\n"));
    for stream in streams {
        out.push_str(&format!("\n{} (n={}):\n", stream.label, stream.samples.len()));
        out.push_str(&format!("{:>5} {:>10} {:>10} {:>10} {:>10}\n", "idx", "w", "x", "y", "z"));
        for (i, s) in stream.samples.iter().enumerate() {
            out.push_str(&format!(
                "{:>5} {:>10.6} {:>10.6} {:>10.6} {:>10.6}\n",
                i, s.w, s.x, s.y, s.z
            ));
        }
    }

    if let Some(cmp) = comparison {
        out.push_str(&format!("\nMotion agreement {} vs {}:\n", cmp.label_a, cmp.label_b));
        out.push_str(&format!("- paired samples: {}\n", cmp.pairs));
        out.push_str(&format!("- delta angles (rad): {}\n", fmt_vec(&cmp.delta_angles)));
        out.push_str(&format!(
            "- longest run within {:.3} rad: {} (need {})\n",
            cmp.threshold, cmp.longest_run, cmp.required_run
        ));
        out.push_str(&format!("- matched: {}\n", if cmp.matched { "yes" } else { "no" }));
    }

    out
}

/// One line per built-in dataset.
pub fn format_dataset_list(datasets: &[Dataset]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<24} {:<12} {}", "name", "kind", "description").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<24} {:-<12} {:-<11}", "", "", "").trim_end());
    out.push('\n');
    for d in datasets {
        out.push_str(
            format!(
                "{:<24} {:<12} {}",
                truncate(d.name(), 24),
                d.kind().display_name(),
                d.description()
            )
            .trim_end(),
        );
        out.push('\n');
    }
    out
}

/// EER block shared by both estimators.
pub fn format_eer(eer: &EerEstimate, label_a: &str, label_b: &str) -> String {
    let mut out = String::new();
    let method = match eer.method {
        EerMethod::Interpolated { grid_points } => format!("interpolated, {grid_points}-point grid"),
        EerMethod::Direct => "direct, sampled thresholds".to_string(),
    };
    out.push_str(&format!("EER ({method}):\n"));
    out.push_str(&format!("- threshold: {:.4}\n", eer.threshold));
    out.push_str(&format!("- rate: {:.4} ({:?})\n", eer.rate, eer.rate_policy));
    out.push_str(&format!(
        "- {label_a}={:.4} {label_b}={:.4} gap={:.4} (index {})\n",
        eer.rate_a,
        eer.rate_b,
        eer.gap(),
        eer.index
    ));
    if eer.crossing {
        out.push_str("- curves cross within the sampled range\n");
    } else {
        out.push_str("- curves do not cross; closest approach reported\n");
    }
    out
}

/// Compact one-line form used in status bars and debug output.
pub fn eer_one_liner(eer: &EerEstimate) -> String {
    format!(
        "EER threshold={:.2} rate={:.2}{}",
        eer.threshold,
        eer.rate,
        if eer.crossing { "" } else { " (no crossing)" }
    )
}

pub fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfusionRow;
    use crate::eer::{EerOptions, estimate_direct};
    use crate::rates::convert_counts;

    #[test]
    fn rate_report_marks_eer_row() {
        let rows = [
            ConfusionRow::new(0.60, 7, 2, 1),
            ConfusionRow::new(0.65, 5, 3, 1),
            ConfusionRow::new(0.70, 3, 4, 1),
        ];
        let table = convert_counts(&rows, 150.0).unwrap();
        let eer = estimate_direct(&table.thresholds(), &table.fpr(), &table.fnr(), EerOptions::default()).unwrap();
        let txt = format_rate_report("adhoc", &SessionModel::default(), &table, Some(&eer));

        let marked: Vec<&str> = txt.lines().filter(|l| l.ends_with(" *")).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].trim_start().starts_with("0.600"));
        assert!(txt.contains("Population: 150.0 unlocks"));
        assert!(txt.contains("- threshold: 0.6000"));
    }

    #[test]
    fn rate_report_without_eer_notes_skip() {
        let table = convert_counts(&[ConfusionRow::new(0.60, 7, 2, 1)], 150.0).unwrap();
        let txt = format_rate_report("adhoc", &SessionModel::default(), &table, None);
        assert!(txt.contains("EER: skipped (needs at least 2 thresholds)"));
        assert!(!txt.lines().any(|l| l.ends_with(" *")));
        assert!(txt.contains("0.600"));
    }

    #[test]
    fn one_liner_flags_missing_crossing() {
        let eer = estimate_direct(&[0.0, 1.0], &[0.2, 0.6], &[0.5, 0.7], EerOptions::default()).unwrap();
        assert!(eer_one_liner(&eer).ends_with("(no crossing)"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
