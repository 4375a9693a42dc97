//! Read/write metrics report JSON files.
//!
//! A report is the portable record of one run: the dataset name, the inputs
//! that went into the estimate, and the results. `eer plot --report` re-renders
//! its plots without recomputing anything.
//!
//! The schema is defined by `domain::MetricsReport`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{MetricsReport, ReportBody};
use crate::error::AppError;

/// Assemble a report stamped with the current time.
pub fn build_report(dataset: &str, body: ReportBody) -> MetricsReport {
    MetricsReport {
        tool: "eer".to_string(),
        generated_at: Utc::now(),
        dataset: dataset.to_string(),
        body,
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &MetricsReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<MetricsReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: MetricsReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrientationSample, OrientationStream};

    #[test]
    fn report_reloads_with_body_kind() {
        let body = ReportBody::Orientation {
            streams: vec![OrientationStream {
                label: "Watch".to_string(),
                samples: vec![OrientationSample::new(1.0, 0.0, 0.0, 0.0)],
            }],
            comparison: None,
        };
        let report = build_report("adhoc", body);
        let path = std::env::temp_dir().join(format!("eer-report-{}.json", std::process::id()));

        write_report_json(&path, &report).unwrap();
        let back = read_report_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, "eer");
        assert_eq!(back.dataset, "adhoc");
        assert_eq!(back.generated_at, report.generated_at);
        match back.body {
            ReportBody::Orientation { streams, comparison } => {
                assert_eq!(streams[0].label, "Watch");
                assert!(comparison.is_none());
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
