//! Export per-threshold rates to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{EerEstimate, RateTable};
use crate::error::AppError;

/// Write per-threshold rates to a CSV file.
///
/// The `eer` column marks the row chosen by the direct EER estimate.
pub fn write_rates_csv(path: &Path, table: &RateTable, eer: Option<&EerEstimate>) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_rates(&mut file, table, eer)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_rates(out: &mut impl Write, table: &RateTable, eer: Option<&EerEstimate>) -> std::io::Result<()> {
    writeln!(
        out,
        "threshold,tp,fp,fn,tn,tpr,fpr,fnr,tnr,error_mean,total_population,eer"
    )?;

    for (i, r) in table.rows.iter().enumerate() {
        let marked = eer.is_some_and(|e| e.index == i);
        writeln!(
            out,
            "{},{},{},{},{:.4},{:.10},{:.10},{:.10},{:.10},{:.10},{:.4},{}",
            r.threshold,
            r.tp,
            r.fp,
            r.fn_,
            r.tn,
            r.tpr,
            r.fpr,
            r.fnr,
            r.tnr,
            r.error_mean,
            table.total_population,
            if marked { "1" } else { "" },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfusionRow;
    use crate::eer::{EerOptions, estimate_direct};
    use crate::rates::convert_counts;

    #[test]
    fn csv_marks_eer_row() {
        let rows = [ConfusionRow::new(0.60, 7, 2, 1), ConfusionRow::new(0.65, 5, 3, 1)];
        let table = convert_counts(&rows, 150.0).unwrap();
        let eer = estimate_direct(&table.thresholds(), &table.fpr(), &table.fnr(), EerOptions::default()).unwrap();

        let mut buf = Vec::new();
        write_rates(&mut buf, &table, Some(&eer)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("threshold,tp,fp,fn,tn"));
        assert!(lines[1].starts_with("0.6,7,2,1,140.0000,0.8750000000,"));
        assert!(lines[1].ends_with(",150.0000,1"));
        assert!(lines[2].ends_with(",150.0000,"));
    }
}
