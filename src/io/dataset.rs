//! JSON dataset files.
//!
//! A dataset file holds one tagged table, the same schema the built-ins use:
//!
//! ```json
//! {"kind": "confusion", "name": "lab-run", "session": {"duration_secs": 300, "unlock_interval_secs": 2},
//!  "rows": [{"threshold": 0.6, "tp": 7, "fp": 2, "fn": 1}]}
//! ```
//!
//! `kind` is one of `curves`, `confusion`, `orientation` (see `domain::Dataset`).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::Dataset;
use crate::error::AppError;

/// Read a dataset JSON file.
pub fn read_dataset_json(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open dataset '{}': {e}", path.display())))?;
    let dataset: Dataset = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid dataset JSON '{}': {e}", path.display())))?;
    Ok(dataset)
}

/// Write a dataset JSON file (used to dump a built-in as a template).
pub fn write_dataset_json(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create dataset '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, dataset)
        .map_err(|e| AppError::new(2, format!("Failed to write dataset JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_survives_a_file_round_trip() {
        let dataset = crate::data::builtin("frr-far").unwrap();
        let path = std::env::temp_dir().join(format!("eer-dataset-{}.json", std::process::id()));

        write_dataset_json(&path, &dataset).unwrap();
        let back = read_dataset_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back, dataset);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let err = read_dataset_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
