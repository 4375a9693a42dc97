//! Dataset sources: built-in tables and JSON dataset files.

pub mod builtin;

pub use builtin::*;

use crate::domain::{Dataset, DatasetSource};
use crate::error::AppError;

/// Resolve a dataset source into a dataset.
pub fn load_dataset(source: &DatasetSource) -> Result<Dataset, AppError> {
    match source {
        DatasetSource::Builtin(name) => Ok(builtin(name)?),
        DatasetSource::File(path) => crate::io::read_dataset_json(path),
    }
}
