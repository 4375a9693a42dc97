//! Input/output helpers.
//!
//! - JSON dataset files (`dataset`)
//! - per-threshold rate exports (CSV) (`export`)
//! - metrics report JSON read/write (`report`)

pub mod dataset;
pub mod export;
pub mod report;

pub use dataset::*;
pub use export::*;
pub use report::*;
