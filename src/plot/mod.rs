//! Plot preparation and terminal rendering.
//!
//! `series` turns computed metrics into renderer-neutral `ChartData`; `ascii`
//! draws it into a fixed character grid for stdout. The TUI renders the same
//! `ChartData` with Plotters.

pub mod ascii;
pub mod series;

pub use ascii::*;
pub use series::*;
