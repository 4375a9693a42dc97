//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - estimator knobs (`TieBreak`, `RatePolicy`)
//! - inputs (`RateCurve`, `ConfusionRow`, `SessionModel`, `OrientationSample`, `Dataset`)
//! - outputs (`EerEstimate`, `RateTable`, `StreamComparison`, `MetricsReport`)

pub mod types;

pub use types::*;
