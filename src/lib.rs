//! `eer-metrics` library crate.
//!
//! The binary (`eer`) is a thin wrapper around this library so that:
//!
//! - estimators and conversions are testable without spawning processes
//! - the CLI and the TUI share one pipeline

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod eer;
pub mod error;
pub mod io;
pub mod math;
pub mod orientation;
pub mod plot;
pub mod rates;
pub mod report;
pub mod tui;
