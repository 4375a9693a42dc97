//! Numeric building blocks: uniform grids, linear interpolation, gap search.

pub mod grid;
pub mod interp;
pub mod search;

pub use grid::*;
pub use interp::*;
pub use search::*;
