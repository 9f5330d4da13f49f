//! Mathematical utilities: percentage changes and dispersion.

pub mod stats;

pub use stats::*;
