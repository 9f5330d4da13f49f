//! Reporting utilities: formatted terminal output for indicators, FX and insights.

pub mod format;

pub use format::*;
