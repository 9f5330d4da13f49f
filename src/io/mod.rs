//! Input/output helpers.
//!
//! - CSV exports of indicators, history and FX (`export`)
//! - market snapshot JSON read/write (`snapshot`)

pub mod export;
pub mod snapshot;

pub use export::*;
pub use snapshot::*;
