//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - series data (`ObservationPoint`, `Series`, `MarketSnapshot`)
//! - closed vocabularies (`Unit`, `Trend`, `IndicatorId`, `Currency`)
//! - per-run outputs (`DeltaResult`, `IndicatorResult`, `FxResult`, `Insight`)
//! - run configuration (`RunConfig`, `InsufficientDataPolicy`)

pub mod types;

pub use types::*;
