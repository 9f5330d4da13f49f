//! `macro-pulse` library crate.
//!
//! The binary (`pulse`) is a thin wrapper around this library so that:
//!
//! - the analytics core (deltas, trends, insight rules) is testable without I/O
//! - fetching, presentation and export stay swappable around that core

pub mod analytics;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod insights;
pub mod io;
pub mod math;
pub mod report;
