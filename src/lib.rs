//! `regime-dash` library crate.
//!
//! The binary (`regime`) is a thin wrapper around this library so that:
//!
//! - the scoring core is testable without network or processes
//! - providers sit behind the `SeriesSource` trait and can be faked
//! - rendering and reporting stay separate from the math

pub mod align;
pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod score;
