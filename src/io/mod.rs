//! File exports.
//!
//! - aligned input series as CSV (`export`)

pub mod export;

pub use export::*;
