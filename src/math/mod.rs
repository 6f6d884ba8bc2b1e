//! Numeric building blocks: min-max normalization, gap filling and the
//! series transforms the scores are built from.

pub mod interp;
pub mod normalize;
pub mod transform;

pub use interp::*;
pub use normalize::*;
pub use transform::*;
