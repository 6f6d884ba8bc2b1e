//! Composite regime scores.
//!
//! Every score follows the same recipe:
//!
//! - derive one or two component series from aligned inputs
//! - min-max normalize each over its full history
//! - take the trailing-window mean (optionally inverted as `1 - mean`)
//! - combine as `clip(100 * (w_a * a + w_b * b), 0, 100)`
//!
//! All functions are pure and expect inputs already aligned (see `crate::align`).

pub mod liquidity;
pub mod macro_weakness;
pub mod risk;

pub use liquidity::*;
pub use macro_weakness::*;
pub use risk::*;

use crate::domain::{CompositeScore, ScoreKind, Series, WeightPair};
use crate::error::ScoreError;
use crate::math::{normalize, trailing_mean};

/// Whether a component is read as-is or as `1 - mean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Orientation {
    Direct,
    Inverted,
}

/// Normalized trailing-window mean of one component.
pub(crate) fn component(
    kind: ScoreKind,
    name: &'static str,
    series: &Series,
    window: usize,
    orientation: Orientation,
) -> Result<f64, ScoreError> {
    let mean = trailing_mean(&normalize(series), window).ok_or(ScoreError::UndefinedComponent {
        score: kind.display_name(),
        component: name,
        window,
    })?;

    Ok(match orientation {
        Orientation::Direct => mean,
        Orientation::Inverted => 1.0 - mean,
    })
}

/// Weight, scale to 0..100 and clip.
pub(crate) fn combine(kind: ScoreKind, weights: WeightPair, a: f64, b: f64) -> CompositeScore {
    let raw = 100.0 * (weights.a * a + weights.b * b);
    CompositeScore {
        kind,
        value: raw.clamp(0.0, 100.0),
        weights,
        components: (a, b),
    }
}
