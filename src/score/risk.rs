//! Risk-appetite score: credit spread momentum and dollar weakness.

use crate::domain::{ScoreKind, ScoreOutcome, Series, WeightPair};
use crate::error::SeriesError;
use crate::math::{difference, pct_change};
use crate::score::{Orientation, combine, component};

/// Trailing window (days) for both risk components.
pub const RISK_WINDOW: usize = 60;
/// Lookback (positions) of the percent changes behind the credit spread.
pub const SPREAD_PERIODS: usize = 20;

/// HYG 20-period percent change minus IEF 20-period percent change.
///
/// Undefined wherever either leg lacks a value 20 positions back.
pub fn credit_spread(hyg: &Series, ief: &Series) -> Result<Series, SeriesError> {
    let hyg_pc = pct_change(hyg, SPREAD_PERIODS, "HYG 20D change");
    let ief_pc = pct_change(ief, SPREAD_PERIODS, "IEF 20D change");
    difference(&hyg_pc, &ief_pc, "HYG-IEF 20D Spread")
}

/// Score risk appetite.
///
/// High-yield outperforming Treasuries raises the spread component; a weak
/// dollar raises the dollar component (`1 -` its normalized trailing mean).
pub fn risk_score(hyg: &Series, ief: &Series, dxy: &Series, weights: WeightPair) -> ScoreOutcome {
    let kind = ScoreKind::Risk;
    let spread = credit_spread(hyg, ief)?;
    let spread_n = component(kind, "credit spread", &spread, RISK_WINDOW, Orientation::Direct)?;
    let dollar_n = component(kind, "dollar weakness", dxy, RISK_WINDOW, Orientation::Inverted)?;
    Ok(combine(kind, weights, spread_n, dollar_n))
}
