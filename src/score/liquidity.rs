//! Liquidity score: balance-sheet size and bank reserves.

use crate::domain::{ScoreKind, ScoreOutcome, Series, WeightPair};
use crate::score::{Orientation, combine, component};

/// Trailing window (days) for both liquidity components.
pub const LIQUIDITY_WINDOW: usize = 90;

/// Score how ample dollar liquidity is relative to its own history.
///
/// Both the Fed balance sheet (WALCL) and reserve balances (WRESBAL) are
/// normalized over their full aligned history and averaged over the last 90
/// days, which smooths weekly reporting noise while tracking the regime.
pub fn liquidity_score(walcl: &Series, reserves: &Series, weights: WeightPair) -> ScoreOutcome {
    let kind = ScoreKind::Liquidity;
    let walcl_n = component(kind, "fed total assets", walcl, LIQUIDITY_WINDOW, Orientation::Direct)?;
    let reserves_n = component(kind, "reserve balances", reserves, LIQUIDITY_WINDOW, Orientation::Direct)?;
    Ok(combine(kind, weights, walcl_n, reserves_n))
}
