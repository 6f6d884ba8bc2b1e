//! Macro-weakness score: yield-curve inversion and cyclical commodities.

use crate::domain::{ScoreKind, ScoreOutcome, Series, WeightPair};
use crate::error::SeriesError;
use crate::math::{difference, ratio};
use crate::score::{Orientation, combine, component};

/// Trailing window (days) for both macro components.
pub const MACRO_WINDOW: usize = 90;

/// 10Y minus 2Y Treasury yield.
pub fn curve_slope(dgs2: &Series, dgs10: &Series) -> Result<Series, SeriesError> {
    difference(dgs10, dgs2, "UST 10Y-2Y (Curve)")
}

/// Copper price over WTI price; a zero denominator gives a gap.
pub fn copper_wti_ratio(copper: &Series, wti: &Series) -> Result<Series, SeriesError> {
    ratio(copper, wti, "Copper / WTI")
}

/// Score macro weakness.
///
/// Both components are inverted: a deeper curve inversion and a weaker
/// copper/oil ratio (relative to their own history) push the score up.
pub fn macro_weakness_score(
    dgs2: &Series,
    dgs10: &Series,
    copper: &Series,
    wti: &Series,
    weights: WeightPair,
) -> ScoreOutcome {
    let kind = ScoreKind::MacroWeakness;
    let curve = curve_slope(dgs2, dgs10)?;
    let curve_n = component(kind, "yield curve", &curve, MACRO_WINDOW, Orientation::Inverted)?;
    let cw = copper_wti_ratio(copper, wti)?;
    let cw_n = component(kind, "copper/wti ratio", &cw, MACRO_WINDOW, Orientation::Inverted)?;
    Ok(combine(kind, weights, curve_n, cw_n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::testutil::{EXTREME_WEIGHTS, daily};
    use approx::assert_relative_eq;

    #[test]
    fn constant_inversion_maxes_the_curve_component() {
        // Quarter-point steps keep the 50bp gap exact in binary floating point.
        let dgs10 = daily("dgs10", 100, |i| 4.0 + (i % 4) as f64 * 0.25);
        let dgs2 = dgs10.map_values("dgs2", |v| Some(v + 0.5));
        // Copper ramps up against flat oil: ratio normalizes to i / 99.
        let copper = daily("copper", 100, |i| 4.0 + i as f64 * 0.01);
        let wti = daily("wti", 100, |_| 80.0);

        let score = macro_weakness_score(&dgs2, &dgs10, &copper, &wti, WeightPair::new(0.6, 0.4)).unwrap();

        // Constant slope normalizes to 0, inverted to 1.
        assert_relative_eq!(score.components.0, 1.0, epsilon = 1e-12);
        // Last 90 of indices 0..=99: mean index 54.5.
        let cw = 1.0 - 54.5 / 99.0;
        assert_relative_eq!(score.components.1, cw, epsilon = 1e-9);
        assert_relative_eq!(score.value, 100.0 * (0.6 + 0.4 * cw), epsilon = 1e-7);
    }

    #[test]
    fn fully_flat_inputs_score_the_weight_sum() {
        let dgs10 = daily("dgs10", 100, |_| 4.0);
        let dgs2 = daily("dgs2", 100, |_| 4.5);
        let copper = daily("copper", 100, |_| 4.2);
        let wti = daily("wti", 100, |_| 70.0);
        let score = macro_weakness_score(&dgs2, &dgs10, &copper, &wti, WeightPair::new(0.3, 0.2)).unwrap();
        assert_relative_eq!(score.value, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_oil_price_is_a_gap_not_an_infinity() {
        let copper = daily("copper", 5, |_| 4.0);
        let wti = daily("wti", 5, |i| if i == 2 { 0.0 } else { 80.0 });
        let r = copper_wti_ratio(&copper, &wti).unwrap();
        let vals: Vec<Option<f64>> = r.values().collect();
        assert_eq!(vals[2], None);
        assert!(vals.iter().flatten().all(|v| v.is_finite()));
        assert_eq!(r.valid_count(), 4);
    }

    #[test]
    fn stays_in_range_for_extreme_weights() {
        let dgs10 = daily("dgs10", 150, |i| 4.0 + i as f64 * 0.001);
        let dgs2 = daily("dgs2", 150, |i| 4.8 - i as f64 * 0.004);
        let copper = daily("copper", 150, |i| 4.0 + (i as f64 * 0.1).sin() * 0.2);
        let wti = daily("wti", 150, |i| 70.0 + (i as f64 * 0.03).cos() * 5.0);
        for (a, b) in EXTREME_WEIGHTS {
            let score = macro_weakness_score(&dgs2, &dgs10, &copper, &wti, WeightPair::new(a, b)).unwrap();
            assert!((0.0..=100.0).contains(&score.value), "weights ({a}, {b}) gave {}", score.value);
        }
    }
}
