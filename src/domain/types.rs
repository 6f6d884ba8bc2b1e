//! Shared domain types: series keys, score kinds and score results.

use serde::{Deserialize, Serialize};

use crate::domain::series::{Provider, Series};

/// The nine raw inputs the dashboard pulls from its two providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeriesKey {
    /// Fed total assets.
    Walcl,
    /// Reserve balances with Federal Reserve Banks.
    Wresbal,
    /// 2-year Treasury constant maturity yield.
    Dgs2,
    /// 10-year Treasury constant maturity yield.
    Dgs10,
    /// US dollar index.
    Dxy,
    /// High-yield corporate bond ETF.
    Hyg,
    /// 7-10 year Treasury ETF.
    Ief,
    /// Copper futures.
    Copper,
    /// WTI crude futures.
    Wti,
}

impl SeriesKey {
    pub const ALL: [SeriesKey; 9] = [
        SeriesKey::Walcl,
        SeriesKey::Wresbal,
        SeriesKey::Dgs2,
        SeriesKey::Dgs10,
        SeriesKey::Dxy,
        SeriesKey::Hyg,
        SeriesKey::Ief,
        SeriesKey::Copper,
        SeriesKey::Wti,
    ];

    pub fn provider(self) -> Provider {
        match self {
            SeriesKey::Walcl | SeriesKey::Wresbal | SeriesKey::Dgs2 | SeriesKey::Dgs10 => Provider::Fred,
            SeriesKey::Dxy | SeriesKey::Hyg | SeriesKey::Ief | SeriesKey::Copper | SeriesKey::Wti => {
                Provider::Yahoo
            }
        }
    }

    /// Short upper-case name used in logs and CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            SeriesKey::Walcl => "WALCL",
            SeriesKey::Wresbal => "WRESBAL",
            SeriesKey::Dgs2 => "DGS2",
            SeriesKey::Dgs10 => "DGS10",
            SeriesKey::Dxy => "DXY",
            SeriesKey::Hyg => "HYG",
            SeriesKey::Ief => "IEF",
            SeriesKey::Copper => "COPPER",
            SeriesKey::Wti => "WTI",
        }
    }

    /// Human-readable label used for charts and summaries.
    pub fn label(self) -> &'static str {
        match self {
            SeriesKey::Walcl => "Fed Total Assets (WALCL)",
            SeriesKey::Wresbal => "Reserve Balances (WRESBAL)",
            SeriesKey::Dgs2 => "UST 2Y Yield (DGS2)",
            SeriesKey::Dgs10 => "UST 10Y Yield (DGS10)",
            SeriesKey::Dxy => "DXY (Dollar Index)",
            SeriesKey::Hyg => "High Yield Corporate Bond ETF (HYG)",
            SeriesKey::Ief => "7-10Y Treasury ETF (IEF)",
            SeriesKey::Copper => "Copper Futures",
            SeriesKey::Wti => "WTI Crude Futures",
        }
    }
}

/// One value per input key. Used for raw and aligned inputs alike so every
/// key is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroSeries {
    pub walcl: Series,
    pub wresbal: Series,
    pub dgs2: Series,
    pub dgs10: Series,
    pub dxy: Series,
    pub hyg: Series,
    pub ief: Series,
    pub copper: Series,
    pub wti: Series,
}

impl MacroSeries {
    /// Build by calling `f` once per key, in `SeriesKey::ALL` order.
    pub fn from_fn(mut f: impl FnMut(SeriesKey) -> Series) -> Self {
        Self {
            walcl: f(SeriesKey::Walcl),
            wresbal: f(SeriesKey::Wresbal),
            dgs2: f(SeriesKey::Dgs2),
            dgs10: f(SeriesKey::Dgs10),
            dxy: f(SeriesKey::Dxy),
            hyg: f(SeriesKey::Hyg),
            ief: f(SeriesKey::Ief),
            copper: f(SeriesKey::Copper),
            wti: f(SeriesKey::Wti),
        }
    }

    pub fn get(&self, key: SeriesKey) -> &Series {
        match key {
            SeriesKey::Walcl => &self.walcl,
            SeriesKey::Wresbal => &self.wresbal,
            SeriesKey::Dgs2 => &self.dgs2,
            SeriesKey::Dgs10 => &self.dgs10,
            SeriesKey::Dxy => &self.dxy,
            SeriesKey::Hyg => &self.hyg,
            SeriesKey::Ief => &self.ief,
            SeriesKey::Copper => &self.copper,
            SeriesKey::Wti => &self.wti,
        }
    }

    /// `(key, series)` pairs in `SeriesKey::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (SeriesKey, &Series)> {
        SeriesKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Number of inputs holding at least one defined value.
    pub fn count_with_data(&self) -> usize {
        self.iter().filter(|(_, s)| s.has_data()).count()
    }
}

/// The three composite indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreKind {
    Liquidity,
    Risk,
    MacroWeakness,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 3] = [ScoreKind::Liquidity, ScoreKind::Risk, ScoreKind::MacroWeakness];

    pub fn display_name(self) -> &'static str {
        match self {
            ScoreKind::Liquidity => "LiquidityScore",
            ScoreKind::Risk => "RiskScore",
            ScoreKind::MacroWeakness => "MacroWeaknessScore",
        }
    }
}

/// Linear-combination coefficients for a score's two components.
///
/// Not required to sum to 1; applied to already unit-scaled components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightPair {
    pub a: f64,
    pub b: f64,
}

impl WeightPair {
    pub const fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }
}

/// One named score in `[0, 100]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub kind: ScoreKind,
    pub value: f64,
    pub weights: WeightPair,
    /// Unit-scaled component values `(a, b)` before weighting.
    pub components: (f64, f64),
}

/// Result of scoring: a value, or a typed reason it is undefined.
pub type ScoreOutcome = Result<CompositeScore, crate::error::ScoreError>;

/// The three scores of one run, in report order.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    pub liquidity: ScoreOutcome,
    pub risk: ScoreOutcome,
    pub macro_weakness: ScoreOutcome,
}

impl ScoreBoard {
    pub fn iter(&self) -> impl Iterator<Item = (ScoreKind, &ScoreOutcome)> {
        [
            (ScoreKind::Liquidity, &self.liquidity),
            (ScoreKind::Risk, &self.risk),
            (ScoreKind::MacroWeakness, &self.macro_weakness),
        ]
        .into_iter()
    }
}
