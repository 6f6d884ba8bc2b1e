//! Run configuration: series identifiers, lookback, weights, output location,
//! retry and chart settings.
//!
//! Loaded from a JSON file. Every field has a default, so a partial file (or
//! no file at all) yields a runnable configuration.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::chart::RenderConfig;
use crate::data::{RetryPolicy, SeriesRequest};
use crate::domain::{SeriesKey, WeightPair};
use crate::error::AppError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How many calendar days of history to request.
    pub start_days_ago: u32,
    pub output_dir: PathBuf,
    pub series: SeriesConfig,
    pub scoring: ScoringConfig,
    pub retry: RetryPolicy,
    pub chart: RenderConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            start_days_ago: 1200,
            output_dir: PathBuf::from("outputs"),
            series: SeriesConfig::default(),
            scoring: ScoringConfig::default(),
            retry: RetryPolicy::default(),
            chart: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub fred: FredSeriesIds,
    pub market: MarketTickers,
}

/// FRED series identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FredSeriesIds {
    pub walcl: String,
    pub wresbal: String,
    pub dgs2: String,
    pub dgs10: String,
}

impl Default for FredSeriesIds {
    fn default() -> Self {
        Self {
            walcl: "WALCL".to_string(),
            wresbal: "WRESBAL".to_string(),
            dgs2: "DGS2".to_string(),
            dgs10: "DGS10".to_string(),
        }
    }
}

/// Market tickers, each with optional fallback symbols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketTickers {
    pub dxy: TickerSpec,
    pub hyg: TickerSpec,
    pub ief: TickerSpec,
    pub copper: TickerSpec,
    pub wti: TickerSpec,
}

impl Default for MarketTickers {
    fn default() -> Self {
        Self {
            dxy: TickerSpec::new("DX-Y.NYB", &["DX=F"]),
            hyg: TickerSpec::new("HYG", &[]),
            ief: TickerSpec::new("IEF", &[]),
            copper: TickerSpec::new("HG=F", &[]),
            wti: TickerSpec::new("CL=F", &[]),
        }
    }
}

/// A ticker plus alternates tried in order when it yields nothing.
///
/// Accepts either `"HYG"` or `{"symbol": "DX-Y.NYB", "alternates": ["DX=F"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TickerRepr")]
pub struct TickerSpec {
    pub symbol: String,
    pub alternates: Vec<String>,
}

impl TickerSpec {
    pub fn new(symbol: &str, alternates: &[&str]) -> Self {
        Self {
            symbol: symbol.to_string(),
            alternates: alternates.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TickerRepr {
    Symbol(String),
    Full {
        symbol: String,
        #[serde(default)]
        alternates: Vec<String>,
    },
}

impl From<TickerRepr> for TickerSpec {
    fn from(repr: TickerRepr) -> Self {
        match repr {
            TickerRepr::Symbol(symbol) => Self {
                symbol,
                alternates: Vec::new(),
            },
            TickerRepr::Full { symbol, alternates } => Self { symbol, alternates },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub liquidity: LiquidityWeights,
    pub risk: RiskWeights,
    pub macro_weakness: MacroWeaknessWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityWeights {
    pub walcl_weight: f64,
    pub reserves_weight: f64,
}

impl Default for LiquidityWeights {
    fn default() -> Self {
        Self {
            walcl_weight: 0.45,
            reserves_weight: 0.55,
        }
    }
}

impl LiquidityWeights {
    pub fn pair(&self) -> WeightPair {
        WeightPair::new(self.walcl_weight, self.reserves_weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub hyg_ief_weight: f64,
    pub dxy_weight: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            hyg_ief_weight: 0.6,
            dxy_weight: 0.4,
        }
    }
}

impl RiskWeights {
    pub fn pair(&self) -> WeightPair {
        WeightPair::new(self.hyg_ief_weight, self.dxy_weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroWeaknessWeights {
    pub curve_weight: f64,
    pub copper_wti_weight: f64,
}

impl Default for MacroWeaknessWeights {
    fn default() -> Self {
        Self {
            curve_weight: 0.6,
            copper_wti_weight: 0.4,
        }
    }
}

impl MacroWeaknessWeights {
    pub fn pair(&self) -> WeightPair {
        WeightPair::new(self.curve_weight, self.copper_wti_weight)
    }
}

impl DashboardConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `config.json` in the working
    /// directory is used if present, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read(fallback)?
                } else {
                    log::info!("no {DEFAULT_CONFIG_FILE} found; using built-in defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::config(format!("Failed to open config '{}': {e}", path.display())))?;
        let config: Self = serde_json::from_reader(file)
            .map_err(|e| AppError::config(format!("Invalid config '{}': {e}", path.display())))?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.start_days_ago == 0 {
            return Err(AppError::config("start_days_ago must be > 0."));
        }
        for (name, pair) in [
            ("liquidity", self.scoring.liquidity.pair()),
            ("risk", self.scoring.risk.pair()),
            ("macro_weakness", self.scoring.macro_weakness.pair()),
        ] {
            if !pair.is_finite() {
                return Err(AppError::config(format!("Weights for '{name}' must be finite.")));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(AppError::config("retry.max_attempts must be >= 1."));
        }
        if self.retry.timeout_secs == 0 {
            return Err(AppError::config("retry.timeout_secs must be > 0."));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(AppError::config("chart width and height must be > 0."));
        }
        for request in self.series.requests() {
            if request.codes().any(|c| c.trim().is_empty()) {
                return Err(AppError::config(format!(
                    "Empty identifier configured for {}.",
                    request.key.name()
                )));
            }
        }
        Ok(())
    }

    /// First date to request: `today - start_days_ago`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.start_days_ago)))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.output_dir.join(crate::chart::CHARTS_DIR)
    }
}

impl SeriesConfig {
    /// One retrieval request per input, in `SeriesKey::ALL` order.
    pub fn requests(&self) -> Vec<SeriesRequest> {
        SeriesKey::ALL.into_iter().map(|key| self.request(key)).collect()
    }

    pub fn request(&self, key: SeriesKey) -> SeriesRequest {
        let (code, alternates) = match key {
            SeriesKey::Walcl => (self.fred.walcl.clone(), Vec::new()),
            SeriesKey::Wresbal => (self.fred.wresbal.clone(), Vec::new()),
            SeriesKey::Dgs2 => (self.fred.dgs2.clone(), Vec::new()),
            SeriesKey::Dgs10 => (self.fred.dgs10.clone(), Vec::new()),
            SeriesKey::Dxy => self.market.dxy.split(),
            SeriesKey::Hyg => self.market.hyg.split(),
            SeriesKey::Ief => self.market.ief.split(),
            SeriesKey::Copper => self.market.copper.split(),
            SeriesKey::Wti => self.market.wti.split(),
        };
        SeriesRequest { key, code, alternates }
    }
}

impl TickerSpec {
    fn split(&self) -> (String, Vec<String>) {
        (self.symbol.clone(), self.alternates.clone())
    }
}
