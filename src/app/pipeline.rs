//! Shared dashboard pipeline used by both `regime run` and `regime scores`.
//!
//! fetch -> align -> score -> (charts + report)
//!
//! Each stage is a separate function so front-ends can stop early and tests
//! can drive the whole flow with in-memory sources.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;

use crate::align::{AlignedSet, align_until};
use crate::chart::{DashboardChart, render_line_chart};
use crate::config::DashboardConfig;
use crate::data::{SeriesSource, fetch_or_empty};
use crate::domain::{MacroSeries, Provider, ScoreBoard, Series};
use crate::error::{AlignError, AppError};
use crate::report::{dashboard_sections, write_dashboard};
use crate::score::{copper_wti_ratio, credit_spread, curve_slope, liquidity_score, macro_weakness_score, risk_score};

/// One source per provider.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub fred: &'a dyn SeriesSource,
    pub market: &'a dyn SeriesSource,
}

impl Sources<'_> {
    fn for_provider(&self, provider: Provider) -> &dyn SeriesSource {
        match provider {
            Provider::Fred => self.fred,
            Provider::Yahoo => self.market,
        }
    }
}

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub raw: MacroSeries,
    pub index: Vec<NaiveDate>,
    pub aligned: MacroSeries,
    pub scores: ScoreBoard,
    /// Series to plot, in `DashboardChart::ALL` order.
    pub charts: Vec<(DashboardChart, Series)>,
}

impl Analysis {
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.index.first()?, *self.index.last()?))
    }
}

/// Retrieve every configured input concurrently.
///
/// Individual failures degrade to empty series. Fails with the no-data error
/// only when nothing at all came back.
pub fn fetch_inputs(config: &DashboardConfig, sources: Sources<'_>, today: NaiveDate) -> Result<MacroSeries, AppError> {
    let start = config.start_date(today);
    let requests = config.series.requests();
    log::info!("fetching {} series from {start}", requests.len());

    let fetched: Vec<Series> = requests
        .par_iter()
        .map(|request| fetch_or_empty(sources.for_provider(request.key.provider()), request, start))
        .collect();

    let mut fetched = fetched.into_iter();
    let raw = MacroSeries::from_fn(|key| fetched.next().unwrap_or_else(|| Series::empty(key.label())));

    let with_data = raw.count_with_data();
    if with_data == 0 {
        return Err(AlignError::NoData.into());
    }
    log::info!("{with_data}/{} series returned data", crate::domain::SeriesKey::ALL.len());
    Ok(raw)
}

/// Align the inputs on a daily index ending at `end`, score, and derive the
/// chart series.
pub fn analyze(raw: MacroSeries, config: &DashboardConfig, end: NaiveDate) -> Result<Analysis, AppError> {
    let inputs: Vec<Series> = raw.iter().map(|(_, s)| s.clone()).collect();
    let AlignedSet { index, series } = align_until(&inputs, end)?;
    if let (Some(first), Some(last)) = (index.first(), index.last()) {
        log::info!("aligned {} series on {first} .. {last} ({} days)", series.len(), index.len());
    }

    let mut series = series.into_iter();
    let aligned = MacroSeries::from_fn(|key| series.next().unwrap_or_else(|| Series::empty(key.label())));

    let weights = &config.scoring;
    let scores = ScoreBoard {
        liquidity: liquidity_score(&aligned.walcl, &aligned.wresbal, weights.liquidity.pair()),
        risk: risk_score(&aligned.hyg, &aligned.ief, &aligned.dxy, weights.risk.pair()),
        macro_weakness: macro_weakness_score(
            &aligned.dgs2,
            &aligned.dgs10,
            &aligned.copper,
            &aligned.wti,
            weights.macro_weakness.pair(),
        ),
    };
    for (kind, outcome) in scores.iter() {
        match outcome {
            Ok(score) => log::info!("{} = {:.1}", kind.display_name(), score.value),
            Err(err) => log::warn!("{err}"),
        }
    }

    let charts = vec![
        (DashboardChart::Walcl, aligned.walcl.clone()),
        (DashboardChart::Wresbal, aligned.wresbal.clone()),
        (DashboardChart::Curve, curve_slope(&aligned.dgs2, &aligned.dgs10)?),
        (DashboardChart::Dxy, aligned.dxy.clone()),
        (DashboardChart::Spread, credit_spread(&aligned.hyg, &aligned.ief)?),
        (DashboardChart::CopperWti, copper_wti_ratio(&aligned.copper, &aligned.wti)?),
    ];

    Ok(Analysis {
        raw,
        index,
        aligned,
        scores,
        charts,
    })
}

/// Render the charts and write the markdown report. Returns the report path.
pub fn publish(analysis: &Analysis, config: &DashboardConfig, generated_at: DateTime<Utc>) -> Result<PathBuf, AppError> {
    let charts_dir = config.charts_dir();
    analysis.charts.par_iter().try_for_each(|(chart, series)| {
        let path = charts_dir.join(chart.file_name());
        render_line_chart(series, chart.title(), &path, &config.chart)?;
        log::debug!("rendered {}", path.display());
        Ok::<(), AppError>(())
    })?;
    log::info!("rendered {} charts into {}", analysis.charts.len(), charts_dir.display());

    write_dashboard(&config.output_dir, generated_at, &dashboard_sections(&analysis.scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::fake::FakeSource;
    use crate::error::{EXIT_NO_DATA, ScoreError};
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    /// Daily observations for the last `n` days up to `today()`.
    fn recent(n: usize, f: impl Fn(usize) -> f64) -> Series {
        let first = today() - Duration::days(n as i64 - 1);
        Series::from_observations("raw", (0..n).map(|i| (first + Duration::days(i as i64), f(i))))
    }

    fn fred() -> FakeSource {
        FakeSource::new(Provider::Fred)
            .with("WALCL", recent(200, |i| 7_000_000.0 + i as f64 * 1_000.0))
            .with("WRESBAL", recent(200, |i| 3_400_000.0 - i as f64 * 500.0))
            .with("DGS2", recent(200, |i| 4.5 + (i % 5) as f64 * 0.01))
            .with("DGS10", recent(200, |i| 4.2 + (i % 7) as f64 * 0.02))
    }

    fn market() -> FakeSource {
        FakeSource::new(Provider::Yahoo)
            .failing("DX-Y.NYB")
            .with("DX=F", recent(150, |_| 104.0))
            .with("HYG", recent(150, |i| 78.0 + i as f64 * 0.01))
            .with("IEF", recent(150, |i| 78.0 + i as f64 * 0.01))
            .with("HG=F", recent(150, |i| 4.0 + (i % 3) as f64 * 0.1))
            .with("CL=F", recent(150, |i| 70.0 + (i % 4) as f64))
    }

    /// The same stage sequence `app::handle_run` drives for `regime run`.
    fn run_all(
        config: &DashboardConfig,
        sources: Sources<'_>,
        generated_at: DateTime<Utc>,
    ) -> Result<(Analysis, PathBuf), AppError> {
        let raw = fetch_inputs(config, sources, today())?;
        let analysis = analyze(raw, config, today())?;
        let path = publish(&analysis, config, generated_at)?;
        Ok((analysis, path))
    }

    fn config(dir: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            output_dir: dir.join("outputs"),
            start_days_ago: 400,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn full_run_writes_report_and_six_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (fred, market) = (fred(), market());
        let sources = Sources { fred: &fred, market: &market };
        let generated = Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap();

        let (analysis, path) = run_all(&config, sources, generated).unwrap();

        assert_eq!(path, config.output_dir.join("dashboard.md"));
        let md = std::fs::read_to_string(&path).unwrap();
        assert!(md.contains("Generated: 2025-06-30T12:00:00Z"));
        assert!(md.contains("- **LiquidityScore**: "));
        assert!(md.contains("- **RiskScore**: 40.0"));
        assert!(md.contains("![Copper / WTI](charts/copper_wti.svg)"));
        assert!(!md.contains("n/a"));
        for chart in DashboardChart::ALL {
            assert!(config.charts_dir().join(chart.file_name()).is_file(), "{chart:?}");
        }

        // Index spans the longest history through today.
        assert_eq!(analysis.span(), Some((today() - Duration::days(199), today())));
        assert_eq!(analysis.raw.dxy.provenance.as_ref().unwrap().code, "DX=F");
        let liquidity = analysis.scores.liquidity.as_ref().unwrap().value;
        assert!(liquidity > 0.0 && liquidity < 100.0);
    }

    #[test]
    fn missing_inputs_degrade_to_placeholder_charts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let fred = fred();
        let market = FakeSource::new(Provider::Yahoo);
        let sources = Sources { fred: &fred, market: &market };

        let (analysis, path) = run_all(&config, sources, Utc::now()).unwrap();

        assert!(analysis.raw.dxy.is_empty());
        assert_eq!(analysis.aligned.dxy.len(), analysis.index.len());
        assert!(matches!(analysis.scores.risk, Err(ScoreError::UndefinedComponent { .. })));
        assert!(analysis.scores.liquidity.is_ok());

        let md = std::fs::read_to_string(path).unwrap();
        assert!(md.contains("- **RiskScore**: n/a"));
        let dxy_chart = std::fs::read_to_string(config.charts_dir().join("dxy.svg")).unwrap();
        assert!(dxy_chart.contains("No data available"));
    }

    #[test]
    fn all_empty_aborts_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let fred = FakeSource::new(Provider::Fred).failing("WALCL");
        let market = FakeSource::new(Provider::Yahoo);
        let sources = Sources { fred: &fred, market: &market };

        let err = run_all(&config, sources, Utc::now()).unwrap_err();

        assert_eq!(err.exit_code(), EXIT_NO_DATA);
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn fetch_collects_every_input_by_provider() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (fred, market) = (fred(), market());

        let raw = fetch_inputs(&config, Sources { fred: &fred, market: &market }, today()).unwrap();

        assert_eq!(raw.count_with_data(), 9);
        assert_eq!(raw.walcl.label, "Fed Total Assets (WALCL)");
        let mut fred_calls = fred.calls.lock().unwrap().clone();
        fred_calls.sort();
        assert_eq!(fred_calls, vec!["DGS10", "DGS2", "WALCL", "WRESBAL"]);
    }

    #[test]
    fn chart_series_follow_their_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let (fred, market) = (fred(), market());
        let raw = fetch_inputs(&config, Sources { fred: &fred, market: &market }, today()).unwrap();

        let analysis = analyze(raw, &config, today()).unwrap();

        let kinds: Vec<DashboardChart> = analysis.charts.iter().map(|(c, _)| *c).collect();
        assert_eq!(kinds, DashboardChart::ALL.to_vec());
        let (_, curve) = &analysis.charts[2];
        let date = today();
        let expected = analysis.aligned.dgs10.value_at(date).unwrap() - analysis.aligned.dgs2.value_at(date).unwrap();
        assert_relative_eq!(curve.value_at(date).unwrap(), expected, epsilon = 1e-12);
    }
}
