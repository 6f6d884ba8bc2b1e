//! Plotters-powered line charts for the dashboard report.
//!
//! Charts are written as SVG so no font rasterizer or native image library is
//! needed. All styling comes from an explicit [`RenderConfig`]; there is no
//! global plotting state.

use std::fs::create_dir_all;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::{Deserialize, Serialize};

use crate::domain::Series;
use crate::error::AppError;

/// File extension of rendered charts.
pub const CHART_EXTENSION: &str = "svg";

/// The six charts embedded in the dashboard, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardChart {
    Walcl,
    Wresbal,
    Curve,
    Dxy,
    Spread,
    CopperWti,
}

impl DashboardChart {
    pub const ALL: [DashboardChart; 6] = [
        DashboardChart::Walcl,
        DashboardChart::Wresbal,
        DashboardChart::Curve,
        DashboardChart::Dxy,
        DashboardChart::Spread,
        DashboardChart::CopperWti,
    ];

    /// File stem under the charts directory.
    pub fn stem(self) -> &'static str {
        match self {
            DashboardChart::Walcl => "walcl",
            DashboardChart::Wresbal => "wresbal",
            DashboardChart::Curve => "curve",
            DashboardChart::Dxy => "dxy",
            DashboardChart::Spread => "spread",
            DashboardChart::CopperWti => "copper_wti",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DashboardChart::Walcl => "Fed Total Assets (WALCL)",
            DashboardChart::Wresbal => "Reserve Balances (WRESBAL)",
            DashboardChart::Curve => "UST 10Y-2Y (Curve)",
            DashboardChart::Dxy => "DXY (Dollar Index)",
            DashboardChart::Spread => "HYG-IEF 20D Spread",
            DashboardChart::CopperWti => "Copper / WTI",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.{CHART_EXTENSION}", self.stem())
    }

    /// Path relative to the report, e.g. `charts/walcl.svg`.
    pub fn relative_path(self) -> String {
        format!("{CHARTS_DIR}/{}", self.file_name())
    }
}

/// Charts directory name under the output directory.
pub const CHARTS_DIR: &str = "charts";

/// One-time rendering settings handed to every chart call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Line color as RGB.
    pub line_color: [u8; 3],
    /// Title font size.
    pub caption_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        // 9x4 inches at 140 dpi.
        Self {
            width: 1260,
            height: 560,
            line_color: [31, 119, 180],
            caption_size: 28,
        }
    }
}

/// Render `series` as a titled line chart at `path`.
///
/// Gaps are skipped. A series with no defined values renders a "No data
/// available" placeholder instead of failing.
pub fn render_line_chart(series: &Series, title: &str, path: &Path, config: &RenderConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .map_err(|e| AppError::runtime(format!("Failed to create chart dir '{}': {e}", parent.display())))?;
    }

    let points = plot_points(series);
    let result = match series.first_valid_date() {
        Some(origin) if !points.is_empty() => draw_line(&points, origin, title, path, config),
        _ => draw_placeholder(title, path, config),
    };

    result.map_err(|e| AppError::runtime(format!("Failed to render chart '{}': {e}", path.display())))
}

/// `(days since first defined value, value)` for each defined point.
fn plot_points(series: &Series) -> Vec<(f64, f64)> {
    let Some(origin) = series.first_valid_date() else {
        return Vec::new();
    };
    series
        .defined()
        .map(|(d, v)| ((d - origin).num_days() as f64, v))
        .collect()
}

fn bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let (mut x0, mut x1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x1 <= x0 {
        x1 = x0 + 1.0;
    }
    let span = y1 - y0;
    let pad = if span > 0.0 { span * 0.05 } else { y0.abs().max(1.0) * 0.05 };
    ([x0, x1], [y0 - pad, y1 + pad])
}

fn draw_line(
    points: &[(f64, f64)],
    origin: NaiveDate,
    title: &str,
    path: &Path,
    config: &RenderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let ([x0, x1], [y0, y1]) = bounds(points);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", f64::from(config.caption_size)))
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 36)
        .build_cartesian_2d(x0..x1, y0..y1)?;

    let date_label = |x: &f64| (origin + Duration::days(x.round() as i64)).format("%Y-%m").to_string();
    chart
        .configure_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&date_label)
        .y_label_formatter(&|v| format_tick(*v))
        .draw()?;

    let [r, g, b] = config.line_color;
    chart.draw_series(LineSeries::new(points.iter().copied(), RGBColor(r, g, b).stroke_width(2)))?;

    root.present()?;
    Ok(())
}

fn draw_placeholder(title: &str, path: &Path, config: &RenderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, ("sans-serif", f64::from(config.caption_size)))?;

    let (w, h) = area.dim_in_pixel();
    let style = TextStyle::from(("sans-serif", 20.0).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    area.draw(&Text::new("No data available", (w as i32 / 2, h as i32 / 2), style))?;

    root.present()?;
    Ok(())
}

fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.2}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.1}k", v / 1e3)
    } else if a >= 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.4}")
    }
}
