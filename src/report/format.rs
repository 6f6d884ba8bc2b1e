//! Formatted text for the report and the terminal.

use chrono::NaiveDate;

use crate::chart::DashboardChart;
use crate::domain::{MacroSeries, ScoreBoard, ScoreOutcome};

/// Reading guide shown under the headline scores.
pub const SCORE_LEGEND: &str = "> 0-100, higher means the dimension is stronger (weaker dollar and narrower credit spreads raise RiskScore; a deeper curve inversion raises MacroWeaknessScore).";

pub const NOTES: &str = "\
- Compare the WALCL/WRESBAL trend with shifts in market style leadership
- A weakening DXY often accompanies stronger risk assets, and vice versa
- A deepening 10Y-2Y inversion tends to coincide with macro warnings
";

/// `- **Name**: value` lines, the legend, and one warning per undefined score.
pub fn format_scores(scores: &ScoreBoard) -> String {
    let mut lines = Vec::new();
    let mut warnings = Vec::new();
    for (kind, outcome) in scores.iter() {
        lines.push(format!("- **{}**: {}", kind.display_name(), fmt_score(outcome)));
        if let Err(err) = outcome {
            warnings.push(format!("> Warning: {err}"));
        }
    }

    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out.push_str(SCORE_LEGEND);
    for warning in warnings {
        out.push_str("\n>\n");
        out.push_str(&warning);
    }
    out
}

/// One image link per dashboard chart, relative to the report.
pub fn format_chart_links() -> String {
    DashboardChart::ALL
        .iter()
        .map(|c| format!("![{}]({})", c.title(), c.relative_path()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn fmt_score(outcome: &ScoreOutcome) -> String {
    match outcome {
        Ok(score) => format!("{:.1}", score.value),
        Err(_) => "n/a".to_string(),
    }
}

/// Terminal summary: index span, per-input coverage, scores.
pub fn format_run_summary(span: Option<(NaiveDate, NaiveDate)>, raw: &MacroSeries, scores: &ScoreBoard) -> String {
    let mut out = String::new();

    out.push_str("=== regime - Daily Macro Liquidity Dashboard ===\n");
    match span {
        Some((start, end)) => {
            let days = (end - start).num_days() + 1;
            out.push_str(&format!("Index: {start} .. {end} ({days} days)\n"));
        }
        None => out.push_str("Index: (empty)\n"),
    }

    out.push_str("\nInputs:\n");
    for (key, series) in raw.iter() {
        let source = series
            .provenance
            .as_ref()
            .map(|p| format!("{} {}", p.provider.display_name(), p.code))
            .unwrap_or_else(|| "-".to_string());
        let last = series
            .last_valid()
            .map(|(d, v)| format!("{v:.4} @ {d}"))
            .unwrap_or_else(|| "no data".to_string());
        out.push_str(
            format!(
                "  {:<8} {:>6} obs  {:<18} {}\n",
                key.name(),
                series.valid_count(),
                truncate(&source, 18),
                last
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out.push_str("\nScores:\n");
    for (kind, outcome) in scores.iter() {
        out.push_str(&format!("  {:<20} {:>6}\n", kind.display_name(), fmt_score(outcome)));
        if let Err(err) = outcome {
            out.push_str(&format!("    ({err})\n"));
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
