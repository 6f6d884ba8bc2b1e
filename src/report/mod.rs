//! Markdown dashboard assembly.
//!
//! A report is a title, a generation timestamp and an ordered list of
//! sections. Section bodies are produced by `format`; this module only lays
//! them out and writes the file.

use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::domain::ScoreBoard;
use crate::error::AppError;

pub mod format;

pub use format::*;

pub const REPORT_FILE: &str = "dashboard.md";
pub const REPORT_TITLE: &str = "Daily Macro Liquidity Dashboard";

/// One `## heading` block of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// The standard dashboard sections: scores, chart links, notes.
pub fn dashboard_sections(scores: &ScoreBoard) -> Vec<Section> {
    vec![
        Section::new("Headline Scores", format_scores(scores)),
        Section::new("Key Charts", format_chart_links()),
        Section::new("Notes", NOTES),
    ]
}

pub fn render_dashboard(generated_at: DateTime<Utc>, sections: &[Section]) -> String {
    let mut out = format!(
        "# {REPORT_TITLE}\n\nGenerated: {}\n",
        generated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    for section in sections {
        out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.body.trim_end()));
    }
    out
}

/// Write `dashboard.md` under `output_dir`, creating it if needed.
pub fn write_dashboard(
    output_dir: &Path,
    generated_at: DateTime<Utc>,
    sections: &[Section],
) -> Result<PathBuf, AppError> {
    create_dir_all(output_dir)
        .map_err(|e| AppError::runtime(format!("Failed to create output dir '{}': {e}", output_dir.display())))?;

    let path = output_dir.join(REPORT_FILE);
    write(&path, render_dashboard(generated_at, sections))
        .map_err(|e| AppError::runtime(format!("Failed to write report '{}': {e}", path.display())))?;

    log::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn renders_title_timestamp_and_sections_in_order() {
        let sections = vec![Section::new("First", "a\n"), Section::new("Second", "b")];
        let md = render_dashboard(generated(), &sections);
        assert_eq!(
            md,
            "# Daily Macro Liquidity Dashboard\n\nGenerated: 2025-03-04T05:06:07Z\n\n## First\n\na\n\n## Second\n\nb\n"
        );
    }

    #[test]
    fn writes_report_into_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("outputs");

        let path = write_dashboard(&out, generated(), &[Section::new("Notes", NOTES)]).unwrap();

        assert_eq!(path, out.join("dashboard.md"));
        let md = std::fs::read_to_string(path).unwrap();
        assert!(md.starts_with("# Daily Macro Liquidity Dashboard"));
        assert!(md.contains("## Notes"));
    }
}
