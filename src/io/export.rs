//! Export the aligned inputs to CSV.
//!
//! One row per index date, one column per input. Missing values are empty
//! cells, so the file opens cleanly in spreadsheets and dataframe readers.

use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{MacroSeries, SeriesKey};
use crate::error::AppError;

/// Write `aligned` (all on `index`) to `path`.
pub fn write_aligned_csv(path: &Path, index: &[NaiveDate], aligned: &MacroSeries) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .map_err(|e| AppError::runtime(format!("Failed to create export dir '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    write_rows(&mut out, index, aligned)
        .and_then(|_| out.flush())
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV '{}': {e}", path.display())))?;

    log::info!("exported {} aligned rows to {}", index.len(), path.display());
    Ok(())
}

fn write_rows(out: &mut impl Write, index: &[NaiveDate], aligned: &MacroSeries) -> std::io::Result<()> {
    let header: Vec<&str> = std::iter::once("date")
        .chain(SeriesKey::ALL.iter().map(|k| k.name()))
        .collect();
    writeln!(out, "{}", header.join(","))?;

    for (i, date) in index.iter().enumerate() {
        let cells: Vec<String> = aligned
            .iter()
            .map(|(_, s)| match s.points().get(i) {
                Some((d, Some(v))) if d == date => format!("{v:.6}"),
                _ => String::new(),
            })
            .collect();
        writeln!(out, "{date},{}", cells.join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Series;

    #[test]
    fn writes_header_and_blank_cells_for_missing() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let index = vec![d(1), d(2)];
        let aligned = MacroSeries::from_fn(|key| match key {
            SeriesKey::Walcl => Series::from_parts("walcl", &index, vec![Some(7.5), Some(7.25)]),
            SeriesKey::Dxy => Series::from_parts("dxy", &index, vec![None, None]),
            _ => Series::from_parts(key.label(), &index, vec![Some(1.0), Some(2.0)]),
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("aligned.csv");
        write_aligned_csv(&path, &index, &aligned).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "date,WALCL,WRESBAL,DGS2,DGS10,DXY,HYG,IEF,COPPER,WTI");
        assert!(lines[1].starts_with("2025-01-01,7.500000,1.000000,1.000000,1.000000,,1.000000"));
        assert!(lines[2].starts_with("2025-01-02,7.250000,"));
    }
}
