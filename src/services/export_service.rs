//! CSV export of the filtered, column-limited view

use crate::core::{DataSource, Row};
use chrono::{DateTime, Utc};
use color_eyre::Result;
use std::path::{Path, PathBuf};

pub struct ExportService;

impl ExportService {
    /// Write `rows` restricted to `columns` as CSV; returns the number of data rows written
    pub fn export_csv(path: &Path, columns: &[String], rows: &[&Row]) -> Result<usize> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(columns.iter().map(|c| row.display(c)))?;
        }
        writer.flush()?;
        Ok(rows.len())
    }

    /// `<dir>/<source>-<region>-<YYYYmmdd-HHMMSS>.csv`
    pub fn default_export_path(dir: &Path, source: DataSource, region: &str, now: DateTime<Utc>) -> PathBuf {
        dir.join(format!(
            "{}-{}-{}.csv",
            source.as_str(),
            sanitize_file_component(region),
            now.format("%Y%m%d-%H%M%S")
        ))
    }
}

fn sanitize_file_component(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "export".to_string() } else { cleaned }
}
