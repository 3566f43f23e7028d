mod csv_export;
mod xlsx_export;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::Path;

pub(crate) use csv_export::to_csv;
pub(crate) use xlsx_export::to_xlsx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "excel" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Guess the format from a file extension, defaulting to CSV.
    pub(crate) fn from_path(path: &str) -> Self {
        let is_xlsx = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xlsx"));
        if is_xlsx {
            Self::Xlsx
        } else {
            Self::Csv
        }
    }

    pub(crate) fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// e.g. `Trip_Budget_20260118_093000.csv`
pub(crate) fn default_file_name(format: ExportFormat, now: NaiveDateTime) -> String {
    format!(
        "Trip_Budget_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// Render `items` in `format` and write them to `path`.
pub(crate) fn export_to_file(
    items: &[crate::models::BudgetItem],
    schema: crate::models::Schema,
    format: ExportFormat,
    path: &str,
) -> Result<usize> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(items, schema)?,
        ExportFormat::Xlsx => to_xlsx(items, schema)?,
    };
    std::fs::write(path, &bytes).with_context(|| format!("Failed to write {path}"))?;
    log::info!("Exported {} items to {path}", items.len());
    Ok(items.len())
}
