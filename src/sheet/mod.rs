//! Worksheet storage: a grid of string cells with a header row.
//!
//! The budget book only talks to a [`Worksheet`]; the SQLite store is the
//! shipped implementation and tests use an in-memory one.

#[cfg(test)]
mod memory;
mod schema;
mod sqlite;

#[cfg(test)]
pub(crate) use memory::MemoryWorksheet;
pub(crate) use sqlite::SqliteWorksheet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum SheetError {
    #[error("Could not connect to the worksheet store: {0}")]
    Connection(String),
    #[error("Failed to read worksheet: {0}")]
    Read(String),
    #[error("Failed to write worksheet: {0}")]
    Write(String),
}

impl SheetError {
    /// Connection failures leave the store unusable until the next retry.
    pub(crate) fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

pub(crate) trait Worksheet {
    fn title(&self) -> &str;

    /// Every row, padded to the widest row.
    fn get_all_values(&mut self) -> Result<Vec<Vec<String>>, SheetError>;

    fn header(&mut self) -> Result<Vec<String>, SheetError> {
        Ok(self.get_all_values()?.into_iter().next().unwrap_or_default())
    }

    /// Write `cells` as a new row after the last row.
    fn append_row(&mut self, cells: &[String]) -> Result<(), SheetError>;

    /// Erase all content.
    fn clear(&mut self) -> Result<(), SheetError>;

    /// Write `rows` starting at the top-left cell.
    fn update(&mut self, rows: &[Vec<String>]) -> Result<(), SheetError>;
}

/// Pad ragged rows so every row has the same width.
pub(crate) fn pad_rows(rows: &mut [Vec<String>]) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
}
