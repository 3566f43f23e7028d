use std::cell::Cell;
use std::rc::Rc;

use super::{pad_rows, SheetError, Worksheet};

/// In-memory worksheet with read counting and failure injection.
///
/// The read counter is shared so it stays observable after the sheet is
/// boxed into a `BudgetBook`.
#[derive(Debug, Default)]
pub(crate) struct MemoryWorksheet {
    pub(crate) title: String,
    pub(crate) rows: Vec<Vec<String>>,
    pub(crate) reads: Rc<Cell<usize>>,
    pub(crate) fail_reads: Option<SheetError>,
    pub(crate) fail_writes: Option<SheetError>,
}

impl MemoryWorksheet {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn with_rows(title: &str, rows: &[&[&str]]) -> Self {
        let mut sheet = Self::new(title);
        sheet.rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        sheet
    }

    fn check_write(&self) -> Result<(), SheetError> {
        match &self.fail_writes {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn get_all_values(&mut self) -> Result<Vec<Vec<String>>, SheetError> {
        if let Some(e) = &self.fail_reads {
            return Err(e.clone());
        }
        self.reads.set(self.reads.get() + 1);
        let mut rows = self.rows.clone();
        pad_rows(&mut rows);
        Ok(rows)
    }

    fn append_row(&mut self, cells: &[String]) -> Result<(), SheetError> {
        self.check_write()?;
        while self
            .rows
            .last()
            .is_some_and(|r| r.iter().all(|c| c.is_empty()))
        {
            self.rows.pop();
        }
        self.rows.push(cells.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SheetError> {
        self.check_write()?;
        self.rows.clear();
        Ok(())
    }

    fn update(&mut self, rows: &[Vec<String>]) -> Result<(), SheetError> {
        self.check_write()?;
        for (r, row) in rows.iter().enumerate() {
            if self.rows.len() <= r {
                self.rows.resize_with(r + 1, Vec::new);
            }
            let target = &mut self.rows[r];
            if target.len() < row.len() {
                target.resize(row.len(), String::new());
            }
            target[..row.len()].clone_from_slice(row);
        }
        Ok(())
    }
}
