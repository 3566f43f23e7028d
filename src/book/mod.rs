//! The budget book: reads, appends and rewrites budget items on a worksheet.
//!
//! The worksheet is the only source of truth. Reads go through a short TTL
//! cache which every write invalidates.

mod cache;
pub(crate) mod codec;

use anyhow::{Context, Result};
use std::time::Duration;

use cache::TtlCache;

use crate::models::{BudgetItem, Schema};
use crate::sheet::{SheetError, Worksheet};

pub(crate) use codec::BudgetTable;

pub(crate) struct BudgetBook {
    sheet: Box<dyn Worksheet>,
    schema: Schema,
    cache: TtlCache<String, BudgetTable>,
}

impl BudgetBook {
    pub(crate) fn new(sheet: Box<dyn Worksheet>, schema: Schema, ttl: Duration) -> Self {
        Self {
            sheet,
            schema,
            cache: TtlCache::new(ttl),
        }
    }

    pub(crate) fn schema(&self) -> Schema {
        self.schema
    }

    pub(crate) fn title(&self) -> &str {
        self.sheet.title()
    }

    /// Current table, from the cache when it is still fresh.
    ///
    /// A header-only or empty sheet gives an empty table. A store failure is
    /// an error, never an empty table.
    pub(crate) fn load(&mut self) -> Result<BudgetTable> {
        let key = self.sheet.title().to_string();
        let schema = self.schema;
        let sheet = &mut self.sheet;
        self.cache
            .get_or_load(key, || {
                let values = sheet.get_all_values()?;
                log::debug!(
                    "Fetched {} rows from '{}'",
                    values.len(),
                    sheet.title()
                );
                Ok::<_, SheetError>(codec::decode_table(&values, schema))
            })
            .context("Failed to load budget items")
    }

    /// Drop every cached snapshot so the next load hits the store.
    pub(crate) fn refresh(&mut self) {
        self.cache.clear();
        log::trace!("Cleared cached snapshots");
    }

    fn invalidate(&mut self) {
        let key = self.sheet.title().to_string();
        if self.cache.invalidate(&key) {
            log::trace!("Dropped cached snapshot of '{key}'");
        }
    }

    /// Append one item as a new row.
    pub(crate) fn append(&mut self, item: &BudgetItem) -> Result<()> {
        let result = self.append_row(item);
        self.invalidate();
        result.with_context(|| format!("Failed to save item '{}'", item.name))
    }

    fn append_row(&mut self, item: &BudgetItem) -> Result<(), SheetError> {
        let mut header = self.sheet.header()?;
        if header.iter().all(|h| h.trim().is_empty()) {
            header = self.schema.headers();
            self.sheet.append_row(&header)?;
            log::info!("Wrote header row to empty sheet '{}'", self.sheet.title());
        }

        let missing = codec::missing_columns(&header);
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|c| self.schema.header(*c)).collect();
            log::warn!(
                "Sheet '{}' has no {} column(s); they will be stored on the next full save",
                self.sheet.title(),
                names.join(", ")
            );
        }

        let row = codec::align_to_header(item, &header, self.schema);
        self.sheet.append_row(&row)?;
        log::info!(
            "Appended '{}' (total {}) to '{}'",
            item.name,
            item.total(),
            self.sheet.title()
        );
        Ok(())
    }

    /// Replace the whole sheet with `items`.
    ///
    /// The sheet is cleared and then rewritten; anything written by someone
    /// else since our last load is lost.
    pub(crate) fn save_all(&mut self, items: &[BudgetItem]) -> Result<()> {
        let rows = codec::encode_table(items, self.schema);
        let result = overwrite(self.sheet.as_mut(), &rows);
        self.invalidate();
        if let Err(ref e) = result {
            log::error!("Full save of '{}' failed: {e}", self.sheet.title());
        }
        result.context("Failed to save budget items")?;
        log::info!("Saved {} items to '{}'", items.len(), self.sheet.title());
        Ok(())
    }
}

fn overwrite(sheet: &mut dyn Worksheet, rows: &[Vec<String>]) -> Result<(), SheetError> {
    sheet.clear()?;
    sheet.update(rows)
}
