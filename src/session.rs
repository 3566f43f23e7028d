//! One editing pass over the budget table.
//!
//! Edits stay in memory until the whole table is saved. Rows marked for
//! deletion are dropped at save time; the mark itself is never stored.

use crate::book::BudgetTable;
use crate::models::{BudgetItem, ItemError, PricingMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ItemFilter {
    #[default]
    All,
    Paid,
    Unpaid,
    Booked,
    Unbooked,
}

impl ItemFilter {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Some(Self::All),
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            "booked" => Some(Self::Booked),
            "unbooked" => Some(Self::Unbooked),
            _ => None,
        }
    }

    pub(crate) fn matches(&self, item: &BudgetItem) -> bool {
        match self {
            Self::All => true,
            Self::Paid => item.paid,
            Self::Unpaid => !item.paid,
            Self::Booked => item.booked,
            Self::Unbooked => !item.booked,
        }
    }
}

impl std::fmt::Display for ItemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Paid => write!(f, "paid"),
            Self::Unpaid => write!(f, "unpaid"),
            Self::Booked => write!(f, "booked"),
            Self::Unbooked => write!(f, "unbooked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditRow {
    pub(crate) item: BudgetItem,
    pub(crate) delete: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EditSession {
    rows: Vec<EditRow>,
    dirty: bool,
}

impl EditSession {
    pub(crate) fn from_table(table: &BudgetTable) -> Self {
        Self::from_items(table.items.clone())
    }

    pub(crate) fn from_items(items: Vec<BudgetItem>) -> Self {
        Self {
            rows: items
                .into_iter()
                .map(|item| EditRow {
                    item,
                    delete: false,
                })
                .collect(),
            dirty: false,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn get(&self, index: usize) -> Option<&EditRow> {
        self.rows.get(index)
    }

    fn row_mut(&mut self, index: usize) -> Option<&mut EditRow> {
        let row = self.rows.get_mut(index)?;
        self.dirty = true;
        Some(row)
    }

    /// Indices of rows the filter lets through, in table order.
    pub(crate) fn visible(&self, filter: ItemFilter) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(&r.item))
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn set_name(&mut self, index: usize, name: &str) -> Result<bool, ItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }
        let Some(row) = self.row_mut(index) else {
            return Ok(false);
        };
        row.item.name = name.to_string();
        Ok(true)
    }

    pub(crate) fn set_quantity(&mut self, index: usize, quantity: i64) -> Result<bool, ItemError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(ItemError::InvalidQuantity)?;
        let Some(row) = self.row_mut(index) else {
            return Ok(false);
        };
        row.item.quantity = quantity;
        Ok(true)
    }

    pub(crate) fn set_unit_price(&mut self, index: usize, price: i64) -> Result<bool, ItemError> {
        let price = u64::try_from(price).map_err(|_| ItemError::NegativePrice)?;
        let Some(row) = self.row_mut(index) else {
            return Ok(false);
        };
        row.item.unit_price = price;
        Ok(true)
    }

    pub(crate) fn set_pricing_mode(&mut self, index: usize, mode: PricingMode) -> bool {
        let Some(row) = self.row_mut(index) else {
            return false;
        };
        row.item.pricing_mode = mode;
        true
    }

    pub(crate) fn toggle_paid(&mut self, index: usize) -> Option<bool> {
        self.row_mut(index).map(|r| {
            r.item.paid = !r.item.paid;
            r.item.paid
        })
    }

    pub(crate) fn toggle_booked(&mut self, index: usize) -> Option<bool> {
        self.row_mut(index).map(|r| {
            r.item.booked = !r.item.booked;
            r.item.booked
        })
    }

    pub(crate) fn toggle_delete(&mut self, index: usize) -> Option<bool> {
        self.row_mut(index).map(|r| {
            r.delete = !r.delete;
            r.delete
        })
    }

    pub(crate) fn deleted_count(&self) -> usize {
        self.rows.iter().filter(|r| r.delete).count()
    }

    /// Items to write back, without the rows marked for deletion.
    /// Items the filter shows, minus rows marked for deletion.
    pub(crate) fn shown_items(&self, filter: ItemFilter) -> Vec<BudgetItem> {
        self.rows
            .iter()
            .filter(|r| !r.delete && filter.matches(&r.item))
            .map(|r| r.item.clone())
            .collect()
    }

    pub(crate) fn items_to_save(&self) -> Vec<BudgetItem> {
        self.rows
            .iter()
            .filter(|r| !r.delete)
            .map(|r| r.item.clone())
            .collect()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
