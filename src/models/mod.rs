mod column;
mod item;

pub use column::{Column, Schema};
pub use item::{line_total, BudgetItem, ItemError, PricingMode};
