use rust_decimal::Decimal;

use crate::models::BudgetItem;

/// Figures shown above the budget table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Summary {
    pub(crate) item_count: usize,
    pub(crate) total_quantity: u64,
    pub(crate) average_price: u64,
    pub(crate) booked_count: usize,
    pub(crate) grand_total: u64,
    pub(crate) paid_total: u64,
    pub(crate) remaining: u64,
    /// 0-100, two decimal places. Zero when there is nothing to pay.
    pub(crate) paid_percentage: Decimal,
}

impl Summary {
    pub(crate) fn from_items(items: &[BudgetItem]) -> Self {
        let grand_total = saturating_sum(items.iter().map(BudgetItem::total));
        let paid_total = saturating_sum(items.iter().filter(|i| i.paid).map(BudgetItem::total));
        let price_sum = saturating_sum(items.iter().map(|i| i.unit_price));
        let average_price = match u64::try_from(items.len()) {
            Ok(n) if n > 0 => price_sum / n,
            _ => 0,
        };

        Self {
            item_count: items.len(),
            total_quantity: items.iter().map(|i| u64::from(i.quantity)).sum(),
            average_price,
            booked_count: items.iter().filter(|i| i.booked).count(),
            grand_total,
            paid_total,
            remaining: grand_total.saturating_sub(paid_total),
            paid_percentage: paid_percentage(paid_total, grand_total),
        }
    }
}

fn saturating_sum(values: impl Iterator<Item = u64>) -> u64 {
    values.fold(0, u64::saturating_add)
}

pub(crate) fn paid_percentage(paid: u64, grand_total: u64) -> Decimal {
    if grand_total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(paid) * Decimal::ONE_HUNDRED / Decimal::from(grand_total)).round_dp(2)
}
