#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingMode {
    /// Price is a per-unit rate, multiplied by quantity.
    #[default]
    PerUnit,
    /// Price already covers the whole line.
    LumpSum,
}

impl PricingMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "lump sum" | "lumpsum" | "lump" | "total" | "harga total/borongan" | "borongan" => {
                Self::LumpSum
            }
            _ => Self::PerUnit,
        }
    }

    pub fn all() -> &'static [PricingMode] {
        &[Self::PerUnit, Self::LumpSum]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("Item name must not be empty")]
    EmptyName,
    #[error("Quantity must be greater than 0")]
    InvalidQuantity,
    #[error("Price must not be negative")]
    NegativePrice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetItem {
    pub name: String,
    pub quantity: u32,
    /// Whole Rupiah.
    pub unit_price: u64,
    pub pricing_mode: PricingMode,
    pub paid: bool,
    pub booked: bool,
}

impl BudgetItem {
    pub fn new(name: String, quantity: u32, unit_price: u64, pricing_mode: PricingMode) -> Self {
        Self {
            name,
            quantity,
            unit_price,
            pricing_mode,
            paid: false,
            booked: false,
        }
    }

    /// Build an item from raw form input, rejecting what the add form rejects.
    pub fn from_form(
        name: &str,
        quantity: i64,
        unit_price: i64,
        pricing_mode: PricingMode,
    ) -> Result<Self, ItemError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or(ItemError::InvalidQuantity)?;
        let unit_price = u64::try_from(unit_price).map_err(|_| ItemError::NegativePrice)?;
        Ok(Self::new(name.to_string(), quantity, unit_price, pricing_mode))
    }

    /// Line total. Always derived, never stored on the item.
    pub fn total(&self) -> u64 {
        line_total(self.pricing_mode, self.quantity, self.unit_price)
    }
}

pub fn line_total(mode: PricingMode, quantity: u32, unit_price: u64) -> u64 {
    match mode {
        PricingMode::PerUnit => unit_price.saturating_mul(u64::from(quantity)),
        PricingMode::LumpSum => unit_price,
    }
}
