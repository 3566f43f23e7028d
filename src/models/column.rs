use super::PricingMode;

/// Logical columns of the budget worksheet, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Quantity,
    UnitPrice,
    Total,
    PricingMode,
    Paid,
    Booked,
}

impl Column {
    pub fn all() -> &'static [Column] {
        &[
            Self::Name,
            Self::Quantity,
            Self::UnitPrice,
            Self::Total,
            Self::PricingMode,
            Self::Paid,
            Self::Booked,
        ]
    }

    /// Does `header` name this column under any schema?
    pub fn matches_header(&self, header: &str) -> bool {
        let header = header.trim();
        Schema::all()
            .iter()
            .any(|s| s.header(*self).eq_ignore_ascii_case(header))
    }
}

/// Header naming used in the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Schema {
    #[default]
    English,
    Indonesian,
}

impl Schema {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "id" | "indonesian" | "bahasa" => Some(Self::Indonesian),
            _ => None,
        }
    }

    pub fn all() -> &'static [Schema] {
        &[Self::English, Self::Indonesian]
    }

    pub fn header(&self, column: Column) -> &'static str {
        match (self, column) {
            (Self::English, Column::Name) => "Item",
            (Self::English, Column::Quantity) => "Qty",
            (Self::English, Column::UnitPrice) => "Price",
            (Self::English, Column::Total) => "Total",
            (Self::English, Column::PricingMode) => "Type",
            (Self::English, Column::Paid) => "Paid",
            (Self::English, Column::Booked) => "Booked",
            (Self::Indonesian, Column::Name) => "Nama Barang",
            (Self::Indonesian, Column::Quantity) => "Qty",
            (Self::Indonesian, Column::UnitPrice) => "Harga Input",
            (Self::Indonesian, Column::Total) => "Total Akhir",
            (Self::Indonesian, Column::PricingMode) => "Tipe",
            (Self::Indonesian, Column::Paid) => "Status Pembayaran",
            (Self::Indonesian, Column::Booked) => "Status Checkout",
        }
    }

    /// The full header row, in storage order.
    pub fn headers(&self) -> Vec<String> {
        Column::all()
            .iter()
            .map(|c| self.header(*c).to_string())
            .collect()
    }

    pub fn mode_label(&self, mode: PricingMode) -> &'static str {
        match (self, mode) {
            (Self::English, PricingMode::PerUnit) => "Per Unit",
            (Self::English, PricingMode::LumpSum) => "Lump Sum",
            (Self::Indonesian, PricingMode::PerUnit) => "Harga Satuan",
            (Self::Indonesian, PricingMode::LumpSum) => "Harga Total/Borongan",
        }
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::English => write!(f, "en"),
            Self::Indonesian => write!(f, "id"),
        }
    }
}
