use serde::{Deserialize, Serialize};

/// Stock levels strictly below this count as low.
pub const LOW_STOCK_THRESHOLD: u32 = 20;

/// Availability classification shown next to each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn classify(stock: u32) -> Self {
        match stock {
            0 => StockStatus::OutOfStock,
            n if n < LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            _ => StockStatus::InStock,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries() {
        assert_eq!(StockStatus::classify(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::classify(1), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(LOW_STOCK_THRESHOLD - 1), StockStatus::LowStock);
        assert_eq!(StockStatus::classify(LOW_STOCK_THRESHOLD), StockStatus::InStock);
        assert_eq!(StockStatus::OutOfStock.label(), "Out of Stock");
    }
}
