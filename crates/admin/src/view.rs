use rust_decimal::{Decimal, RoundingStrategy};

use shopdeck_products::{Category, Product, ProductId, StockStatus};

/// Shown when a product has no image to display.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// One row of the product table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price_label: String,
    pub stock_label: String,
    pub stock_status: StockStatus,
    pub thumbnail: String,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id_typed(),
            name: p.name().to_string(),
            category: p.category(),
            price_label: price_label(p.price()),
            stock_label: format!("{} units", p.stock()),
            stock_status: p.stock_status(),
            thumbnail: p
                .images()
                .first()
                .cloned()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        }
    }
}

/// `$` and exactly two decimals, half away from zero.
pub fn price_label(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shopdeck_products::ProductFields;

    use super::*;

    #[test]
    fn price_labels_always_show_cents() {
        assert_eq!(price_label(Decimal::new(1999, 2)), "$19.99");
        assert_eq!(price_label(Decimal::new(5, 0)), "$5.00");
        assert_eq!(price_label(Decimal::new(12345, 3)), "$12.35");
        assert_eq!(price_label(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn rows_summarise_a_product() {
        let product = Product::create(
            ProductId::new(),
            ProductFields {
                name: "Mouse".into(),
                category: Category::Electronics,
                price: Decimal::new(1999, 2),
                stock: 10,
                description: "Wireless".into(),
            },
            vec!["http://localhost:3000/uploads/a.png".into()],
            Utc::now(),
        )
        .unwrap();

        let row = ProductRow::from(&product);
        assert_eq!(row.price_label, "$19.99");
        assert_eq!(row.stock_label, "10 units");
        assert_eq!(row.stock_status, StockStatus::LowStock);
        assert_eq!(row.thumbnail, "http://localhost:3000/uploads/a.png");
    }
}
