use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopdeck_events::Event;

use crate::product::ProductId;

/// A catalog mutation that completed successfully.
///
/// Readers never patch their copy from the payload; they treat any of these
/// as "the list is stale" and re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogEvent {
    ProductCreated {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    ProductUpdated {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    ProductDeleted {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
}

impl CatalogEvent {
    pub fn product_id(&self) -> ProductId {
        match self {
            CatalogEvent::ProductCreated { product_id, .. }
            | CatalogEvent::ProductUpdated { product_id, .. }
            | CatalogEvent::ProductDeleted { product_id, .. } => *product_id,
        }
    }
}

impl Event for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::ProductCreated { .. } => "products.product.created",
            CatalogEvent::ProductUpdated { .. } => "products.product.updated",
            CatalogEvent::ProductDeleted { .. } => "products.product.deleted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::ProductCreated { occurred_at, .. }
            | CatalogEvent::ProductUpdated { occurred_at, .. }
            | CatalogEvent::ProductDeleted { occurred_at, .. } => *occurred_at,
        }
    }
}
