//! The admin products page: one event bus shared by the list and the editor.

use std::sync::Arc;

use shopdeck_events::{EventBus, InMemoryEventBus};
use shopdeck_products::CatalogEvent;

use crate::api::{CatalogApi, HttpCatalogApi};
use crate::controller::ProductsController;
use crate::error::ClientError;
use crate::list::ProductList;
use crate::view::ProductRow;

pub type CatalogBus = Arc<InMemoryEventBus<CatalogEvent>>;

#[derive(Debug)]
pub struct ProductsPage {
    pub list: ProductList,
    pub editor: ProductsController<CatalogBus>,
}

impl ProductsPage {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let bus: CatalogBus = Arc::new(InMemoryEventBus::new());
        Self {
            list: ProductList::new(api.clone(), bus.subscribe()),
            editor: ProductsController::new(api, bus),
        }
    }

    /// Page backed by the gateway at `base_url`.
    pub fn connect(base_url: impl Into<String>) -> Self {
        Self::new(Arc::new(HttpCatalogApi::new(base_url)))
    }

    /// Table rows for the current list.
    pub async fn rows(&self) -> Result<Vec<ProductRow>, ClientError> {
        let products = self.list.list_products().await?;
        Ok(products.iter().map(ProductRow::from).collect())
    }
}
