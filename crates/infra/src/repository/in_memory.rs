use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shopdeck_core::Entity;
use shopdeck_products::{Product, ProductId};

use super::{Modified, ModifyError, ProductMutation, ProductRepository, StorageError, sort_products};
use crate::config::ListOrder;

/// In-memory product store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list(&self, order: ListOrder) -> Result<Vec<Product>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        let mut products: Vec<Product> = map.values().cloned().collect();
        sort_products(&mut products, order);
        Ok(products)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let map = self.inner.read().map_err(|_| StorageError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<(), StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        if map.contains_key(product.id()) {
            return Err(StorageError::Backend(format!(
                "duplicate product id {}",
                product.id_typed()
            )));
        }
        map.insert(*product.id(), product.clone());
        Ok(())
    }

    async fn modify(
        &self,
        id: ProductId,
        mutate: ProductMutation,
    ) -> Result<Modified, ModifyError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        let slot = map.get_mut(&id).ok_or(ModifyError::NotFound)?;

        let before = slot.clone();
        let mut after = before.clone();
        mutate(&mut after)?;
        *slot = after.clone();
        Ok(Modified { before, after })
    }

    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        let mut map = self.inner.write().map_err(|_| StorageError::Poisoned)?;
        Ok(map.remove(&id))
    }
}
