//! Product document storage.
//!
//! Each product is one document and every write touches exactly one document.
//! Updates go through [`ProductRepository::modify`], which applies the change
//! to whatever is stored at write time, so a concurrent update is never
//! overwritten with a stale copy. Concurrent writers to the same field are
//! last-write-wins.

use async_trait::async_trait;
use thiserror::Error;

use shopdeck_core::{DomainError, DomainResult};
use shopdeck_products::{Product, ProductId};

use crate::config::ListOrder;

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryProductRepository;
#[cfg(feature = "postgres")]
pub use postgres::PostgresProductRepository;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be reached or rejected the operation.
    #[error("storage backend failure: {0}")]
    Backend(String),

    /// A stored document could not be decoded.
    #[error("corrupt product document {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Internal lock poisoning (in-memory store only).
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Failure of a read-modify-write on one product.
#[derive(Debug, Error)]
pub enum ModifyError {
    #[error("product not found")]
    NotFound,

    /// The mutation refused the change; nothing was written.
    #[error(transparent)]
    Rejected(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Change applied to the stored product while the repository holds it.
pub type ProductMutation = Box<dyn FnOnce(&mut Product) -> DomainResult<()> + Send>;

/// The document a [`ProductRepository::modify`] replaced, and what replaced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modified {
    pub before: Product,
    pub after: Product,
}

/// Persistence seam for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products in the requested order.
    async fn list(&self, order: ListOrder) -> Result<Vec<Product>, StorageError>;

    async fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError>;

    async fn insert(&self, product: &Product) -> Result<(), StorageError>;

    /// Apply `mutate` to the stored document and write the result, with no
    /// other write to the same id in between.
    async fn modify(&self, id: ProductId, mutate: ProductMutation)
    -> Result<Modified, ModifyError>;

    /// Remove a document, returning what was removed.
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
}

/// Sort by creation time, ties broken by id so the order is stable.
pub(crate) fn sort_products(products: &mut [Product], order: ListOrder) {
    products.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id_typed().cmp(&b.id_typed()))
    });
    if order == ListOrder::NewestFirst {
        products.reverse();
    }
}
