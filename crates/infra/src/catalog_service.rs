//! Catalog mutation pipeline (application-level orchestration).
//!
//! ```text
//! ProductForm
//!   ↓
//! 1. Validate into a typed request (no IO yet; first violation wins)
//!   ↓
//! 2. Store uploaded images, collecting their URLs
//!   ↓
//! 3. Build / update the Product (domain invariants); updates are applied
//!    inside the repository's read-modify-write
//!   ↓
//! 4. Write the single product document
//!   ↓
//! 5. Best-effort removal of images that are no longer referenced
//! ```
//!
//! A failure in steps 2–4 leaves the catalog unchanged; images stored for the
//! failed request are removed again. Cleanup failures are logged, never
//! returned, since the catalog itself is already consistent.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use shopdeck_core::DomainError;
use shopdeck_products::{ImageUpload, Product, ProductForm, ProductId};

use crate::config::ListOrder;
use crate::images::{ImageStore, ImageStoreError};
use crate::repository::{ModifyError, ProductRepository, StorageError};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request is malformed; the caller must fix it. Never retried.
    #[error("{0}")]
    Validation(String),

    /// The target product does not exist.
    #[error("product not found")]
    NotFound,

    /// Persistence or image storage failed; state is unchanged.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for CatalogError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::NotFound => Self::NotFound,
            DomainError::InvariantViolation(msg) => Self::Validation(msg),
        }
    }
}

impl From<StorageError> for CatalogError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<ModifyError> for CatalogError {
    fn from(value: ModifyError) -> Self {
        match value {
            ModifyError::NotFound => Self::NotFound,
            ModifyError::Rejected(e) => e.into(),
            ModifyError::Storage(e) => e.into(),
        }
    }
}

impl From<ImageStoreError> for CatalogError {
    fn from(value: ImageStoreError) -> Self {
        Self::Storage(value.to_string())
    }
}

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
    images: Arc<dyn ImageStore>,
    list_order: ListOrder,
}

impl core::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CatalogService")
            .field("list_order", &self.list_order)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    pub fn new(
        repo: Arc<dyn ProductRepository>,
        images: Arc<dyn ImageStore>,
        list_order: ListOrder,
    ) -> Self {
        Self {
            repo,
            images,
            list_order,
        }
    }

    pub async fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.repo.list(self.list_order).await?)
    }

    pub async fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.repo.get(id).await?.ok_or(CatalogError::NotFound)
    }

    pub async fn create(&self, form: ProductForm) -> Result<Product, CatalogError> {
        let request = form.into_create()?;

        let urls = self.store_images(&request.images).await?;
        let product = match Product::create(ProductId::new(), request.fields, urls.clone(), Utc::now())
        {
            Ok(p) => p,
            Err(e) => {
                self.discard_images(&urls).await;
                return Err(e.into());
            }
        };

        if let Err(e) = self.repo.insert(&product).await {
            tracing::error!(product_id = %product.id_typed(), error = %e, "product insert failed");
            self.discard_images(&urls).await;
            return Err(e.into());
        }

        tracing::info!(
            product_id = %product.id_typed(),
            images = product.images().len(),
            "product created"
        );
        Ok(product)
    }

    pub async fn update(&self, id: ProductId, form: ProductForm) -> Result<Product, CatalogError> {
        let request = form.into_update()?;

        // A missing id is refused before any upload happens.
        self.get(id).await?;

        let new_urls = match &request.images {
            Some(images) => Some(self.store_images(images).await?),
            None => None,
        };
        let stored_now = new_urls.clone().unwrap_or_default();
        let replacement = new_urls.clone();
        let changes = request.changes;

        let modified = match self
            .repo
            .modify(
                id,
                Box::new(move |product: &mut Product| {
                    product.update(changes, replacement, Utc::now())
                }),
            )
            .await
        {
            Ok(modified) => modified,
            Err(e) => {
                if let ModifyError::Storage(inner) = &e {
                    tracing::error!(product_id = %id, error = %inner, "product update failed");
                }
                self.discard_images(&stored_now).await;
                return Err(e.into());
            }
        };

        // Orphans come from the document this write actually replaced.
        if let Some(current) = &new_urls {
            let orphaned: Vec<String> = modified
                .before
                .images()
                .iter()
                .filter(|url| !current.contains(url))
                .cloned()
                .collect();
            self.discard_images(&orphaned).await;
        }

        tracing::info!(
            product_id = %id,
            images_replaced = new_urls.is_some(),
            "product updated"
        );
        Ok(modified.after)
    }

    pub async fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        let removed = self.repo.delete(id).await?.ok_or(CatalogError::NotFound)?;
        self.discard_images(removed.images()).await;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn store_images(&self, images: &[ImageUpload]) -> Result<Vec<String>, CatalogError> {
        let mut urls = Vec::with_capacity(images.len());
        for image in images {
            match self.images.put(image).await {
                Ok(url) => urls.push(url),
                Err(e) => {
                    tracing::error!(file = %image.file_name, error = %e, "image upload failed");
                    self.discard_images(&urls).await;
                    return Err(e.into());
                }
            }
        }
        Ok(urls)
    }

    async fn discard_images(&self, urls: &[String]) {
        for url in urls {
            if let Err(e) = self.images.remove(url).await {
                tracing::warn!(%url, error = %e, "failed to remove image");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::InMemoryImageStore;
    use crate::repository::{InMemoryProductRepository, Modified, ProductMutation};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;
    use rust_decimal::Decimal;
    use shopdeck_products::StockStatus;

    struct Harness {
        repo: Arc<InMemoryProductRepository>,
        images: Arc<InMemoryImageStore>,
        service: CatalogService,
    }

    fn harness() -> Harness {
        let repo = Arc::new(InMemoryProductRepository::new());
        let images = Arc::new(InMemoryImageStore::new());
        let service = CatalogService::new(repo.clone(), images.clone(), ListOrder::NewestFirst);
        Harness {
            repo,
            images,
            service,
        }
    }

    fn png(name: &str) -> ImageUpload {
        ImageUpload::new(name, "image/png", b"png".to_vec())
    }

    fn mouse(images: usize) -> ProductForm {
        let mut form = ProductForm::default();
        form.set_field("name", "Mouse".into());
        form.set_field("description", "Wireless".into());
        form.set_field("price", "19.99".into());
        form.set_field("stock", "10".into());
        form.set_field("category", "Electronics".into());
        form.images = (0..images).map(|i| png(&format!("{i}.png"))).collect();
        form
    }

    /// Repository whose writes always fail.
    struct BrokenRepository;

    #[async_trait]
    impl ProductRepository for BrokenRepository {
        async fn list(&self, _order: ListOrder) -> Result<Vec<Product>, StorageError> {
            Err(StorageError::Backend("down".into()))
        }
        async fn get(&self, _id: ProductId) -> Result<Option<Product>, StorageError> {
            Err(StorageError::Backend("down".into()))
        }
        async fn insert(&self, _product: &Product) -> Result<(), StorageError> {
            Err(StorageError::Backend("down".into()))
        }
        async fn modify(
            &self,
            _id: ProductId,
            _mutate: ProductMutation,
        ) -> Result<Modified, ModifyError> {
            Err(StorageError::Backend("down".into()).into())
        }
        async fn delete(&self, _id: ProductId) -> Result<Option<Product>, StorageError> {
            Err(StorageError::Backend("down".into()))
        }
    }

    /// In-memory repository whose next `get` waits until released, so a
    /// second update can land between another update's read and write.
    #[derive(Default)]
    struct PausingRepository {
        inner: InMemoryProductRepository,
        armed: AtomicBool,
        release: Notify,
        paused: Notify,
    }

    #[async_trait]
    impl ProductRepository for PausingRepository {
        async fn list(&self, order: ListOrder) -> Result<Vec<Product>, StorageError> {
            self.inner.list(order).await
        }
        async fn get(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
            let found = self.inner.get(id).await?;
            if self.armed.swap(false, Ordering::SeqCst) {
                self.paused.notify_one();
                self.release.notified().await;
            }
            Ok(found)
        }
        async fn insert(&self, product: &Product) -> Result<(), StorageError> {
            self.inner.insert(product).await
        }
        async fn modify(
            &self,
            id: ProductId,
            mutate: ProductMutation,
        ) -> Result<Modified, ModifyError> {
            self.inner.modify(id, mutate).await
        }
        async fn delete(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn create_stores_images_and_document() {
        let h = harness();
        let p = h.service.create(mouse(1)).await.unwrap();

        assert_eq!(p.price(), Decimal::new(1999, 2));
        assert_eq!(p.stock(), 10);
        assert_eq!(p.images().len(), 1);
        assert!(h.images.contains(&p.images()[0]));
        assert_eq!(h.repo.len(), 1);
    }

    #[tokio::test]
    async fn invalid_create_touches_nothing() {
        let h = harness();
        for form in [mouse(0), mouse(4)] {
            let err = h.service.create(form).await.unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)));
        }
        assert!(h.repo.is_empty());
        assert!(h.images.is_empty());
    }

    #[tokio::test]
    async fn failed_insert_removes_the_uploaded_images() {
        let images = Arc::new(InMemoryImageStore::new());
        let service =
            CatalogService::new(Arc::new(BrokenRepository), images.clone(), ListOrder::default());

        let err = service.create(mouse(2)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn stock_only_update_keeps_the_rest() {
        let h = harness();
        let created = h.service.create(mouse(1)).await.unwrap();

        let mut form = ProductForm::default();
        form.set_field("stock", "0".into());
        let updated = h.service.update(created.id_typed(), form).await.unwrap();

        assert_eq!(updated.stock(), 0);
        assert_eq!(updated.stock_status(), StockStatus::OutOfStock);
        assert_eq!(updated.name(), created.name());
        assert_eq!(updated.price(), created.price());
        assert_eq!(updated.images(), created.images());
    }

    #[tokio::test]
    async fn replacing_images_drops_the_old_files() {
        let h = harness();
        let created = h.service.create(mouse(2)).await.unwrap();

        let mut form = ProductForm::default();
        form.images = vec![png("fresh.png")];
        let updated = h.service.update(created.id_typed(), form).await.unwrap();

        assert_eq!(updated.images().len(), 1);
        assert_eq!(h.images.len(), 1);
        for old in created.images() {
            assert!(!h.images.contains(old));
        }
    }

    #[tokio::test]
    async fn stock_update_racing_an_image_swap_keeps_the_new_images() {
        let repo = Arc::new(PausingRepository::default());
        let images = Arc::new(InMemoryImageStore::new());
        let service = CatalogService::new(repo.clone(), images.clone(), ListOrder::default());
        let created = service.create(mouse(2)).await.unwrap();
        let id = created.id_typed();

        repo.armed.store(true, Ordering::SeqCst);
        let stock_only = async {
            let mut form = ProductForm::default();
            form.set_field("stock", "3".into());
            service.update(id, form).await
        };
        let image_swap = async {
            repo.paused.notified().await;
            let mut form = ProductForm::default();
            form.images = vec![png("fresh.png")];
            let swapped = service.update(id, form).await;
            repo.release.notify_one();
            swapped
        };
        let (stock_only, image_swap) = tokio::join!(stock_only, image_swap);
        let swapped = image_swap.unwrap();
        stock_only.unwrap();

        let stored = repo.get(id).await.unwrap().unwrap();
        assert_eq!(stored.stock(), 3);
        assert_eq!(stored.images(), swapped.images());
        for url in stored.images() {
            assert!(images.contains(url), "stored image {url} was deleted");
        }
        assert_eq!(images.len(), stored.images().len());
    }

    #[tokio::test]
    async fn update_of_missing_product_creates_nothing() {
        let h = harness();
        let err = h
            .service
            .update(ProductId::new(), mouse(1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound));
        assert!(h.repo.is_empty());
        assert!(h.images.is_empty());
    }

    #[tokio::test]
    async fn delete_twice_is_ok_then_not_found() {
        let h = harness();
        let p = h.service.create(mouse(3)).await.unwrap();

        h.service.delete(p.id_typed()).await.unwrap();
        assert!(h.images.is_empty());
        assert!(matches!(
            h.service.delete(p.id_typed()).await,
            Err(CatalogError::NotFound)
        ));
    }
}
