//! Lazily re-fetched product list.
//!
//! ```text
//! mutation succeeds → CatalogEvent published → subscription queued
//! next list_products() → drain queue → stale? → one GET /products
//! ```
//!
//! Fetches are serialised, so concurrent readers share one request. A fetch
//! already in flight is never restarted: an invalidation that lands during it
//! stays queued and the following read fetches again.

use std::sync::{Arc, Mutex};

use shopdeck_events::Subscription;
use shopdeck_products::{CatalogEvent, Product};

use crate::api::CatalogApi;
use crate::error::ClientError;

#[derive(Debug, Default)]
struct ListCache {
    products: Vec<Product>,
    fresh: bool,
}

pub struct ProductList {
    api: Arc<dyn CatalogApi>,
    invalidations: Mutex<Subscription<CatalogEvent>>,
    cache: tokio::sync::Mutex<ListCache>,
}

impl core::fmt::Debug for ProductList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductList").finish_non_exhaustive()
    }
}

impl ProductList {
    pub fn new(api: Arc<dyn CatalogApi>, invalidations: Subscription<CatalogEvent>) -> Self {
        Self {
            api,
            invalidations: Mutex::new(invalidations),
            cache: tokio::sync::Mutex::new(ListCache::default()),
        }
    }

    /// The current product list, fetched only when stale.
    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        let mut cache = self.cache.lock().await;

        if self.take_invalidations() > 0 {
            cache.fresh = false;
        }
        if cache.fresh {
            return Ok(cache.products.clone());
        }

        match self.api.list_products().await {
            Ok(products) => {
                tracing::debug!(count = products.len(), "product list fetched");
                cache.products = products;
                cache.fresh = true;
                Ok(cache.products.clone())
            }
            Err(e) => {
                tracing::warn!(error = %e, "product list fetch failed");
                Err(e)
            }
        }
    }

    /// Force the next read to fetch.
    pub async fn invalidate(&self) {
        self.cache.lock().await.fresh = false;
    }

    /// Last fetched list without touching the network. Empty before the first
    /// successful fetch, and while a fetch holds the cache.
    pub fn cached(&self) -> Vec<Product> {
        self.cache
            .try_lock()
            .map(|c| c.products.clone())
            .unwrap_or_default()
    }

    fn take_invalidations(&self) -> usize {
        match self.invalidations.lock() {
            Ok(sub) => sub.drain(),
            // A poisoned subscription can no longer be trusted; always refetch.
            Err(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use shopdeck_events::{EventBus, InMemoryEventBus};
    use shopdeck_products::{ProductForm, ProductId};
    use tokio::sync::Notify;

    use super::*;

    #[derive(Default)]
    struct CountingApi {
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
        fail: bool,
    }

    #[async_trait]
    impl CatalogApi for CountingApi {
        async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(ClientError::Network("connection refused".into()));
            }
            Ok(Vec::new())
        }

        async fn create_product(&self, _form: ProductForm) -> Result<Product, ClientError> {
            unimplemented!()
        }

        async fn update_product(
            &self,
            _id: ProductId,
            _form: ProductForm,
        ) -> Result<Product, ClientError> {
            unimplemented!()
        }

        async fn delete_product(&self, _id: ProductId) -> Result<(), ClientError> {
            unimplemented!()
        }
    }

    fn deleted() -> CatalogEvent {
        CatalogEvent::ProductDeleted {
            product_id: ProductId::new(),
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn fetches_once_until_invalidated() {
        let api = Arc::new(CountingApi::default());
        let bus = InMemoryEventBus::new();
        let list = ProductList::new(api.clone(), bus.subscribe());

        list.list_products().await.unwrap();
        list.list_products().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        // a burst of events is one invalidation
        bus.publish(deleted()).unwrap();
        bus.publish(deleted()).unwrap();
        list.list_products().await.unwrap();
        list.list_products().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_request() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(CountingApi {
            gate: Some(gate.clone()),
            ..CountingApi::default()
        });
        let bus = InMemoryEventBus::new();
        let list = ProductList::new(api.clone(), bus.subscribe());

        let release = async {
            tokio::task::yield_now().await;
            gate.notify_one();
        };
        let (a, b, ()) = tokio::join!(list.list_products(), list.list_products(), release);

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_during_a_fetch_leaves_the_list_stale() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(CountingApi {
            gate: Some(gate.clone()),
            ..CountingApi::default()
        });
        let bus = InMemoryEventBus::new();
        let list = ProductList::new(api.clone(), bus.subscribe());

        let during = async {
            tokio::task::yield_now().await;
            bus.publish(deleted()).unwrap();
            gate.notify_one();
        };
        let (first, ()) = tokio::join!(list.list_products(), during);
        first.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        list.list_products().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_fetches_are_retried_on_the_next_read_only() {
        let api = Arc::new(CountingApi {
            fail: true,
            ..CountingApi::default()
        });
        let bus = InMemoryEventBus::new();
        let list = ProductList::new(api.clone(), bus.subscribe());

        assert!(matches!(list.list_products().await, Err(ClientError::Network(_))));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
        assert!(list.list_products().await.is_err());
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert!(list.cached().is_empty());
    }

    #[tokio::test]
    async fn manual_invalidate_forces_a_fetch() {
        let api = Arc::new(CountingApi::default());
        let bus = InMemoryEventBus::new();
        let list = ProductList::new(api.clone(), bus.subscribe());

        list.list_products().await.unwrap();
        list.invalidate().await;
        list.list_products().await.unwrap();
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }
}
