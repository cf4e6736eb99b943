use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use shopdeck_products::ImageUpload;

use super::{ImageStore, ImageStoreError, stored_file_name};

const URL_PREFIX: &str = "memory://images/";

/// In-memory image store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    inner: RwLock<HashMap<String, ImageUpload>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inner
            .read()
            .map(|m| m.contains_key(url))
            .unwrap_or(false)
    }

    pub fn get(&self, url: &str) -> Option<ImageUpload> {
        self.inner.read().ok()?.get(url).cloned()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(&self, image: &ImageUpload) -> Result<String, ImageStoreError> {
        let url = format!("{URL_PREFIX}{}", stored_file_name(image));
        let mut map = self.inner.write().map_err(|_| ImageStoreError::Poisoned)?;
        map.insert(url.clone(), image.clone());
        Ok(url)
    }

    async fn remove(&self, url: &str) -> Result<(), ImageStoreError> {
        if !url.starts_with(URL_PREFIX) {
            return Err(ImageStoreError::NotOwned(url.to_string()));
        }
        let mut map = self.inner.write().map_err(|_| ImageStoreError::Poisoned)?;
        map.remove(url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_remove() {
        let store = InMemoryImageStore::new();
        let img = ImageUpload::new("a.png", "image/png", vec![1, 2, 3]);

        let url = store.put(&img).await.unwrap();
        assert!(url.starts_with(URL_PREFIX) && url.ends_with(".png"));
        assert_eq!(store.get(&url), Some(img));

        store.remove(&url).await.unwrap();
        assert!(store.is_empty());
        // second removal is a no-op
        store.remove(&url).await.unwrap();
    }

    #[tokio::test]
    async fn refuses_foreign_urls() {
        let store = InMemoryImageStore::new();
        assert!(matches!(
            store.remove("https://elsewhere.test/x.png").await,
            Err(ImageStoreError::NotOwned(_))
        ));
    }
}
