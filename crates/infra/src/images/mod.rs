//! Image storage seam.
//!
//! The catalog only ever keeps URLs; bytes live wherever the store puts them.

use async_trait::async_trait;
use thiserror::Error;

use shopdeck_products::ImageUpload;

pub mod in_memory;
pub mod local;

pub use in_memory::InMemoryImageStore;
pub use local::LocalImageStore;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("image io failure: {0}")]
    Io(#[from] std::io::Error),

    /// The URL was not issued by this store.
    #[error("image url not owned by this store: {0}")]
    NotOwned(String),

    #[error("image store lock poisoned")]
    Poisoned,
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store an image and return the public URL clients should use.
    async fn put(&self, image: &ImageUpload) -> Result<String, ImageStoreError>;

    /// Delete a previously stored image. Deleting something already gone is not an error.
    async fn remove(&self, url: &str) -> Result<(), ImageStoreError>;
}

/// File name for a stored image: random stem, sanitised extension.
pub(crate) fn stored_file_name(image: &ImageUpload) -> String {
    let ext = image.extension();
    let ext = if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        ext
    } else {
        "bin".to_string()
    };
    format!("{}.{ext}", uuid::Uuid::now_v7())
}
