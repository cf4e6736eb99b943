//! Images written to a local directory and served by the gateway under
//! `/uploads`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use shopdeck_products::ImageUpload;

use super::{ImageStore, ImageStoreError, stored_file_name};

/// URL path the gateway mounts the upload directory at.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    /// `public_base_url` is the externally visible origin of the gateway,
    /// e.g. `http://localhost:3000`.
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: format!("{}{UPLOADS_ROUTE}/", public_base_url.trim_end_matches('/')),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for_url(&self, url: &str) -> Result<PathBuf, ImageStoreError> {
        let name = url
            .strip_prefix(&self.url_prefix)
            .filter(|n| !n.is_empty() && !n.contains(['/', '\\']) && !n.starts_with('.'))
            .ok_or_else(|| ImageStoreError::NotOwned(url.to_string()))?;
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put(&self, image: &ImageUpload) -> Result<String, ImageStoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let name = stored_file_name(image);
        tokio::fs::write(self.dir.join(&name), &image.bytes).await?;
        tracing::debug!(file = %name, bytes = image.len(), "stored image");
        Ok(format!("{}{name}", self.url_prefix))
    }

    async fn remove(&self, url: &str) -> Result<(), ImageStoreError> {
        let path = self.file_for_url(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_and_deletes_files_under_the_upload_dir() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path().join("uploads");
        let store = LocalImageStore::new(&dir, "http://localhost:3000/");
        let img = ImageUpload::new("mouse.png", "image/png", b"png-bytes".to_vec());

        let url = store.put(&img).await.unwrap();
        assert!(url.starts_with("http://localhost:3000/uploads/"));

        let path = store.file_for_url(&url).unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"png-bytes");

        store.remove(&url).await.unwrap();
        assert!(!path.exists());
        store.remove(&url).await.unwrap();
    }

    #[test]
    fn rejects_urls_that_escape_the_directory() {
        let store = LocalImageStore::new("/tmp/x", "http://localhost:3000");
        for url in [
            "http://localhost:3000/uploads/../etc/passwd",
            "http://localhost:3000/uploads/",
            "http://localhost:3000/uploads/.hidden",
            "https://cdn.other/uploads/a.png",
        ] {
            assert!(store.file_for_url(url).is_err(), "{url}");
        }
    }
}
