//! Image previews shown in the editor.
//!
//! Local previews stand in for staged files and hold a registry entry until
//! revoked. Remote previews are the stored URLs of an existing product; they
//! are displayed but never revoked.

use std::collections::HashSet;

use shopdeck_products::ImageUpload;

/// URL scheme of locally generated previews.
pub const LOCAL_PREVIEW_SCHEME: &str = "blob:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Local(String),
    Remote(String),
}

impl Preview {
    pub fn url(&self) -> &str {
        match self {
            Preview::Local(url) | Preview::Remote(url) => url,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Preview::Local(_))
    }
}

/// Tracks live local previews so every one can be released.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next: u64,
    live: HashSet<String>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a preview for a staged file.
    pub fn create(&mut self, image: &ImageUpload) -> Preview {
        self.next += 1;
        let url = format!("{LOCAL_PREVIEW_SCHEME}preview/{}/{}", self.next, image.file_name);
        self.live.insert(url.clone());
        Preview::Local(url)
    }

    /// Release a preview. Returns whether a live local preview was revoked;
    /// remote previews are left alone.
    pub fn revoke(&mut self, preview: &Preview) -> bool {
        match preview {
            Preview::Local(url) => self.live.remove(url),
            Preview::Remote(_) => false,
        }
    }

    pub fn revoke_all<'a>(&mut self, previews: impl IntoIterator<Item = &'a Preview>) -> usize {
        previews.into_iter().filter(|p| self.revoke(p)).count()
    }

    pub fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
