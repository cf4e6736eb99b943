use serde::{Deserialize, Serialize};

/// An image file travelling with a create/update request.
///
/// The same shape is produced by the admin client when staging files and by
/// the gateway when decoding a multipart body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Lowercased file extension, falling back to the content subtype.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        let ext = match from_name {
            Some(ext) => ext.to_string(),
            None => self
                .content_type
                .split_once('/')
                .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub).trim().to_string())
                .unwrap_or_else(|| "bin".to_string()),
        };
        ext.to_ascii_lowercase()
    }
}

// Bytes are elided; a 3 MB vector in a log line helps nobody.
impl core::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
