//! Media store trait and upload types.

use async_trait::async_trait;

use crate::error::AppError;

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A stored file, addressed by its public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: String,
}

/// Persists uploaded images and returns the URL they are served from.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores one upload.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unsupported formats or empty files.
    /// Returns [`AppError::Internal`] if the file cannot be written.
    async fn store(&self, upload: Upload) -> Result<StoredMedia, AppError>;
}
