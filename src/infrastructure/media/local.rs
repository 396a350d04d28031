//! Local-disk media store.

use async_trait::async_trait;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::service::{MediaStore, StoredMedia, Upload};
use crate::error::AppError;
use crate::utils::image_format::ImageFormat;
use crate::utils::random_name::generate_name;

/// Writes uploads to `root` under random names.
///
/// URLs have the form `<public_base_url>/uploads/<name>.<ext>`; the server
/// mounts `root` at `/uploads`.
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    /// Creates the store, creating `root` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be created.
    pub async fn new(root: impl Into<PathBuf>, public_base_url: &str) -> std::io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, upload: Upload) -> Result<StoredMedia, AppError> {
        let detected =
            ImageFormat::detect(upload.file_name.as_deref(), upload.content_type.as_deref());
        let format = detected.ok_or_else(|| {
            AppError::bad_request(
                "Unsupported image format, use jpg, jpeg, png or webp",
                json!({
                    "file_name": upload.file_name,
                    "content_type": upload.content_type,
                }),
            )
        })?;

        if upload.bytes.is_empty() {
            return Err(AppError::bad_request(
                "Uploaded file is empty",
                json!({ "file_name": upload.file_name }),
            ));
        }

        let name = format!("{}.{}", generate_name()?, format.extension());
        let path = self.root.join(&name);

        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store upload: {}", e)))?;

        debug!(file = %path.display(), bytes = upload.bytes.len(), "Stored upload");

        Ok(StoredMedia {
            url: format!("{}/uploads/{}", self.public_base_url, name),
        })
    }
}
