//! Poster uploads and where they end up.

pub mod local;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

pub use local::LocalBlobStore;

/// Public path prefix of every stored poster reference.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// A file received in the `poster` form field.
#[derive(Debug, Clone)]
pub struct PosterUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not allocate a unique name after {0} attempts")]
    NameExhausted(usize),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persists the upload and returns the reference to store on the event,
    /// e.g. `/uploads/1714586400000.png`.
    async fn store(&self, upload: PosterUpload) -> Result<String, BlobStoreError>;
}
