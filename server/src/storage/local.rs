use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::storage::{BlobStore, BlobStoreError, PosterUpload, UPLOADS_PREFIX};

const MAX_NAME_ATTEMPTS: usize = 16;

/// Stores posters as files in a local directory, named by a millisecond
/// timestamp plus the original extension.
#[derive(Debug)]
pub struct LocalBlobStore {
    root: PathBuf,
    last_stamp: AtomicI64,
}

impl LocalBlobStore {
    /// Opens the store, creating `root` if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobStoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        info!(path = %root.display(), "Upload directory ready");

        Ok(Self {
            root,
            last_stamp: AtomicI64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current time in milliseconds, bumped past the last value handed out so
    /// that concurrent uploads never share a stamp.
    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_stamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        now.max(previous + 1)
    }

    fn file_name(stamp: i64, original: &str) -> String {
        match extension(original) {
            Some(ext) => format!("{stamp}.{ext}"),
            None => stamp.to_string(),
        }
    }
}

/// Extension of the client's file name, kept only if it is plain ASCII
/// alphanumerics.
fn extension(original: &str) -> Option<&str> {
    Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, upload: PosterUpload) -> Result<String, BlobStoreError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = Self::file_name(self.next_stamp(), &upload.file_name);
            let path = self.root.join(&name);

            // create_new: a leftover file from an earlier run is never overwritten
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            file.write_all(&upload.bytes).await?;
            file.flush().await?;

            debug!(
                file = %name,
                original = %upload.file_name,
                content_type = upload.content_type.as_deref().unwrap_or("unknown"),
                bytes = upload.bytes.len(),
                "Stored poster"
            );
            return Ok(format!("{UPLOADS_PREFIX}/{name}"));
        }

        Err(BlobStoreError::NameExhausted(MAX_NAME_ATTEMPTS))
    }
}
