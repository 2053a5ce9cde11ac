//! Object storage access for incoming documents
//! Uses Apache Arrow object_store crate

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use object_store::{ObjectStore, path::Path as StoragePath};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StorageProvider};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid bucket configuration: {0}")]
    InvalidBucket(String),

    #[error("Unsupported object key '{key}': {reason}")]
    UnsupportedKey { key: String, reason: String },

    #[error("Object store error: {0}")]
    ObjectStoreError(#[from] object_store::Error),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after upload
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub bucket: String,
    pub key: String,
    pub etag: Option<String>,
    pub size: usize,
}

#[derive(Clone)]
enum Backend {
    /// One S3 client per bucket, built on demand from the ambient AWS environment
    S3 {
        region: Option<String>,
        endpoint: Option<String>,
    },
    /// Single in-process store; objects live under `<bucket>/<key>`
    Memory(Arc<InMemory>),
}

/// Path for an object key exactly as the bucket holds it
///
/// Keys are never re-encoded. Keys object_store cannot address verbatim
/// (empty segments, leading or trailing `/`, `.`/`..` segments) are refused
/// instead of being rewritten to a different object.
fn object_path(key: &str) -> Result<StoragePath> {
    let unsupported = |reason: String| StorageError::UnsupportedKey {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(unsupported("key is empty".to_string()));
    }

    let path = StoragePath::parse(key).map_err(|e| unsupported(e.to_string()))?;
    if path.as_ref() != key {
        return Err(unsupported("leading or trailing '/'".to_string()));
    }

    Ok(path)
}

/// Storage client wrapping object_store
///
/// Buckets come from the triggering event, so the client is not bound to one.
#[derive(Clone)]
pub struct StorageClient {
    backend: Backend,
}

impl StorageClient {
    /// Build the client described by configuration
    pub fn from_config(config: &StorageConfig) -> Self {
        match config.provider {
            StorageProvider::S3 => Self::s3(config.region.clone(), config.endpoint.clone()),
            StorageProvider::Memory => Self::in_memory(),
        }
    }

    /// S3-backed client; credentials come from the `AWS_*` environment
    pub fn s3(region: Option<String>, endpoint: Option<String>) -> Self {
        Self {
            backend: Backend::S3 { region, endpoint },
        }
    }

    /// Create in-memory storage for testing/development
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(InMemory::new())),
        }
    }

    fn locate(&self, bucket: &str, key: &str) -> Result<(Arc<dyn ObjectStore>, StoragePath)> {
        if bucket.is_empty() {
            return Err(StorageError::InvalidBucket("bucket name is empty".to_string()));
        }

        match &self.backend {
            Backend::S3 { region, endpoint } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint).with_allow_http(true);
                }

                let store = builder
                    .build()
                    .map_err(|e| StorageError::InvalidBucket(e.to_string()))?;

                Ok((Arc::new(store), object_path(key)?))
            }
            Backend::Memory(store) => {
                let store: Arc<dyn ObjectStore> = store.clone();
                let path = object_path(key)?;
                let path = StoragePath::parse(format!("{bucket}/{path}"))
                    .map_err(|e| StorageError::InvalidBucket(e.to_string()))?;
                Ok((store, path))
            }
        }
    }

    /// Upload bytes to storage
    pub async fn upload(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<UploadMetadata> {
        let (store, path) = self.locate(bucket, key)?;
        let size = data.len();

        let put_result = store.put(&path, data.into()).await?;

        tracing::info!(bucket, key, size, "Uploaded to storage");

        Ok(UploadMetadata {
            bucket: bucket.to_string(),
            key: key.to_string(),
            etag: put_result.e_tag,
            size,
        })
    }

    /// Download an object's full content
    pub async fn download(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let (store, path) = self.locate(bucket, key)?;

        let result = match store.get(&path).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(StorageError::NotFound(format!("{bucket}/{key}")));
            }
            Err(e) => return Err(e.into()),
        };

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(bucket, key, size = bytes.len(), "Downloaded from storage");

        Ok(bytes)
    }
}
