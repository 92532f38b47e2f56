//! Object storage persistence.
//!
//! The [`ObjectStore`] trait is the seam between the pipeline and whatever
//! holds the bytes. The production implementation is [`S3Store`]; tests use a
//! recording mock. The store is injected into the handler at startup, never
//! reached through a global.
//!
//! [`persist`] wraps a store with the behavior callers rely on:
//!
//! - key layout `{prefix}/{YYYYMMDD_HHMMSS}_{name}` (with the extension
//!   swapped when the output format differs from the upload),
//! - a time-limited download URL,
//! - **no error ever escapes**: every failure becomes a
//!   [`StorageReference`] with `saved: false` and a message.

mod s3;

pub use s3::S3Store;

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("missing bucket or data")]
    MissingInput,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for object storage backends.
///
/// Both calls are blocking. Implementations must not retry; the caller
/// decides what a failure means.
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key` in `bucket`, replacing any existing object.
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// A URL granting read access to the object for `expires`.
    fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String, StorageError>;
}

/// Outcome of one persistence attempt, serialized into the response as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageReference {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StorageReference {
    fn failed(bucket: Option<&str>, error: impl ToString) -> Self {
        Self {
            saved: false,
            bucket: bucket.map(str::to_string),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Where and how to persist one buffer.
#[derive(Debug, Clone, Copy)]
pub struct PersistRequest<'a> {
    /// Upload file name as the caller sent it.
    pub original_name: &'a str,
    pub bucket: &'a str,
    pub prefix: &'a str,
    /// Replace the original extension (e.g. `jpg` for a converted PNG).
    pub extension: Option<&'a str>,
    /// Lifetime of the presigned download URL.
    pub url_expiry: Duration,
}

/// Strip the final extension from a file name.
///
/// A leading dot is part of the name (`.hidden` stays `.hidden`), matching how
/// file name stems are usually understood.
pub fn base_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(pos) => &file_name[..pos],
    }
}

/// Compose the object key for an upload at time `at`.
pub fn object_key(
    prefix: &str,
    original_name: &str,
    extension: Option<&str>,
    at: DateTime<Local>,
) -> String {
    let timestamp = at.format("%Y%m%d_%H%M%S");
    match extension {
        Some(ext) => format!("{prefix}/{timestamp}_{}.{ext}", base_name(original_name)),
        None => format!("{prefix}/{timestamp}_{original_name}"),
    }
}

/// Persist `data` and describe the outcome. Never fails.
pub fn persist(
    store: &dyn ObjectStore,
    data: &[u8],
    request: &PersistRequest<'_>,
) -> StorageReference {
    persist_at(store, data, request, Local::now())
}

pub(crate) fn persist_at(
    store: &dyn ObjectStore,
    data: &[u8],
    request: &PersistRequest<'_>,
    at: DateTime<Local>,
) -> StorageReference {
    if request.bucket.is_empty() || data.is_empty() {
        return StorageReference::failed(None, StorageError::MissingInput);
    }

    let key = object_key(request.prefix, request.original_name, request.extension, at);
    let bucket = request.bucket;

    let url = store
        .put(bucket, &key, data)
        .and_then(|()| store.presign_get(bucket, &key, request.url_expiry));

    match url {
        Ok(url) => {
            tracing::info!(bucket, key = %key, bytes = data.len(), "object stored");
            StorageReference {
                saved: true,
                bucket: Some(bucket.to_string()),
                key: Some(key),
                download_url: Some(url),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(bucket, key = %key, error = %e, "storage error");
            StorageReference::failed(Some(bucket), e)
        }
    }
}
