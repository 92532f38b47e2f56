//! S3 backend built on Apache OpenDAL.
//!
//! | Call | OpenDAL |
//! |---|---|
//! | `put` | `Operator::write` |
//! | `presign_get` | `Operator::presign_read` |
//!
//! OpenDAL is async-only for presigning, while the handler is a plain
//! blocking call chain. The store owns a current-thread Tokio runtime and
//! blocks on each request; nothing else ever runs on it.
//!
//! Credentials come from the usual AWS sources (environment, profile,
//! instance metadata), resolved by OpenDAL.

use super::{ObjectStore, StorageError};
use crate::config::StorageConfig;
use opendal::Operator;
use opendal::services::S3;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

fn backend_error(e: opendal::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// S3 (or S3-compatible) object store.
pub struct S3Store {
    runtime: Runtime,
    region: String,
    endpoint: Option<String>,
}

impl S3Store {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            runtime,
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    /// Build an operator for one bucket. Cheap: no I/O happens here.
    fn operator(&self, bucket: &str) -> Result<Operator, StorageError> {
        let mut builder = S3::default().bucket(bucket).region(&self.region);
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint);
        }
        Ok(Operator::new(builder).map_err(backend_error)?.finish())
    }
}

impl ObjectStore for S3Store {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let op = self.operator(bucket)?;
        self.runtime
            .block_on(op.write(key, data.to_vec()))
            .map_err(backend_error)?;
        Ok(())
    }

    fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String, StorageError> {
        let op = self.operator(bucket)?;
        let request = self
            .runtime
            .block_on(op.presign_read(key, expires))
            .map_err(backend_error)?;
        Ok(request.uri().to_string())
    }
}
