//! Shared test utilities for the imgrelay test suite.
//!
//! Provides in-memory image fixtures, a recording [`MockStore`], and request
//! builders for handler tests.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let store = MockStore::new();
//! let event = post_event("create-thumbnail", "a.png", &gradient_png(200, 100), json!({}));
//! // ... run the handler ...
//! assert_eq!(store.calls().len(), 4);
//! ```

use crate::handler::ApiEvent;
use crate::storage::{ObjectStore, StorageError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;

// =========================================================================
// Image fixtures
// =========================================================================

fn png_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Solid warm-orange RGB PNG.
pub fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([220, 120, 40]),
    )))
}

/// Half-transparent teal RGBA PNG.
pub fn rgba_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        image::Rgba([30, 160, 150, 128]),
    )))
}

/// Mid-gray single channel PNG.
pub fn gray_png(width: u32, height: u32) -> Vec<u8> {
    png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        width,
        height,
        image::Luma([100]),
    )))
}

/// RGB PNG with a red/green gradient across the axes, so resampling and
/// color adjustments have something to work on.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        image::Rgb([r, g, 128])
    });
    png_bytes(DynamicImage::ImageRgb8(img))
}

// =========================================================================
// Recording object store
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Put {
        bucket: String,
        key: String,
        bytes: usize,
    },
    Presign {
        bucket: String,
        key: String,
        expires_secs: u64,
    },
}

/// Store that records calls and answers with deterministic URLs.
/// Uses Mutex (not RefCell) so it satisfies the `Send + Sync` bound.
#[derive(Default)]
pub struct MockStore {
    calls: Mutex<Vec<RecordedCall>>,
    put_failure: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `put` fails with `StorageError::Backend(message)`.
    pub fn failing_puts(message: &str) -> Self {
        Self {
            put_failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Keys of all `put` calls, in order.
    pub fn put_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Put { key, .. } => Some(key),
                RecordedCall::Presign { .. } => None,
            })
            .collect()
    }
}

impl ObjectStore for MockStore {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(RecordedCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
            bytes: data.len(),
        });
        match &self.put_failure {
            Some(message) => Err(StorageError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires: Duration,
    ) -> Result<String, StorageError> {
        self.calls.lock().unwrap().push(RecordedCall::Presign {
            bucket: bucket.to_string(),
            key: key.to_string(),
            expires_secs: expires.as_secs(),
        });
        Ok(format!(
            "https://{bucket}.example/{key}?expires={}",
            expires.as_secs()
        ))
    }
}

// =========================================================================
// Request builders
// =========================================================================

/// POST event with a JSON body built from the given parts.
pub fn post_event(operation: &str, file_name: &str, data: &[u8], options: Value) -> ApiEvent {
    body_event(json!({
        "operation": operation,
        "fileName": file_name,
        "fileData": STANDARD.encode(data),
        "options": options,
    }))
}

/// POST event carrying `body` serialized as the request body.
pub fn body_event(body: Value) -> ApiEvent {
    ApiEvent {
        http_method: Some("POST".to_string()),
        body: Some(body.to_string()),
    }
}

/// Parse the JSON body of a response.
pub fn response_json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}
