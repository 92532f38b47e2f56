//! Request handling: one gateway event in, one response out.
//!
//! ```text
//! ApiEvent ─► preflight? ─► parse body ─► validate ─► resolve operation + options
//!                                                        │
//!   ApiResponse ◄─ respond ◄─ persist result ◄─ run ◄─ persist original ◄─ decode base64
//! ```
//!
//! Every path, including every failure, returns the execution trace collected
//! so far. Persistence never aborts a request: its outcome is reported in
//! `s3Info`. The operation and its options are resolved before anything is
//! stored, so a request that cannot be processed leaves no objects behind.
//!
//! Transport status is 200 for every response unless
//! [`HttpConfig::semantic_status`](crate::config::HttpConfig) is set; clients
//! read `success` from the body.

use crate::config::ServiceConfig;
use crate::imaging::{ImageData, ImagingError};
use crate::operations::{self, DispatchError, OptionBag, TransformResult, TransformSpec};
use crate::output::format_bytes;
use crate::storage::{self, ObjectStore, PersistRequest, StorageReference};
use crate::trace::ExecutionTrace;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Key prefix for uploads in the original-files bucket.
pub const ORIGINALS_PREFIX: &str = "originals";

const SUCCESS_MESSAGE: &str = "File processed successfully!";
const MISSING_PARAMETERS: &str = "Missing required parameters";

/// Gateway-style HTTP event. Only the method and body are consulted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiEvent {
    fn is_preflight(&self) -> bool {
        self.http_method
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case("OPTIONS"))
    }
}

/// Gateway-style HTTP response. `body` is a serialized JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Request body as sent by the client. Unknown fields (e.g. `contentType`)
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub operation: Option<String>,
    pub file_name: Option<String>,
    pub file_data: Option<String>,
    pub options: Option<Value>,
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("{0}")]
    Validation(String),
    #[error("Operation '{0}' is not supported")]
    UnsupportedOperation(String),
    #[error("{0}")]
    Decode(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RequestError {
    /// HTTP status the failure would carry without the always-200 policy.
    pub fn status(&self) -> u16 {
        match self {
            RequestError::Validation(_)
            | RequestError::UnsupportedOperation(_)
            | RequestError::Decode(_) => 400,
            RequestError::Internal(_) => 500,
        }
    }
}

impl From<DispatchError> for RequestError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::UnsupportedOperation(op) => RequestError::UnsupportedOperation(op),
            DispatchError::InvalidOptions { .. } => RequestError::Validation(e.to_string()),
            DispatchError::Imaging(e) => e.into(),
        }
    }
}

impl From<ImagingError> for RequestError {
    fn from(e: ImagingError) -> Self {
        match e {
            ImagingError::UnknownFormat | ImagingError::Decode(_) => {
                RequestError::Decode(e.to_string())
            }
            ImagingError::Encode { .. } => RequestError::Internal(e.to_string()),
        }
    }
}

/// A validated request, ready to run.
struct Job {
    operation: String,
    file_name: String,
    spec: TransformSpec,
    data: ImageData,
}

/// Everything a success response reports.
struct Completed {
    job: Job,
    result: TransformResult,
    original: StorageReference,
    processed: StorageReference,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessBody<'a> {
    success: bool,
    message: &'a str,
    operation: &'a str,
    original_file_name: &'a str,
    processing_details: &'a str,
    download_url: Option<&'a str>,
    logs: &'a ExecutionTrace,
    s3_info: StorageInfo<'a>,
}

#[derive(Serialize)]
struct StorageInfo<'a> {
    original: &'a StorageReference,
    processed: &'a StorageReference,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: String,
    logs: &'a ExecutionTrace,
}

#[derive(Serialize)]
struct PreflightBody<'a> {
    message: &'a str,
    logs: &'a ExecutionTrace,
}

/// Cross-origin headers attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET,POST,OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type"),
        ("Content-Type", "application/json"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// The request handler. Holds the process-wide configuration and the
/// injected object store; stateless between calls.
pub struct Handler {
    config: ServiceConfig,
    store: Arc<dyn ObjectStore>,
}

impl Handler {
    pub fn new(config: ServiceConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Handle one event. Never fails: every outcome is a response.
    pub fn handle(&self, event: &ApiEvent) -> ApiResponse {
        let mut trace = ExecutionTrace::new();
        trace.record("Image processor invoked");
        tracing::info!(method = event.http_method.as_deref().unwrap_or("-"), "request received");

        if event.is_preflight() {
            trace.record("CORS preflight handled");
            let body = PreflightBody {
                message: "CORS OK",
                logs: &trace,
            };
            return self.respond(200, &body);
        }

        match self.process(event, &mut trace) {
            Ok(done) => {
                let body = SuccessBody {
                    success: true,
                    message: SUCCESS_MESSAGE,
                    operation: &done.job.operation,
                    original_file_name: &done.job.file_name,
                    processing_details: &done.result.details,
                    download_url: done.processed.download_url.as_deref(),
                    logs: &trace,
                    s3_info: StorageInfo {
                        original: &done.original,
                        processed: &done.processed,
                    },
                };
                self.respond(200, &body)
            }
            Err(err) => {
                match &err {
                    RequestError::Internal(_) => tracing::error!(error = %err, "request failed"),
                    _ => tracing::warn!(error = %err, "request rejected"),
                }
                let body = ErrorBody {
                    success: false,
                    message: err.to_string(),
                    logs: &trace,
                };
                self.respond(err.status(), &body)
            }
        }
    }

    fn process(
        &self,
        event: &ApiEvent,
        trace: &mut ExecutionTrace,
    ) -> Result<Completed, RequestError> {
        let job = self.prepare(event, trace)?;
        let storage = &self.config.storage;

        trace.record("Saving original file...");
        let original = storage::persist(
            self.store.as_ref(),
            job.data.bytes(),
            &PersistRequest {
                original_name: &job.file_name,
                bucket: &storage.original_bucket,
                prefix: ORIGINALS_PREFIX,
                extension: None,
                url_expiry: storage.url_expiry(),
            },
        );
        record_persist_outcome(trace, &original, "Original file saved", "original");

        trace.record(format!("Starting processing ({})...", job.operation));
        let started = Instant::now();
        let result = operations::run(&job.spec, &job.data, trace)
            .inspect_err(|e| trace.record_error(e))?;
        trace.record(format!(
            "Processing finished in {:.2}s",
            started.elapsed().as_secs_f64()
        ));

        trace.record("Saving processed file...");
        let prefix = format!("processed/{}", job.operation);
        let processed = storage::persist(
            self.store.as_ref(),
            &result.buffer,
            &PersistRequest {
                original_name: &job.file_name,
                bucket: &storage.processed_bucket,
                prefix: &prefix,
                extension: Some(result.extension()),
                url_expiry: storage.url_expiry(),
            },
        );
        record_persist_outcome(trace, &processed, "Processed file saved", "processed");

        trace.record("Execution completed successfully");
        Ok(Completed {
            job,
            result,
            original,
            processed,
        })
    }

    /// Parse, validate and decode the request. Nothing is stored yet.
    fn prepare(&self, event: &ApiEvent, trace: &mut ExecutionTrace) -> Result<Job, RequestError> {
        trace.record("Parsing request body...");
        let body = parse_body(event.body.as_deref()).inspect_err(|e| trace.record_error(e))?;

        trace.record(format!(
            "Operation: {}, file: {}",
            body.operation.as_deref().unwrap_or("<missing>"),
            body.file_name.as_deref().unwrap_or("<missing>"),
        ));

        let (Some(operation), Some(file_name), Some(file_data)) = (
            non_empty(body.operation),
            non_empty(body.file_name),
            non_empty(body.file_data),
        ) else {
            trace.record_error(MISSING_PARAMETERS);
            return Err(RequestError::Validation(MISSING_PARAMETERS.to_string()));
        };

        let options = option_bag(body.options).inspect_err(|e| trace.record_error(e))?;
        let resolved = operations::resolve(&operation, trace)?;
        let spec = operations::parse_options(
            resolved,
            &options,
            self.config.limits.max_output_pixels,
            trace,
        )?;
        tracing::info!(operation = %resolved, file = %file_name, "processing request");

        trace.record("Decoding base64 file data...");
        let bytes = decode_base64(&file_data).inspect_err(|e| trace.record_error(e))?;
        trace.record(format!("File decoded: {}", format_bytes(bytes.len() as u64)));

        let limit = self.config.limits.max_upload_bytes;
        if bytes.is_empty() {
            let err = RequestError::Validation("File data is empty".to_string());
            trace.record_error(&err);
            return Err(err);
        }
        if bytes.len() > limit {
            let err = RequestError::Validation(format!(
                "File too large: {} (maximum {})",
                format_bytes(bytes.len() as u64),
                format_bytes(limit as u64)
            ));
            trace.record_error(&err);
            return Err(err);
        }

        let data = ImageData::new(bytes, Some(&file_name));
        Ok(Job {
            operation,
            file_name,
            spec,
            data,
        })
    }

    fn respond<T: Serialize>(&self, status: u16, body: &T) -> ApiResponse {
        let status_code = if self.config.http.semantic_status {
            status
        } else {
            200
        };
        let body = serde_json::to_string(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "response serialization failed");
            serde_json::json!({
                "success": false,
                "message": format!("Internal error: {e}"),
                "logs": [],
            })
            .to_string()
        });
        ApiResponse {
            status_code,
            headers: cors_headers(),
            body,
        }
    }
}

fn record_persist_outcome(
    trace: &mut ExecutionTrace,
    reference: &StorageReference,
    saved: &str,
    which: &str,
) {
    if reference.saved {
        trace.record(saved);
    } else {
        trace.record_warning(format!(
            "Failed to save {which} file: {}",
            reference.error.as_deref().unwrap_or("unknown error")
        ));
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse the raw body. An absent body is an empty object.
fn parse_body(raw: Option<&str>) -> Result<RequestBody, RequestError> {
    let raw = raw.unwrap_or("{}");
    serde_json::from_str(raw)
        .map_err(|e| RequestError::Validation(format!("Invalid request body: {e}")))
}

/// `null` or absent options mean "all defaults".
fn option_bag(options: Option<Value>) -> Result<OptionBag, RequestError> {
    match options {
        None | Some(Value::Null) => Ok(OptionBag::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(RequestError::Validation(format!(
            "options must be an object, got {other}"
        ))),
    }
}

/// Decode standard base64, tolerating a `data:` URL prefix and line breaks.
fn decode_base64(encoded: &str) -> Result<Vec<u8>, RequestError> {
    let payload = match encoded.split_once(";base64,") {
        Some((scheme, rest)) if scheme.starts_with("data:") => rest,
        _ => encoded,
    };
    let cleaned: String = payload.split_ascii_whitespace().collect();
    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| RequestError::Decode(format!("Invalid base64 file data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{
        MockStore, RecordedCall, body_event, gradient_png, gray_png, post_event, response_json,
    };
    use serde_json::json;

    fn handler_with(store: Arc<MockStore>) -> Handler {
        Handler::new(ServiceConfig::default(), store)
    }

    fn messages(body: &Value) -> Vec<String> {
        body["logs"]
            .as_array()
            .unwrap()
            .iter()
            .map(|line| {
                let line = line.as_str().unwrap();
                // Strip the "[HH:MM:SS] - " stamp.
                line.split_once("] - ").unwrap().1.to_string()
            })
            .collect()
    }

    // =========================================================================
    // Success path
    // =========================================================================

    #[test]
    fn thumbnail_request_succeeds() {
        let store = Arc::new(MockStore::new());
        let handler = handler_with(store.clone());
        let event = post_event(
            "create-thumbnail",
            "a.png",
            &gradient_png(200, 100),
            json!({"size": 100}),
        );

        let response = handler.handle(&event);
        assert_eq!(response.status_code, 200);
        let body = response_json(&response.body);

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "File processed successfully!");
        assert_eq!(body["operation"], "create-thumbnail");
        assert_eq!(body["originalFileName"], "a.png");
        assert_eq!(body["processingDetails"], "Thumbnail 100x50 created");
        assert_eq!(body["s3Info"]["original"]["saved"], true);
        assert_eq!(body["s3Info"]["processed"]["saved"], true);
        assert_eq!(
            body["downloadUrl"],
            body["s3Info"]["processed"]["downloadUrl"]
        );

        let keys = store.put_keys();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].starts_with("originals/"));
        assert!(keys[0].ends_with("_a.png"));
        assert!(keys[1].starts_with("processed/create-thumbnail/"));
        assert!(keys[1].ends_with("_a.jpg"));
    }

    #[test]
    fn success_trace_order() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store).handle(&post_event(
            "image-to-bw",
            "p.png",
            &gradient_png(8, 8),
            json!({}),
        ));
        let messages = messages(&response_json(&response.body));

        let position = |needle: &str| {
            messages
                .iter()
                .position(|m| m.starts_with(needle))
                .unwrap_or_else(|| panic!("missing {needle:?} in {messages:?}"))
        };
        assert_eq!(messages[0], "Image processor invoked");
        assert!(position("Parsing request body") < position("Operation: image-to-bw"));
        assert!(position("File decoded:") < position("Saving original file"));
        assert!(position("Original file saved") < position("Starting processing (image-to-bw)"));
        assert!(position("Processing operation: image-to-bw") < position("Processing finished in"));
        assert!(position("Processed file saved") < position("Execution completed successfully"));
    }

    #[test]
    fn grayscale_source_enhance_skips_saturation() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store).handle(&post_event(
            "enhance-image",
            "g.png",
            &gray_png(12, 12),
            json!({"brightness": 1.5, "saturation": 2.0}),
        ));
        let body = response_json(&response.body);
        assert_eq!(body["success"], true);
        let messages = messages(&body);
        assert!(messages.iter().any(|m| m == "Brightness 1.5"));
        assert!(!messages.iter().any(|m| m.starts_with("Saturation")));
    }

    #[test]
    fn null_options_use_defaults() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store).handle(&post_event(
            "resize-image",
            "wide.png",
            &gradient_png(1600, 400),
            Value::Null,
        ));
        let body = response_json(&response.body);
        assert_eq!(body["processingDetails"], "Resized from 1600x400 to 800x200");
    }

    // =========================================================================
    // Preflight
    // =========================================================================

    #[test]
    fn preflight_short_circuits() {
        let store = Arc::new(MockStore::new());
        let event = ApiEvent {
            http_method: Some("OPTIONS".into()),
            body: None,
        };
        let response = handler_with(store.clone()).handle(&event);
        let body = response_json(&response.body);

        assert_eq!(response.status_code, 200);
        assert_eq!(body["message"], "CORS OK");
        assert_eq!(
            messages(&body),
            vec!["Image processor invoked", "CORS preflight handled"]
        );
        assert!(body.get("success").is_none());
        assert!(store.calls().is_empty());
    }

    #[test]
    fn every_response_carries_cors_headers() {
        let handler = handler_with(Arc::new(MockStore::new()));
        for event in [
            ApiEvent {
                http_method: Some("OPTIONS".into()),
                body: None,
            },
            body_event(json!({})),
            post_event("image-to-pdf", "x.png", &gradient_png(4, 4), json!({})),
        ] {
            let headers = handler.handle(&event).headers;
            assert_eq!(headers["Access-Control-Allow-Origin"], "*");
            assert_eq!(headers["Access-Control-Allow-Methods"], "GET,POST,OPTIONS");
            assert_eq!(headers["Access-Control-Allow-Headers"], "Content-Type");
        }
    }

    // =========================================================================
    // Failures
    // =========================================================================

    #[test]
    fn missing_fields_fail_validation() {
        for body in [
            json!({"fileName": "a.png", "fileData": "AAAA"}),
            json!({"operation": "image-to-bw", "fileData": "AAAA"}),
            json!({"operation": "image-to-bw", "fileName": "a.png"}),
            json!({"operation": "", "fileName": "a.png", "fileData": "AAAA"}),
        ] {
            let store = Arc::new(MockStore::new());
            let response = handler_with(store.clone()).handle(&body_event(body));
            let json = response_json(&response.body);

            assert_eq!(response.status_code, 200);
            assert_eq!(json["success"], false);
            assert_eq!(json["message"], "Missing required parameters");
            assert_eq!(
                messages(&json).last().map(String::as_str),
                Some("ERROR: Missing required parameters")
            );
            assert!(store.calls().is_empty());
        }
    }

    #[test]
    fn unsupported_operation_never_persists() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store.clone()).handle(&post_event(
            "rotate-image",
            "a.png",
            &gradient_png(4, 4),
            json!({}),
        ));
        let body = response_json(&response.body);

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Operation 'rotate-image' is not supported");
        assert!(store.calls().is_empty());
    }

    #[test]
    fn invalid_options_never_persist() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store.clone()).handle(&post_event(
            "resize-image",
            "a.png",
            &gradient_png(4, 4),
            json!({"width": 0}),
        ));
        let body = response_json(&response.body);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid options for resize-image"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn oversized_exact_resize_rejected_before_storage() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store.clone()).handle(&post_event(
            "resize-image",
            "tiny.png",
            &gradient_png(2, 2),
            json!({"width": 200_000, "height": 200_000, "maintainRatio": false}),
        ));
        let body = response_json(&response.body);

        assert_eq!(response.status_code, 200);
        assert_eq!(body["success"], false);
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Invalid options for resize-image"), "{message}");
        assert!(message.contains("200000x200000"), "{message}");
        assert!(
            messages(&body)
                .last()
                .is_some_and(|m| m.starts_with("ERROR: Invalid options"))
        );
        assert!(store.calls().is_empty());
    }

    #[test]
    fn output_pixel_limit_is_configurable() {
        let mut config = ServiceConfig::default();
        config.limits.max_output_pixels = 1_000;
        config.http.semantic_status = true;
        let handler = Handler::new(config, Arc::new(MockStore::new()));

        let response = handler.handle(&post_event(
            "resize-image",
            "a.png",
            &gradient_png(4, 4),
            json!({"width": 40, "height": 40, "maintainRatio": false}),
        ));
        assert_eq!(response.status_code, 400);

        let ok = handler.handle(&post_event(
            "resize-image",
            "a.png",
            &gradient_png(4, 4),
            json!({"width": 40, "height": 25, "maintainRatio": false}),
        ));
        assert_eq!(ok.status_code, 200);
        assert_eq!(response_json(&ok.body)["processingDetails"], "Resized from 4x4 to 40x25");
    }

    #[test]
    fn malformed_base64_is_decode_error() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store.clone()).handle(&body_event(json!({
            "operation": "image-to-bw",
            "fileName": "a.png",
            "fileData": "@@not base64@@",
        })));
        let body = response_json(&response.body);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid base64"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn unreadable_image_fails_after_original_saved() {
        let store = Arc::new(MockStore::new());
        let response = handler_with(store.clone()).handle(&post_event(
            "image-to-bw",
            "notes.txt",
            b"just some text",
            json!({}),
        ));
        let body = response_json(&response.body);

        assert_eq!(body["success"], false);
        assert!(messages(&body).iter().any(|m| m.starts_with("ERROR: ")));
        // The original is persisted before processing begins.
        assert_eq!(store.put_keys().len(), 1);
    }

    #[test]
    fn oversized_upload_rejected() {
        let mut config = ServiceConfig::default();
        config.limits.max_upload_bytes = 64;
        let store = Arc::new(MockStore::new());
        let handler = Handler::new(config, store.clone());

        let response = handler.handle(&post_event(
            "image-to-bw",
            "big.png",
            &gradient_png(32, 32),
            json!({}),
        ));
        let body = response_json(&response.body);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("File too large"));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn malformed_json_body_is_validation_error() {
        let event = ApiEvent {
            http_method: Some("POST".into()),
            body: Some("{not json".into()),
        };
        let response = handler_with(Arc::new(MockStore::new())).handle(&event);
        let body = response_json(&response.body);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[test]
    fn storage_failure_is_not_fatal() {
        let store = Arc::new(MockStore::failing_puts("connection reset by peer"));
        let response = handler_with(store.clone()).handle(&post_event(
            "create-thumbnail",
            "a.png",
            &gradient_png(20, 10),
            json!({}),
        ));
        let body = response_json(&response.body);

        assert_eq!(body["success"], true);
        assert_eq!(body["s3Info"]["original"]["saved"], false);
        assert_eq!(body["s3Info"]["processed"]["saved"], false);
        assert_eq!(
            body["s3Info"]["processed"]["error"],
            "storage backend error: connection reset by peer"
        );
        assert!(body["downloadUrl"].is_null());
        assert!(
            messages(&body)
                .iter()
                .any(|m| m.starts_with("WARNING: Failed to save original file"))
        );
        // Both puts attempted, neither presigned.
        assert!(
            store
                .calls()
                .iter()
                .all(|c| matches!(c, RecordedCall::Put { .. }))
        );
    }

    // =========================================================================
    // Status policy
    // =========================================================================

    #[test]
    fn semantic_status_opt_in() {
        let mut config = ServiceConfig::default();
        config.http.semantic_status = true;
        let handler = Handler::new(config, Arc::new(MockStore::new()));

        let response = handler.handle(&body_event(json!({"operation": "image-to-bw"})));
        assert_eq!(response.status_code, 400);

        let ok = handler.handle(&post_event("image-to-bw", "a.png", &gradient_png(4, 4), json!({})));
        assert_eq!(ok.status_code, 200);
    }

    #[test]
    fn error_statuses() {
        assert_eq!(RequestError::Validation("x".into()).status(), 400);
        assert_eq!(RequestError::UnsupportedOperation("x".into()).status(), 400);
        assert_eq!(RequestError::Decode("x".into()).status(), 400);
        assert_eq!(RequestError::Internal("x".into()).status(), 500);
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn base64_accepts_data_url_and_newlines() {
        assert_eq!(decode_base64("aGVs\nbG8=").unwrap(), b"hello");
        assert_eq!(
            decode_base64("data:image/png;base64,aGVsbG8=").unwrap(),
            b"hello"
        );
    }

    #[test]
    fn options_must_be_object() {
        assert!(option_bag(Some(json!([1, 2]))).is_err());
        assert!(option_bag(Some(Value::Null)).unwrap().is_empty());
        assert!(option_bag(None).unwrap().is_empty());
    }
}
