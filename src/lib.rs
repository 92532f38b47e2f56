//! # imgrelay
//!
//! A synchronous image-transform request handler. Each invocation takes one
//! uploaded image and an operation name, runs one of five transforms, stores
//! both the original and the result in object storage, and answers with a
//! download link plus the execution trace of everything that happened.
//!
//! # Architecture: One Request, One Pass
//!
//! ```text
//! event ─► parse + validate ─► resolve operation/options ─► decode base64
//!       ─► persist original ─► transform ─► persist result ─► response
//! ```
//!
//! Every stage appends to an [`ExecutionTrace`](trace::ExecutionTrace) that
//! is returned verbatim to the caller, on success and on failure. Storage
//! failures are recorded and reported but never abort the request.
//!
//! # Operations
//!
//! | Identifier | Result |
//! |---|---|
//! | `resize-image` | Fit inside (or force) width×height, JPEG q95 |
//! | `image-to-bw` | Single-channel luminance, JPEG q90 |
//! | `create-thumbnail` | Fit inside size×size, JPEG q90 |
//! | `enhance-image` | Brightness → contrast → saturation, JPEG q95 |
//! | `image-to-pdf` | Single-page PDF |
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`handler`] | Request model, validation, pipeline orchestration, response assembly |
//! | [`operations`] | Operation identifiers, typed options, the five transforms, the dispatcher |
//! | [`imaging`] | Codec layer, dimension math, color adjustments, PDF writer |
//! | [`storage`] | `ObjectStore` trait, key layout, never-failing `persist`, S3 backend |
//! | [`trace`] | Per-invocation timestamped execution trace |
//! | [`config`] | Layered configuration: defaults → TOML file → environment |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Always 200
//!
//! Browser clients calling across origins get opaque failures for non-2xx
//! responses unless the gateway is configured just right. Every response is
//! therefore transport status 200 and carries `success` in the body. Set
//! `http.semantic_status = true` to get 400/500 instead.
//!
//! ## Injected Storage
//!
//! The [`handler::Handler`] receives its [`storage::ObjectStore`] at
//! construction. Production wires in [`storage::S3Store`]; tests use an
//! in-memory recorder. There is no global client.
//!
//! ## Validate Before Storing
//!
//! The operation identifier and its options are parsed into a
//! [`operations::TransformSpec`] before the original is uploaded. A request
//! that names an unknown operation, or passes a nonsensical option, never
//! leaves an object behind.

pub mod config;
pub mod handler;
pub mod imaging;
pub mod logging;
pub mod operations;
pub mod output;
pub mod storage;
pub mod trace;

#[cfg(test)]
pub(crate) mod test_helpers;
