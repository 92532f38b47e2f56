//! Operation identifiers and the dispatcher.
//!
//! | Identifier | Transform | Output |
//! |---|---|---|
//! | `resize-image` | [`transforms::resize`] | JPEG q95 |
//! | `image-to-bw` | [`transforms::grayscale`] | JPEG q90, single channel |
//! | `create-thumbnail` | [`transforms::thumbnail`] | JPEG q90 |
//! | `enhance-image` | [`transforms::enhance`] | JPEG q95 |
//! | `image-to-pdf` | [`transforms::document`] | PDF |
//!
//! Dispatch is a pure lookup: resolve the identifier, parse its options into
//! a [`TransformSpec`], then hand the source to exactly one transform.

pub mod options;
pub mod transforms;

pub use options::{EnhanceOptions, OptionBag, ResizeOptions, ThumbnailOptions, TransformSpec};
pub use transforms::TransformResult;

use crate::imaging::{ImageData, ImagingError};
use crate::trace::ExecutionTrace;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Operation '{0}' is not supported")]
    UnsupportedOperation(String),
    #[error("Invalid options for {operation}: {reason}")]
    InvalidOptions {
        operation: Operation,
        reason: String,
    },
    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

/// The closed set of supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ResizeImage,
    ImageToBw,
    CreateThumbnail,
    EnhanceImage,
    ImageToPdf,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::ResizeImage,
        Operation::ImageToBw,
        Operation::CreateThumbnail,
        Operation::EnhanceImage,
        Operation::ImageToPdf,
    ];

    /// Wire identifier, also used as the storage path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::ResizeImage => "resize-image",
            Operation::ImageToBw => "image-to-bw",
            Operation::CreateThumbnail => "create-thumbnail",
            Operation::EnhanceImage => "enhance-image",
            Operation::ImageToPdf => "image-to-pdf",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| DispatchError::UnsupportedOperation(s.to_string()))
    }
}

/// Resolve an identifier, recording the failure in the trace if it is unknown.
pub fn resolve(operation: &str, trace: &mut ExecutionTrace) -> Result<Operation, DispatchError> {
    operation.parse().inspect_err(|e| trace.record_error(e))
}

/// Parse the option bag for a resolved operation, tracing a rejection.
pub fn parse_options(
    operation: Operation,
    options: &OptionBag,
    max_output_pixels: u64,
    trace: &mut ExecutionTrace,
) -> Result<TransformSpec, DispatchError> {
    TransformSpec::parse(operation, options, max_output_pixels)
        .map_err(|reason| DispatchError::InvalidOptions { operation, reason })
        .inspect_err(|e| trace.record_error(e))
}

/// Run the transform described by `spec`.
pub fn run(
    spec: &TransformSpec,
    source: &ImageData,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    trace.record(format!("Processing operation: {}", spec.operation()));
    match spec {
        TransformSpec::Resize(opts) => transforms::resize(source, opts, trace),
        TransformSpec::Grayscale => transforms::grayscale(source, trace),
        TransformSpec::Thumbnail(opts) => transforms::thumbnail(source, opts, trace),
        TransformSpec::Enhance(opts) => transforms::enhance(source, opts, trace),
        TransformSpec::Document => transforms::document(source, trace),
    }
}

/// Map an operation identifier plus options to a transform result.
///
/// Every failure is recorded in the trace before it is returned; unknown
/// identifiers fail with [`DispatchError::UnsupportedOperation`].
pub fn dispatch(
    operation: &str,
    source: &ImageData,
    options: &OptionBag,
    max_output_pixels: u64,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, DispatchError> {
    let operation = resolve(operation, trace)?;
    let spec = parse_options(operation, options, max_output_pixels, trace)?;
    let result = run(&spec, source, trace).inspect_err(|e| trace.record_error(e))?;
    Ok(result)
}
