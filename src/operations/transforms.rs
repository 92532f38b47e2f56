//! The five transforms.
//!
//! Each one decodes the source, does its work, encodes the result and returns a
//! [`TransformResult`]. They are stateless; the only side effect is appending
//! to the execution trace.

use super::options::{EnhanceOptions, ResizeOptions, ThumbnailOptions};
use crate::imaging::{
    ImageData, ImagingError, OutputFormat, Quality, Raster, decode, encode_jpeg, encode_pdf,
    fit_within, plan_adjustments,
};
use crate::trace::ExecutionTrace;
use image::imageops::FilterType;

/// Output of a single transform.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub buffer: Vec<u8>,
    pub format: OutputFormat,
    /// Human-readable summary, returned to the caller as `processingDetails`.
    pub details: String,
    /// Pixel size of the encoded output.
    pub dimensions: (u32, u32),
}

impl TransformResult {
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }
}

/// Scale a raster to exactly `width`×`height` with Lanczos3.
fn scale(raster: Raster, (width, height): (u32, u32)) -> Raster {
    if raster.dimensions() == (width, height) {
        return raster;
    }
    let resized = raster
        .image()
        .resize_exact(width, height, FilterType::Lanczos3);
    Raster::from_image(resized)
}

fn jpeg_result(
    raster: &Raster,
    quality: Quality,
    details: String,
) -> Result<TransformResult, ImagingError> {
    Ok(TransformResult {
        buffer: encode_jpeg(raster, quality)?,
        format: OutputFormat::Jpeg,
        details,
        dimensions: raster.dimensions(),
    })
}

/// `resize-image`: fit inside the box (keeping aspect) or force exact size.
pub fn resize(
    source: &ImageData,
    options: &ResizeOptions,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    trace.record(format!(
        "Resizing to {}x{}",
        options.width, options.height
    ));

    let raster = decode(source)?;
    let (orig_w, orig_h) = raster.dimensions();
    trace.record(format!("Original size: {orig_w}x{orig_h}"));

    let target = if options.maintain_ratio {
        fit_within((orig_w, orig_h), (options.width, options.height))
    } else {
        (options.width, options.height)
    };
    let raster = scale(raster, target).into_rgb();
    let (new_w, new_h) = raster.dimensions();
    trace.record(format!("New size: {new_w}x{new_h}"));

    jpeg_result(
        &raster,
        Quality::RESIZE,
        format!("Resized from {orig_w}x{orig_h} to {new_w}x{new_h}"),
    )
}

/// `image-to-bw`: single-channel luminance JPEG.
pub fn grayscale(
    source: &ImageData,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    trace.record("Converting to black and white");

    let raster = decode(source)?;
    let original_mode = raster.mode();
    trace.record(format!("Original mode: {original_mode}"));

    let raster = raster.into_luma();
    trace.record("Converted to grayscale");

    jpeg_result(
        &raster,
        Quality::GRAYSCALE,
        format!("Image converted from {original_mode} to black and white"),
    )
}

/// `create-thumbnail`: fit inside a `size`×`size` square.
pub fn thumbnail(
    source: &ImageData,
    options: &ThumbnailOptions,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    let size = options.size;
    trace.record(format!("Creating {size}x{size} thumbnail"));

    let raster = decode(source)?;
    let (orig_w, orig_h) = raster.dimensions();
    trace.record(format!("Original size: {orig_w}x{orig_h}"));

    let raster = scale(raster, fit_within((orig_w, orig_h), (size, size))).into_rgb();
    let (w, h) = raster.dimensions();
    trace.record(format!("Thumbnail: {w}x{h}"));

    jpeg_result(
        &raster,
        Quality::THUMBNAIL,
        format!("Thumbnail {w}x{h} created"),
    )
}

/// `enhance-image`: brightness → contrast → saturation, skipping identities.
pub fn enhance(
    source: &ImageData,
    options: &EnhanceOptions,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    trace.record("Applying enhancements");

    let raster = decode(source)?;
    let plan = plan_adjustments(
        options.brightness,
        options.contrast,
        options.saturation,
        raster.mode(),
    );
    if options.saturation != 1.0 && !raster.mode().supports_color() {
        tracing::debug!(mode = %raster.mode(), "saturation skipped for colorless source");
    }

    let raster = plan.iter().fold(raster, |raster, adjustment| {
        let out = adjustment.apply(raster);
        trace.record(capitalize(&adjustment.to_string()));
        out
    });

    let details = if plan.is_empty() {
        "Enhancements applied (no changes requested)".to_string()
    } else {
        let applied: Vec<String> = plan.iter().map(ToString::to_string).collect();
        format!("Enhancements applied: {}", applied.join(", "))
    };

    jpeg_result(&raster.into_rgb(), Quality::ENHANCE, details)
}

/// `image-to-pdf`: one page, RGB, embedded at maximum quality.
pub fn document(
    source: &ImageData,
    trace: &mut ExecutionTrace,
) -> Result<TransformResult, ImagingError> {
    trace.record("Converting to PDF");

    let raster = decode(source)?.into_rgb();
    let (w, h) = raster.dimensions();
    trace.record(format!("Size: {w}x{h}"));

    let buffer = encode_pdf(&raster, Quality::MAXIMUM)?;
    trace.record("PDF generated");

    Ok(TransformResult {
        buffer,
        format: OutputFormat::Pdf,
        details: "PDF generated".to_string(),
        dimensions: (w, h),
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
