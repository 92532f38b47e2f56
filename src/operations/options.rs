//! Typed option sets, one per operation.
//!
//! The request carries a loose JSON object. It is parsed exactly once, into a
//! [`TransformSpec`] variant, before anything is persisted or decoded. Each
//! struct documents its defaults; keys an operation doesn't know are ignored.

use super::Operation;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Loose option bag as received on the wire.
pub type OptionBag = Map<String, Value>;

/// Options for `resize-image`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    /// Target (or bounding) width. Default 800.
    pub width: u32,
    /// Target (or bounding) height. Default 600.
    pub height: u32,
    /// `true`: fit inside width×height keeping aspect ratio, never upscaling.
    /// `false`: force exactly width×height. Default `true`.
    pub maintain_ratio: bool,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            maintain_ratio: true,
        }
    }
}

/// Options for `create-thumbnail`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThumbnailOptions {
    /// Bounding square edge. Default 256.
    pub size: u32,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self { size: 256 }
    }
}

/// Options for `enhance-image`. A factor of 1.0 leaves that property alone.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnhanceOptions {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for EnhanceOptions {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

/// An operation together with its validated options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformSpec {
    Resize(ResizeOptions),
    Grayscale,
    Thumbnail(ThumbnailOptions),
    Enhance(EnhanceOptions),
    Document,
}

impl TransformSpec {
    /// Parse the option bag for `operation`.
    ///
    /// Returns a human-readable reason on failure: a value of the wrong type,
    /// a zero dimension, an exact resize larger than `max_output_pixels`, or a
    /// negative or non-finite enhancement factor.
    ///
    /// Only exact resizes are checked against the pixel limit. Fit resizes and
    /// thumbnails never upscale, so their output is bounded by the source.
    pub fn parse(
        operation: Operation,
        options: &OptionBag,
        max_output_pixels: u64,
    ) -> Result<Self, String> {
        let spec = match operation {
            Operation::ResizeImage => {
                let opts: ResizeOptions = from_bag(options)?;
                if opts.width == 0 || opts.height == 0 {
                    return Err(format!(
                        "width and height must be positive (got {}x{})",
                        opts.width, opts.height
                    ));
                }
                let pixels = u64::from(opts.width) * u64::from(opts.height);
                if !opts.maintain_ratio && pixels > max_output_pixels {
                    return Err(format!(
                        "{}x{} exceeds the output limit of {max_output_pixels} pixels",
                        opts.width, opts.height
                    ));
                }
                TransformSpec::Resize(opts)
            }
            Operation::ImageToBw => TransformSpec::Grayscale,
            Operation::CreateThumbnail => {
                let opts: ThumbnailOptions = from_bag(options)?;
                if opts.size == 0 {
                    return Err("size must be positive".into());
                }
                TransformSpec::Thumbnail(opts)
            }
            Operation::EnhanceImage => {
                let opts: EnhanceOptions = from_bag(options)?;
                for (name, factor) in [
                    ("brightness", opts.brightness),
                    ("contrast", opts.contrast),
                    ("saturation", opts.saturation),
                ] {
                    if !factor.is_finite() || factor < 0.0 {
                        return Err(format!("{name} must be a non-negative number"));
                    }
                }
                TransformSpec::Enhance(opts)
            }
            Operation::ImageToPdf => TransformSpec::Document,
        };
        Ok(spec)
    }

    pub fn operation(&self) -> Operation {
        match self {
            TransformSpec::Resize(_) => Operation::ResizeImage,
            TransformSpec::Grayscale => Operation::ImageToBw,
            TransformSpec::Thumbnail(_) => Operation::CreateThumbnail,
            TransformSpec::Enhance(_) => Operation::EnhanceImage,
            TransformSpec::Document => Operation::ImageToPdf,
        }
    }
}

fn from_bag<T: for<'de> Deserialize<'de>>(options: &OptionBag) -> Result<T, String> {
    serde_json::from_value(Value::Object(options.clone())).map_err(|e| e.to_string())
}
