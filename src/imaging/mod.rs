//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` with sniffed format |
//! | **Fit / fill resize** | `resize_exact` with `Lanczos3` at computed dimensions |
//! | **Grayscale** | `DynamicImage::into_luma8` |
//! | **Enhance** | custom brightness / contrast / saturation blends |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//! | **Encode → PDF** | `lopdf` page wrapping a `DCTDecode` image |
//!
//! The module is split into:
//! - **Codec**: [`ImageData`], [`Raster`], decode and JPEG encode
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Encode quality and output format
//! - **Enhance**: Pure `Raster -> Raster` tonal adjustments
//! - **Document**: PDF writer

mod calculations;
pub mod codec;
pub mod document;
pub mod enhance;
mod params;

pub use calculations::{fit_within, preserves_aspect};
pub use codec::{ColorMode, ImageData, ImagingError, Raster, decode, encode_jpeg};
pub use document::encode_pdf;
pub use enhance::{Adjustment, plan_adjustments};
pub use params::{OutputFormat, Quality};
