//! Image codec layer: bytes in, raster out, and back again.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format`, falling back to the file extension |
//! | Decode | `image::ImageReader` (JPEG, PNG, TIFF, WebP, GIF, BMP) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! The [`Raster`] carries a [`ColorMode`] next to the pixels. Decoders hand
//! back many pixel layouts (8/16-bit, float, palette expanded to RGB); they are
//! collapsed into the four modes the transforms reason about.

use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("Unrecognized image format")]
    UnknownFormat,
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

/// Encoded image bytes as received, plus the format they appear to be in.
///
/// The format is sniffed from the magic bytes; the declared file name is only
/// consulted when sniffing fails.
#[derive(Debug, Clone)]
pub struct ImageData {
    bytes: Vec<u8>,
    format: Option<ImageFormat>,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, file_name: Option<&str>) -> Self {
        let declared = file_name
            .and_then(|name| name.rsplit_once('.'))
            .and_then(|(_, ext)| ImageFormat::from_extension(ext));
        let format = image::guess_format(&bytes).ok().or(declared);
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }
}

/// Color layout of a decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Single-channel luminance.
    Luma,
    /// Luminance with alpha.
    LumaAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    fn of(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            _ => ColorMode::Rgb,
        }
    }

    /// Whether color adjustments (saturation) apply to this mode.
    pub fn supports_color(self) -> bool {
        matches!(self, ColorMode::Rgb | ColorMode::Rgba)
    }

    /// Number of non-alpha channels.
    pub fn color_channels(self) -> usize {
        match self {
            ColorMode::Luma | ColorMode::LumaAlpha => 1,
            ColorMode::Rgb | ColorMode::Rgba => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Luma => "L",
            ColorMode::LumaAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded pixel grid.
///
/// The pixel storage always matches the mode at 8 bits per channel, so the
/// adjustment code can treat it as interleaved bytes.
#[derive(Debug, Clone)]
pub struct Raster {
    image: DynamicImage,
    mode: ColorMode,
}

impl Raster {
    /// Wrap a decoded image, collapsing its layout into a [`ColorMode`].
    pub fn from_image(image: DynamicImage) -> Self {
        let mode = ColorMode::of(image.color());
        let image = match mode {
            ColorMode::Luma => DynamicImage::ImageLuma8(image.into_luma8()),
            ColorMode::LumaAlpha => DynamicImage::ImageLumaA8(image.into_luma_alpha8()),
            ColorMode::Rgb => DynamicImage::ImageRgb8(image.into_rgb8()),
            ColorMode::Rgba => DynamicImage::ImageRgba8(image.into_rgba8()),
        };
        Self { image, mode }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Normalize to three-channel color. Alpha is dropped.
    pub fn into_rgb(self) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(self.image.into_rgb8()),
            mode: ColorMode::Rgb,
        }
    }

    /// Convert to single-channel luminance. Alpha is dropped.
    pub fn into_luma(self) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(self.image.into_luma8()),
            mode: ColorMode::Luma,
        }
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }
}

/// Decode image bytes into a raster.
pub fn decode(data: &ImageData) -> Result<Raster, ImagingError> {
    let format = data.format().ok_or(ImagingError::UnknownFormat)?;
    let image = ImageReader::with_format(Cursor::new(data.bytes()), format)
        .decode()
        .map_err(|e| ImagingError::Decode(e.to_string()))?;
    Ok(Raster::from_image(image))
}

/// Encode a raster as baseline JPEG.
///
/// JPEG has no alpha channel: luminance rasters are written as single-channel
/// JPEG, everything else is normalized to RGB first.
pub fn encode_jpeg(raster: &Raster, quality: Quality) -> Result<Vec<u8>, ImagingError> {
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality.value());
    let result = match raster.mode() {
        ColorMode::Luma | ColorMode::Rgb => raster.image().write_with_encoder(encoder),
        ColorMode::LumaAlpha | ColorMode::Rgba => {
            DynamicImage::ImageRgb8(raster.image().to_rgb8()).write_with_encoder(encoder)
        }
    };
    result.map_err(|e| ImagingError::Encode {
        format: "JPEG",
        message: e.to_string(),
    })?;
    Ok(out)
}
