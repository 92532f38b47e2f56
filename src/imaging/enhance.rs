//! Tonal adjustments: brightness, contrast and saturation.
//!
//! Each adjustment is a pure `Raster -> Raster` function that interpolates
//! between the raster and a "degenerate" version of it:
//!
//! | Adjustment | Degenerate image | Factor 0.0 gives |
//! |---|---|---|
//! | Brightness | black | black |
//! | Contrast | flat gray at the mean luminance | uniform gray |
//! | Saturation | per-pixel luminance | grayscale |
//!
//! A factor of 1.0 is the identity; values above 1.0 extrapolate away from
//! the degenerate image. Alpha is never touched.
//!
//! [`plan_adjustments`] decides which steps run. Steps are always applied in
//! the order brightness → contrast → saturation, each on the output of the
//! previous one.

use super::codec::{ColorMode, Raster};
use image::DynamicImage;
use std::fmt;

/// One tonal adjustment with its factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Brightness(f32),
    Contrast(f32),
    Saturation(f32),
}

impl Adjustment {
    pub fn apply(self, raster: Raster) -> Raster {
        match self {
            Adjustment::Brightness(factor) => brightness(raster, factor),
            Adjustment::Contrast(factor) => contrast(raster, factor),
            Adjustment::Saturation(factor) => saturation(raster, factor),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Adjustment::Brightness(_) => "brightness",
            Adjustment::Contrast(_) => "contrast",
            Adjustment::Saturation(_) => "saturation",
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            Adjustment::Brightness(f) | Adjustment::Contrast(f) | Adjustment::Saturation(f) => f,
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.factor())
    }
}

/// Decide which adjustments to run for the given factors.
///
/// Factors equal to 1.0 are skipped. Saturation is also skipped when the mode
/// has no color (a grayscale source stays as it is rather than failing).
pub fn plan_adjustments(
    brightness: f32,
    contrast: f32,
    saturation: f32,
    mode: ColorMode,
) -> Vec<Adjustment> {
    let mut plan = Vec::new();
    if brightness != 1.0 {
        plan.push(Adjustment::Brightness(brightness));
    }
    if contrast != 1.0 {
        plan.push(Adjustment::Contrast(contrast));
    }
    if saturation != 1.0 && mode.supports_color() {
        plan.push(Adjustment::Saturation(saturation));
    }
    plan
}

/// Scale every color channel towards (or away from) black.
pub fn brightness(raster: Raster, factor: f32) -> Raster {
    map_color(raster, |color| {
        for c in color.iter_mut() {
            *c = blend(0.0, *c, factor);
        }
    })
}

/// Stretch (or flatten) every color channel around the mean luminance.
pub fn contrast(raster: Raster, factor: f32) -> Raster {
    let mean = mean_luminance(&raster);
    map_color(raster, |color| {
        for c in color.iter_mut() {
            *c = blend(mean, *c, factor);
        }
    })
}

/// Move every pixel towards (or away from) its own luminance.
///
/// Luminance rasters are returned unchanged.
pub fn saturation(raster: Raster, factor: f32) -> Raster {
    if !raster.mode().supports_color() {
        return raster;
    }
    map_color(raster, |color| {
        let gray = luminance(color) as f32;
        for c in color.iter_mut() {
            *c = blend(gray, *c, factor);
        }
    })
}

/// ITU-R 601-2 luma of one pixel's color channels.
fn luminance(color: &[u8]) -> u8 {
    match color {
        [r, g, b] => {
            ((*r as u32 * 299 + *g as u32 * 587 + *b as u32 * 114 + 500) / 1000) as u8
        }
        [l, ..] => *l,
        [] => 0,
    }
}

/// Mean luminance over all pixels, rounded to the nearest level.
fn mean_luminance(raster: &Raster) -> f32 {
    let stride = raster.mode().color_channels() + usize::from(has_alpha(raster.mode()));
    let pixels = raster.image().as_bytes();
    let count = pixels.len() / stride;
    if count == 0 {
        return 0.0;
    }
    let sum: u64 = pixels
        .chunks_exact(stride)
        .map(|px| luminance(&px[..raster.mode().color_channels()]) as u64)
        .sum();
    (sum as f64 / count as f64).round() as f32
}

fn has_alpha(mode: ColorMode) -> bool {
    matches!(mode, ColorMode::LumaAlpha | ColorMode::Rgba)
}

/// `degenerate + factor * (value - degenerate)`, clamped to a byte.
#[inline]
fn blend(degenerate: f32, value: u8, factor: f32) -> u8 {
    (degenerate + factor * (value as f32 - degenerate))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Run `f` over the color channels of every pixel, leaving alpha alone.
fn map_color(raster: Raster, mut f: impl FnMut(&mut [u8])) -> Raster {
    let mode = raster.mode();
    let color = mode.color_channels();
    let stride = color + usize::from(has_alpha(mode));

    let image = match raster.into_image() {
        DynamicImage::ImageLuma8(mut buf) => {
            buf.chunks_exact_mut(stride).for_each(|px| f(&mut px[..color]));
            DynamicImage::ImageLuma8(buf)
        }
        DynamicImage::ImageLumaA8(mut buf) => {
            buf.chunks_exact_mut(stride).for_each(|px| f(&mut px[..color]));
            DynamicImage::ImageLumaA8(buf)
        }
        DynamicImage::ImageRgba8(mut buf) => {
            buf.chunks_exact_mut(stride).for_each(|px| f(&mut px[..color]));
            DynamicImage::ImageRgba8(buf)
        }
        other => {
            let mut buf = other.into_rgb8();
            buf.chunks_exact_mut(stride).for_each(|px| f(&mut px[..color]));
            DynamicImage::ImageRgb8(buf)
        }
    };
    Raster::from_image(image)
}
