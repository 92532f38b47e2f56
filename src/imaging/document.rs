//! Single-page PDF output.
//!
//! The raster is JPEG-encoded and embedded as a `DCTDecode` image XObject on
//! one page whose media box matches the pixel size at 72 dpi (one pixel per
//! point), so viewers show the image at its natural size with no margins.
//!
//! ```text
//! Catalog → Pages → Page ─┬─ Contents: q W 0 0 H 0 0 cm /Im0 Do Q
//!                         └─ Resources/XObject/Im0 → JPEG stream
//! ```

use super::codec::{ImagingError, Raster, encode_jpeg};
use super::params::Quality;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

fn pdf_error(e: impl std::fmt::Display) -> ImagingError {
    ImagingError::Encode {
        format: "PDF",
        message: e.to_string(),
    }
}

/// Write `raster` as a one-page PDF.
///
/// The raster is expected to be RGB already; other modes are normalized by
/// the JPEG encoder.
pub fn encode_pdf(raster: &Raster, quality: Quality) -> Result<Vec<u8>, ImagingError> {
    let (width, height) = raster.dimensions();
    let jpeg = encode_jpeg(raster, quality)?;
    let color_space = if raster.mode().supports_color() {
        "DeviceRGB"
    } else {
        "DeviceGray"
    };

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let image = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => color_space,
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )
    .with_compression(false);
    let image_id = doc.add_object(image);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width as i64),
                    0.into(),
                    0.into(),
                    Object::Integer(height as i64),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().map_err(pdf_error)?,
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Integer(width as i64), Object::Integer(height as i64)],
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(pdf_error)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn raster(width: u32, height: u32) -> Raster {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 200]));
        Raster::from_image(DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn writes_pdf_header_and_trailer() {
        let bytes = encode_pdf(&raster(30, 20), Quality::MAXIMUM).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len() - 16..]);
        assert!(tail.contains("%%EOF"), "tail was {tail:?}");
    }

    #[test]
    fn reloads_as_single_page_with_pixel_media_box() {
        let bytes = encode_pdf(&raster(120, 45), Quality::MAXIMUM).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.get(&1).unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let dims: Vec<i64> = media_box.iter().map(|o| o.as_i64().unwrap()).collect();
        assert_eq!(dims, vec![0, 0, 120, 45]);
    }

    #[test]
    fn embeds_jpeg_stream() {
        let bytes = encode_pdf(&raster(8, 8), Quality::MAXIMUM).unwrap();
        let haystack = bytes.windows(9).any(|w| w == b"DCTDecode");
        assert!(haystack);
        // JPEG SOI marker inside the file body
        assert!(bytes.windows(3).any(|w| w == [0xFF, 0xD8, 0xFF]));
    }
}
