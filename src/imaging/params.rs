//! Encoding parameters shared by the transforms.
//!
//! Every transform encodes at a fixed quality. The values live here so the
//! transforms read as a list of steps rather than a list of magic numbers.
//!
//! | Operation | Output | Quality |
//! |---|---|---|
//! | `resize-image` | JPEG | 95 |
//! | `image-to-bw` | JPEG | 90 |
//! | `create-thumbnail` | JPEG | 90 |
//! | `enhance-image` | JPEG | 95 |
//! | `image-to-pdf` | PDF (embedded JPEG) | 100 |

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub const RESIZE: Quality = Quality(95);
    pub const GRAYSCALE: Quality = Quality(90);
    pub const THUMBNAIL: Quality = Quality(90);
    pub const ENHANCE: Quality = Quality(95);
    pub const MAXIMUM: Quality = Quality(100);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Container format of a transform's output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Pdf,
}

impl OutputFormat {
    /// File extension used for the stored object key.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}
