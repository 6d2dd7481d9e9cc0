//! Image format sniffing
//!
//! Only magic bytes are inspected; nothing here decodes pixels.

/// PNG file signature
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// JPEG start-of-image marker followed by the first segment marker byte
const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Container format recognized from leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Unknown,
}

impl ImageFormat {
    /// Identify the format from the first bytes of an image
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&PNG_SIGNATURE) {
            ImageFormat::Png
        } else if bytes.starts_with(&JPEG_SIGNATURE) {
            ImageFormat::Jpeg
        } else {
            ImageFormat::Unknown
        }
    }

    pub fn is_png(self) -> bool {
        self == ImageFormat::Png
    }

    pub fn is_jpeg(self) -> bool {
        self == ImageFormat::Jpeg
    }

    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Unknown => "bin",
        }
    }
}
