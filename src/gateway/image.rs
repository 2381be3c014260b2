//! Receipt images
//!
//! Only PNG and JPEG are accepted. The format is sniffed from the file's magic
//! bytes, never from its extension. JPEG uploads are re-encoded to PNG when
//! loaded, so the vision model always receives a PNG.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::ExtractionError;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Supported receipt image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect the format from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_MAGIC) {
            Some(Self::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "PNG"),
            Self::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// A receipt photo ready to be sent for extraction
///
/// `bytes` always hold a PNG; `format` records what was uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ReceiptImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    label: String,
}

impl ReceiptImage {
    /// Read an image from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            ExtractionError::InvalidImage(format!("cannot read {}: {}", path.display(), e))
        })?;
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(bytes, label)
    }

    /// Wrap bytes already in memory
    pub fn from_bytes(bytes: Vec<u8>, label: impl Into<String>) -> Result<Self, ExtractionError> {
        let label = label.into();
        if bytes.is_empty() {
            return Err(ExtractionError::InvalidImage(format!("{} is empty", label)));
        }
        let format = ImageFormat::sniff(&bytes).ok_or_else(|| {
            ExtractionError::InvalidImage(format!("{} is not a PNG or JPEG image", label))
        })?;
        let bytes = match format {
            ImageFormat::Png => bytes,
            ImageFormat::Jpeg => jpeg_to_png(&bytes, &label)?,
        };
        Ok(Self {
            bytes,
            format,
            label,
        })
    }

    /// Format of the uploaded file
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type of the bytes that are sent
    pub fn mime_type(&self) -> &'static str {
        ImageFormat::Png.mime_type()
    }

    /// File name (or caller-given label) for messages
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:` URL with the base64-encoded PNG, as sent to the vision model
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

fn jpeg_to_png(jpeg: &[u8], label: &str) -> Result<Vec<u8>, ExtractionError> {
    let decoded = ::image::load_from_memory_with_format(jpeg, ::image::ImageFormat::Jpeg)
        .map_err(|e| ExtractionError::InvalidImage(format!("cannot decode {}: {}", label, e)))?;
    let mut png = Cursor::new(Vec::new());
    decoded
        .write_to(&mut png, ::image::ImageFormat::Png)
        .map_err(|e| {
            ExtractionError::InvalidImage(format!("cannot convert {} to PNG: {}", label, e))
        })?;
    Ok(png.into_inner())
}

// Keep the raw bytes out of logs
impl fmt::Debug for ReceiptImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiptImage")
            .field("label", &self.label)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}
