//! A fetched search result, validated at the provider boundary.
//!
//! The format is sniffed from magic bytes and the dimensions are read from the
//! image header without decoding pixels, so a malformed body fails here (as a
//! per-item error) rather than halfway through a write.

use crate::error::ItemError;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

/// One downloaded image: raw bytes plus what we learned from them.
#[derive(Debug, Clone)]
pub struct ImageResult {
    url: String,
    format: ImageFormat,
    width: u32,
    height: u32,
    content: Vec<u8>,
}

impl ImageResult {
    /// Validate `content` fetched from `url` into an `ImageResult`.
    pub fn from_bytes(url: impl Into<String>, content: Vec<u8>) -> Result<Self, ItemError> {
        let format = image::guess_format(&content).map_err(ItemError::Format)?;
        let (width, height) = ImageReader::with_format(Cursor::new(&content), format)
            .into_dimensions()
            .map_err(ItemError::Decode)?;
        Ok(Self {
            url: url.into(),
            format,
            width,
            height,
            content,
        })
    }

    /// Source URL the bytes were fetched from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw bytes exactly as served.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// File extension used when saving this image.
    pub fn extension(&self) -> &'static str {
        extension_for(self.format)
    }
}

/// Maps a codec to the extension used in output file names.
pub fn extension_for(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Ico => "ico",
        other => other.extensions_str().first().copied().unwrap_or("img"),
    }
}
