//! Core types shared by the encoder, builders, and extractors.

use crate::error::{Result, StudioError};
use base64::Engine;
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format (modern, efficient).
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Metadata about the generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationMetadata {
    /// Model that served the request.
    pub model: Option<String>,
    /// Round-trip duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// A single image returned by the service, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "generated image should be saved or displayed"]
pub struct GeneratedImage {
    /// Base64 image payload (no data-URI header).
    pub data: String,
    /// Media type reported by the service, when it reported one.
    pub media_type: Option<String>,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GeneratedImage {
    /// Creates a result from a bare base64 payload.
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: None,
            metadata: GenerationMetadata::default(),
        }
    }

    /// Sets the reported media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Sets the generation metadata.
    pub fn with_metadata(mut self, metadata: GenerationMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Media type used for display; results are PNG unless told otherwise.
    pub fn display_media_type(&self) -> &str {
        self.media_type
            .as_deref()
            .unwrap_or(ImageFormat::Png.mime_type())
    }

    /// Returns the image as a data URL suitable for rendering.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.display_media_type(), self.data)
    }

    /// Decodes the payload into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| StudioError::Decode(e.to_string()))
    }

    /// Decodes and saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.decode()?;
        std::fs::write(path, &bytes)?;
        Ok(bytes.len())
    }
}
