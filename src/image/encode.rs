//! Conversion of user-supplied files into transport-ready encoded images.

use crate::error::{Result, StudioError};
use crate::image::types::ImageFormat;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Media type used when nothing better can be determined.
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// An uploaded image, base64-encoded and ready to send.
///
/// `data` never carries a data-URI header; it is the payload alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    data: String,
    media_type: String,
    display_name: String,
}

impl EncodedImage {
    /// Builds an encoded image from the result of a data-URL file read.
    ///
    /// Everything up to and including the first comma is treated as header
    /// and discarded without being parsed.
    pub fn from_data_url(
        data_url: &str,
        media_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<Self> {
        let (_, payload) = data_url
            .split_once(',')
            .ok_or_else(|| StudioError::Decode("data URL has no payload separator".into()))?;

        Ok(Self {
            data: payload.to_string(),
            media_type: media_type.into(),
            display_name: display_name.into(),
        })
    }

    /// Encodes raw file bytes.
    pub fn from_bytes(
        bytes: &[u8],
        media_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.into(),
            display_name: display_name.into(),
        }
    }

    /// Reads and encodes a file from disk.
    ///
    /// The media type comes from the file's magic bytes, then its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| StudioError::Decode(format!("{}: {}", path.display(), e)))?;

        let media_type = ImageFormat::from_magic_bytes(&bytes)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageFormat::from_extension)
            })
            .map(|f| f.mime_type())
            .unwrap_or(FALLBACK_MEDIA_TYPE);

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        tracing::debug!(
            file = %display_name,
            media_type,
            size_bytes = bytes.len(),
            "encoded image file"
        );

        Ok(Self::from_bytes(&bytes, media_type, display_name))
    }

    /// Base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Media type, e.g. `image/png`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Original file name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Renders the image back as a data URL for previews.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}
