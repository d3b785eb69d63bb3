//! Pulls the single result image out of a service response.

use crate::error::{Result, StudioError};
use crate::image::types::GeneratedImage;
use crate::image::wire::{ContentResponse, PredictResponse};

/// Finish reasons that mean the model refused to produce content.
const BLOCKED_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "IMAGE_PROHIBITED_CONTENT",
    "IMAGE_RECITATION",
    "RECITATION",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
];

/// Returns the first inline image among the first candidate's parts.
///
/// Text parts are skipped. Later image parts are ignored.
pub fn extract_inline_image(response: &ContentResponse) -> Result<GeneratedImage> {
    let parts = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    for part in parts {
        if let Some(inline) = &part.inline_data {
            if inline.data.is_empty() {
                continue;
            }
            let image = GeneratedImage::new(inline.data.clone());
            return Ok(if inline.mime_type.is_empty() {
                image
            } else {
                image.with_media_type(inline.mime_type.clone())
            });
        }
        if let Some(text) = &part.text {
            tracing::debug!(text = %text, "ignoring text part in image response");
        }
    }

    Err(StudioError::NoImageInResponse)
}

/// Returns the bytes of the first generated-image descriptor.
///
/// Only index 0 is considered; later descriptors are never used as a fallback.
pub fn extract_generated_image(response: &PredictResponse) -> Result<GeneratedImage> {
    let first = response
        .predictions
        .first()
        .ok_or(StudioError::NoImageInResponse)?;

    match first.bytes_base64_encoded.as_deref() {
        Some(data) if !data.is_empty() => {
            let image = GeneratedImage::new(data);
            Ok(match &first.mime_type {
                Some(mime) => image.with_media_type(mime.clone()),
                None => image,
            })
        }
        _ => {
            if let Some(reason) = &first.rai_filtered_reason {
                tracing::debug!(reason = %reason, "generated image was filtered");
            }
            Err(StudioError::NoImageInResponse)
        }
    }
}

/// Describes a content-policy refusal carried in a successful response.
///
/// Only consulted after extraction found nothing, so an image that arrives
/// alongside a refusal finish reason is still used.
pub fn blocked_reason(response: &ContentResponse) -> Option<String> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Some(
                feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason)),
            );
        }
    }

    let finish_reason = response.candidates.first()?.finish_reason.as_deref()?;
    BLOCKED_FINISH_REASONS
        .contains(&finish_reason)
        .then(|| format!("Content blocked by safety filter: {}", finish_reason))
}
