//! Wire types for the two generative service families.
//!
//! `generateContent` carries edit and mockup requests; `predict` carries
//! pure text-to-image generation. Response types default every field so that
//! an incomplete payload parses and simply yields no image.

use crate::image::encode::EncodedImage;
use serde::{Deserialize, Deserializer, Serialize};

/// Response modality requested for image-only output.
pub const IMAGE_MODALITY: &str = "IMAGE";

// generateContent

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    /// Single-turn content.
    pub contents: Vec<Content>,
    /// Output constraints.
    pub generation_config: ContentConfig,
}

/// One turn of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    /// Ordered request parts.
    pub parts: Vec<RequestPart>,
}

/// A part in a request - can be text or inline image data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    /// Inline image bytes.
    InlineData {
        /// Image payload.
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Instruction text.
    Text {
        /// Instruction text.
        text: String,
    },
}

impl RequestPart {
    /// Text content, for text parts.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::InlineData { .. } => None,
        }
    }

    /// Inline image, for image parts.
    pub fn as_inline_data(&self) -> Option<&InlineData> {
        match self {
            Self::InlineData { inline_data } => Some(inline_data),
            Self::Text { .. } => None,
        }
    }
}

impl From<&EncodedImage> for RequestPart {
    fn from(image: &EncodedImage) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: image.media_type().to_string(),
                data: image.data().to_string(),
            },
        }
    }
}

/// Base64 image with its media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// Media type, e.g. `image/png`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mime_type: String,
    /// Base64 payload.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
}

/// Generation config for content requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    /// Requested output modalities.
    pub response_modalities: Vec<String>,
}

impl ContentConfig {
    /// Requests image output only.
    pub fn image_only() -> Self {
        Self {
            response_modalities: vec![IMAGE_MODALITY.to_string()],
        }
    }
}

impl ContentRequest {
    /// Wraps parts into a single-turn request asking for an image back.
    pub fn image_only(parts: Vec<RequestPart>) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: ContentConfig::image_only(),
        }
    }

    /// Parts of the first (only) turn.
    pub fn parts(&self) -> &[RequestPart] {
        self.contents
            .first()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }
}

/// Treats an explicit JSON `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body returned by `generateContent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    /// Candidate outputs; only the first is used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub candidates: Vec<Candidate>,
    /// Prompt-level safety feedback.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One candidate output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when the model stopped early.
    #[serde(default)]
    pub content: Option<CandidateContent>,
    /// Why generation stopped (`STOP`, `IMAGE_SAFETY`, ...).
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    /// Ordered, heterogeneous parts.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parts: Vec<ResponsePart>,
}

/// A heterogeneous response part; at most one field is normally set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    /// Text output.
    #[serde(default)]
    pub text: Option<String>,
    /// Inline image output.
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

impl ResponsePart {
    /// An image part.
    pub fn image(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }

    /// A text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

impl ContentResponse {
    /// A response with one candidate holding the given parts.
    pub fn from_parts(parts: Vec<ResponsePart>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent { parts }),
                finish_reason: Some("STOP".into()),
            }],
            prompt_feedback: None,
        }
    }
}

/// Prompt-level safety feedback.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt itself was blocked.
    #[serde(default)]
    pub block_reason: Option<String>,
    /// Human-readable block explanation.
    #[serde(default)]
    pub block_reason_message: Option<String>,
}

// predict

/// Body of a `predict` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    /// One instance per prompt.
    pub instances: Vec<PredictInstance>,
    /// Output constraints.
    pub parameters: PredictParameters,
}

/// A single prompt instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictInstance {
    /// Text prompt.
    pub prompt: String,
}

/// Output constraints for generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictParameters {
    /// Number of images to generate.
    pub sample_count: u32,
    /// Output aspect ratio, e.g. `1:1`.
    pub aspect_ratio: String,
    /// Output encoding.
    pub output_options: OutputOptions,
}

/// Output encoding for generated images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    /// Output media type, e.g. `image/png`.
    pub mime_type: String,
}

/// Body returned by `predict`; `predictions` is the generated-image list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Generated-image descriptors; only index 0 is used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub predictions: Vec<GeneratedImageDescriptor>,
}

/// One generated image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImageDescriptor {
    /// Base64 image bytes.
    #[serde(default)]
    pub bytes_base64_encoded: Option<String>,
    /// Media type of the bytes.
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Set when the image was withheld by a safety filter.
    #[serde(default)]
    pub rai_filtered_reason: Option<String>,
}

impl GeneratedImageDescriptor {
    /// A descriptor carrying image bytes.
    pub fn with_bytes(data: impl Into<String>) -> Self {
        Self {
            bytes_base64_encoded: Some(data.into()),
            mime_type: Some("image/png".into()),
            rai_filtered_reason: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_request_serialization_uses_camel_case() {
        let image = EncodedImage::from_data_url("data:image/png;base64,AAAA", "image/png", "a.png")
            .unwrap();
        let req = ContentRequest::image_only(vec![
            RequestPart::from(&image),
            RequestPart::Text {
                text: "make it blue".into(),
            },
        ]);

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}},
                        {"text": "make it blue"}
                    ]
                }],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }

    #[test]
    fn test_predict_request_serialization() {
        let req = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "a fox".into(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "1:1".into(),
                output_options: OutputOptions {
                    mime_type: "image/png".into(),
                },
            },
        };

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["instances"][0]["prompt"], "a fox");
        assert_eq!(value["parameters"]["sampleCount"], 1);
        assert_eq!(value["parameters"]["aspectRatio"], "1:1");
        assert_eq!(value["parameters"]["outputOptions"]["mimeType"], "image/png");
    }

    #[test]
    fn test_content_response_deserialization() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: ContentResponse = serde_json::from_str(json).unwrap();
        let parts = &resp.candidates[0].content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Here you go"));
        assert!(parts[0].inline_data.is_none());
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_partial_responses_still_parse() {
        let resp: ContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.candidates.is_empty());

        let resp: ContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#).unwrap();
        assert!(resp.candidates[0].content.is_none());

        let resp: PredictResponse = serde_json::from_str(r#"{"predictions": [{}]}"#).unwrap();
        assert!(resp.predictions[0].bytes_base64_encoded.is_none());
    }

    #[test]
    fn test_null_fields_parse_as_empty() {
        let resp: ContentResponse =
            serde_json::from_str(r#"{"candidates": null, "promptFeedback": null}"#).unwrap();
        assert!(resp.candidates.is_empty());

        let resp: ContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": null}}]}"#).unwrap();
        assert!(resp.candidates[0].content.as_ref().unwrap().parts.is_empty());

        let resp: ContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"inlineData": {"mimeType": null, "data": null}}]}}]}"#,
        )
        .unwrap();
        let inline = resp.candidates[0].content.as_ref().unwrap().parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert!(inline.data.is_empty());
        assert!(inline.mime_type.is_empty());

        let resp: PredictResponse = serde_json::from_str(r#"{"predictions": null}"#).unwrap();
        assert!(resp.predictions.is_empty());
    }
}
