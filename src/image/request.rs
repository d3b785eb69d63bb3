//! Request construction for the four supported intents.

use crate::image::encode::EncodedImage;
use crate::image::types::ImageFormat;
use crate::image::wire::{
    ContentRequest, OutputOptions, PredictInstance, PredictParameters, PredictRequest,
    RequestPart,
};
use std::borrow::Cow;

/// Instruction used when placing a logo onto a second, uploaded product image.
///
/// The wording refers to the images by position, so part order matters.
pub const MOCKUP_FROM_IMAGE_INSTRUCTION: &str = "Place the first image, which is a logo, onto the second image, which is a product. The result should be a photorealistic mockup. The logo should be integrated naturally, considering the product's texture, lighting, and shape.";

/// Number of images requested from the generation model.
pub const GENERATED_IMAGE_COUNT: u32 = 1;

/// Aspect ratio of generated images.
pub const GENERATED_ASPECT_RATIO: &str = "1:1";

/// Builds the mockup instruction for a text-described product.
pub fn mockup_instruction(product_description: &str) -> String {
    format!(
        "Create a high-quality, photorealistic product mockup of {}. Place the following logo onto the product in a natural and appealing way. The logo should be clearly visible and centered appropriately. The background should be clean and professional.",
        product_description
    )
}

/// Which model class serves a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Image+text to image (`generateContent`).
    ImageEditing,
    /// Text to image (`predict`).
    ImageGeneration,
}

/// A request for one of the four supported intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    /// Modify an image according to an instruction.
    Edit {
        image: EncodedImage,
        instruction: String,
    },
    /// Place a logo onto a product described in text.
    MockupFromText {
        logo: EncodedImage,
        product_description: String,
    },
    /// Place a logo onto an uploaded product image.
    MockupFromImage {
        logo: EncodedImage,
        subject: EncodedImage,
    },
    /// Generate a new image from a prompt.
    GenerateFromText { prompt: String },
}

/// Service payload produced by a request, one shape per model family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServicePayload {
    /// Sent to the image-editing model.
    Content(ContentRequest),
    /// Sent to the image-generation model.
    Predict(PredictRequest),
}

impl GenerationRequest {
    /// Creates an edit request.
    pub fn edit(image: EncodedImage, instruction: impl Into<String>) -> Self {
        Self::Edit {
            image,
            instruction: instruction.into(),
        }
    }

    /// Creates a mockup request for a text-described product.
    pub fn mockup_from_text(logo: EncodedImage, product_description: impl Into<String>) -> Self {
        Self::MockupFromText {
            logo,
            product_description: product_description.into(),
        }
    }

    /// Creates a mockup request onto an uploaded product image.
    pub fn mockup_from_image(logo: EncodedImage, subject: EncodedImage) -> Self {
        Self::MockupFromImage { logo, subject }
    }

    /// Creates a text-to-image request.
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self::GenerateFromText {
            prompt: prompt.into(),
        }
    }

    /// Short intent name for logs.
    pub fn intent(&self) -> &'static str {
        match self {
            Self::Edit { .. } => "edit",
            Self::MockupFromText { .. } => "mockup-from-text",
            Self::MockupFromImage { .. } => "mockup-from-image",
            Self::GenerateFromText { .. } => "generate-from-text",
        }
    }

    /// Model class that must serve this request.
    pub fn family(&self) -> ModelFamily {
        match self {
            Self::GenerateFromText { .. } => ModelFamily::ImageGeneration,
            _ => ModelFamily::ImageEditing,
        }
    }

    /// The text instruction sent with the request.
    pub fn instruction(&self) -> Cow<'_, str> {
        match self {
            Self::Edit { instruction, .. } => Cow::Borrowed(instruction),
            Self::MockupFromText {
                product_description,
                ..
            } => Cow::Owned(mockup_instruction(product_description)),
            Self::MockupFromImage { .. } => Cow::Borrowed(MOCKUP_FROM_IMAGE_INSTRUCTION),
            Self::GenerateFromText { prompt } => Cow::Borrowed(prompt),
        }
    }

    /// Input images in the order they are sent.
    pub fn images(&self) -> Vec<&EncodedImage> {
        match self {
            Self::Edit { image, .. } => vec![image],
            Self::MockupFromText { logo, .. } => vec![logo],
            Self::MockupFromImage { logo, subject } => vec![logo, subject],
            Self::GenerateFromText { .. } => Vec::new(),
        }
    }

    /// Builds the wire payload for this request.
    pub fn to_payload(&self) -> ServicePayload {
        match self {
            Self::GenerateFromText { prompt } => ServicePayload::Predict(PredictRequest {
                instances: vec![PredictInstance {
                    prompt: prompt.clone(),
                }],
                parameters: PredictParameters {
                    sample_count: GENERATED_IMAGE_COUNT,
                    aspect_ratio: GENERATED_ASPECT_RATIO.to_string(),
                    output_options: OutputOptions {
                        mime_type: ImageFormat::Png.mime_type().to_string(),
                    },
                },
            }),
            _ => {
                let mut parts: Vec<RequestPart> =
                    self.images().into_iter().map(RequestPart::from).collect();
                parts.push(RequestPart::Text {
                    text: self.instruction().into_owned(),
                });
                ServicePayload::Content(ContentRequest::image_only(parts))
            }
        }
    }
}
