//! Model identifiers and per-family routing.

use crate::image::request::ModelFamily;

/// Image-editing model variants (image+text to image).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "gemini-3-pro-image-preview",
        }
    }
}

/// Image-generation model variants (text to image).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImagenModel {
    /// Imagen 4 standard.
    #[default]
    Imagen4,
    /// Imagen 4 Fast.
    Imagen4Fast,
    /// Imagen 4 Ultra.
    Imagen4Ultra,
}

impl ImagenModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imagen4 => "imagen-4.0-generate-001",
            Self::Imagen4Fast => "imagen-4.0-fast-generate-001",
            Self::Imagen4Ultra => "imagen-4.0-ultra-generate-001",
        }
    }
}

/// Which model serves each family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelRoutes {
    /// Model for edit and mockup requests.
    pub editing: GeminiModel,
    /// Model for text-to-image requests.
    pub generation: ImagenModel,
}

impl ModelRoutes {
    /// Returns the model identifier for a family.
    pub fn model_for(&self, family: ModelFamily) -> &'static str {
        match family {
            ModelFamily::ImageEditing => self.editing.as_str(),
            ModelFamily::ImageGeneration => self.generation.as_str(),
        }
    }
}
