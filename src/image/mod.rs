//! Image encoding, request building, and response extraction.

mod encode;
mod extract;
mod gemini;
pub(crate) mod generator;
mod models;
mod request;
mod service;
mod types;
pub mod wire;

pub use encode::EncodedImage;
pub use extract::{blocked_reason, extract_generated_image, extract_inline_image};
pub use gemini::{GeminiClient, GeminiClientBuilder, API_KEY_ENV_VARS, DEFAULT_BASE_URL};
pub use generator::ImageGenerator;
pub use models::{GeminiModel, ImagenModel, ModelRoutes};
pub use request::{
    mockup_instruction, GenerationRequest, ModelFamily, ServicePayload, GENERATED_ASPECT_RATIO,
    GENERATED_IMAGE_COUNT, MOCKUP_FROM_IMAGE_INSTRUCTION,
};
pub use service::ImageService;
pub use types::{GeneratedImage, GenerationMetadata, ImageFormat};
