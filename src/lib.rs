//! Mockup Studio - AI image editing, product mockups, and text-to-image.
//!
//! Three workflows sit on top of two Google models: an image-editing model
//! (edits and mockups) and an image-generation model (pure text-to-image).
//!
//! # Quick Start
//!
//! ```no_run
//! use mockup_studio::{EncodedImage, GeminiClient, GenerationRequest, ImageGenerator};
//!
//! #[tokio::main]
//! async fn main() -> mockup_studio::Result<()> {
//!     let generator = ImageGenerator::new(GeminiClient::builder().build()?);
//!     let logo = EncodedImage::from_path("logo.png")?;
//!     let request = GenerationRequest::mockup_from_text(logo, "a black coffee mug");
//!     let image = generator.generate(&request).await?;
//!     image.save("mockup.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Workflows
//!
//! [`studio::StudioState`] holds the per-tab inputs and the
//! Idle/Pending state machine; [`studio::Studio`] drives it against any
//! [`ImageService`].
//!
//! # Features
//!
//! - `cli` (default): the `mockup-studio` command-line binary

mod error;
pub mod image;
pub mod studio;

// Re-export error types at crate root
pub use error::{ErrorKind, Result, StudioError};

pub use image::{
    EncodedImage, GeminiClient, GeminiModel, GeneratedImage, GenerationRequest, ImageGenerator,
    ImageService, ImagenModel, ModelRoutes,
};

