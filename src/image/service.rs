//! The boundary to the generative image service.

use crate::error::Result;
use crate::image::wire::{ContentRequest, ContentResponse, PredictRequest, PredictResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// A generative image service, one call per model family.
///
/// Implementations own transport concerns (auth, endpoint, HTTP). Callers
/// construct one explicitly and hand it to [`ImageGenerator`](crate::image::ImageGenerator).
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Sends an edit or mockup request to an image-editing model.
    async fn generate_content(
        &self,
        model: &str,
        request: &ContentRequest,
    ) -> Result<ContentResponse>;

    /// Sends a text-to-image request to an image-generation model.
    async fn predict(&self, model: &str, request: &PredictRequest) -> Result<PredictResponse>;

    /// Returns the name of this service for display.
    fn name(&self) -> &str {
        "generative image service"
    }
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    async fn generate_content(
        &self,
        model: &str,
        request: &ContentRequest,
    ) -> Result<ContentResponse> {
        (**self).generate_content(model, request).await
    }

    async fn predict(&self, model: &str, request: &PredictRequest) -> Result<PredictResponse> {
        (**self).predict(model, request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
