//! Runs a request end to end: build, call, extract.

use crate::error::Result;
use crate::image::extract::{blocked_reason, extract_generated_image, extract_inline_image};
use crate::image::models::ModelRoutes;
use crate::image::request::{GenerationRequest, ServicePayload};
use crate::image::service::ImageService;
use crate::image::types::{GeneratedImage, GenerationMetadata};
use std::time::Instant;

/// Sends requests to an injected service and returns the single result image.
pub struct ImageGenerator<S> {
    service: S,
    routes: ModelRoutes,
}

impl<S: ImageService> ImageGenerator<S> {
    /// Creates a generator using the default models.
    pub fn new(service: S) -> Self {
        Self::with_routes(service, ModelRoutes::default())
    }

    /// Creates a generator with explicit model routing.
    pub fn with_routes(service: S, routes: ModelRoutes) -> Self {
        Self { service, routes }
    }

    /// Model routing in effect.
    pub fn routes(&self) -> &ModelRoutes {
        &self.routes
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Issues exactly one service call for the request.
    ///
    /// No retries: a failed call surfaces its error unchanged.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let start = Instant::now();
        let model = self.routes.model_for(request.family());
        tracing::debug!(
            intent = request.intent(),
            model,
            service = self.service.name(),
            "dispatching generation request"
        );

        let image = match request.to_payload() {
            ServicePayload::Content(body) => {
                let response = self.service.generate_content(model, &body).await?;
                extract_inline_image(&response).inspect_err(|_| {
                    if let Some(reason) = blocked_reason(&response) {
                        tracing::debug!(reason = %reason, "no image returned");
                    }
                })?
            }
            ServicePayload::Predict(body) => {
                let response = self.service.predict(model, &body).await?;
                extract_generated_image(&response)?
            }
        };

        Ok(image.with_metadata(GenerationMetadata {
            model: Some(model.to_string()),
            duration_ms: Some(start.elapsed().as_millis() as u64),
        }))
    }
}
