//! Gemini API client (Google Generative Language API).

use crate::error::{parse_retry_after, sanitize_error_message, Result, StudioError};
use crate::image::service::ImageService;
use crate::image::wire::{ContentRequest, ContentResponse, PredictRequest, PredictResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for an API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GOOGLE_API_KEY", "API_KEY"];

/// Builder for GeminiClient.
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GOOGLE_API_KEY`, then `API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API root (proxies, test servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
            })
            .ok_or_else(|| {
                StudioError::Auth("GOOGLE_API_KEY not set and no API key provided".into())
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            api_key,
            base_url,
        })
    }
}

/// HTTP client for Gemini image editing and Imagen generation.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    fn method_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post<B, R>(&self, model: &str, method: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.method_url(model, method);
        tracing::debug!(model, method, "sending request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let body = response.bytes().await?;
        decode_body(&body)
    }

    /// Checks that the key is accepted and the model exists.
    pub async fn health_check(&self, model: &str) -> Result<()> {
        let url = format!("{}/models/{}", self.base_url, model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(StudioError::Auth("Invalid API key".into())),
            404 => Err(StudioError::Api {
                status: 404,
                message: format!("Model {} not found", model),
            }),
            s if !(200..300).contains(&s) => Err(StudioError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

/// Parses a successful response body.
///
/// A body that does not fit the expected shape carries no usable image.
fn decode_body<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "unreadable response body");
        StudioError::NoImageInResponse
    })
}

fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> StudioError {
    let text = sanitize_error_message(text);
    match status {
        429 => {
            let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
            StudioError::RateLimited { retry_after }
        }
        401 | 403 => StudioError::Auth(text),
        _ => {
            let lower = text.to_lowercase();
            if lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited")
            {
                StudioError::ContentBlocked(text)
            } else {
                StudioError::Api {
                    status,
                    message: text,
                }
            }
        }
    }
}

#[async_trait]
impl ImageService for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &ContentRequest,
    ) -> Result<ContentResponse> {
        self.post(model, "generateContent", request).await
    }

    async fn predict(&self, model: &str, request: &PredictRequest) -> Result<PredictResponse> {
        self.post(model, "predict", request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}
