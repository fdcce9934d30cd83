//! # Description Generator
//!
//! Short marketing copy for a product, written by a hosted language model.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  generate("Chicha Clásica")                                             │
//! │       │                                                                 │
//! │       ├── no API key ─────────────────────────────────► FALLBACK        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  POST {endpoint}/models/{model}:generateContent   (one call, no retry) │
//! │       │                                                                 │
//! │       ├── timeout / transport error / non-2xx ────────► FALLBACK        │
//! │       ├── malformed JSON / empty text ────────────────► FALLBACK        │
//! │       ▼                                                                 │
//! │  candidates[0].content.parts[*].text (trimmed)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers never see an error: the trait returns a plain `String`.

use async_trait::async_trait;
use hyper::client::HttpConnector;
use hyper::{header, Body, Client, Method, Request};
use hyper_tls::HttpsConnector;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GenAiSettings;

/// Text used whenever a description cannot be generated.
pub const FALLBACK_DESCRIPTION: &str =
    "Una deliciosa bebida tradicional preparada con el toque secreto de Dolce Fusión.";

/// Produces a short selling line for a product name.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    /// Never fails; returns [`FALLBACK_DESCRIPTION`] on any problem.
    async fn generate(&self, product_name: &str) -> String;
}

/// Builds the generator the configuration asks for.
pub fn from_settings(settings: &GenAiSettings) -> Arc<dyn DescriptionGenerator> {
    match settings.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Arc::new(GeminiGenerator::new(settings, key)),
        _ => {
            debug!("No API key configured, description generation disabled");
            Arc::new(DisabledGenerator)
        }
    }
}

// =============================================================================
// Disabled
// =============================================================================

/// Always returns the fallback text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl DescriptionGenerator for DisabledGenerator {
    async fn generate(&self, _product_name: &str) -> String {
        FALLBACK_DESCRIPTION.to_string()
    }
}

// =============================================================================
// Gemini
// =============================================================================

#[derive(Debug, Error)]
enum GenAiError {
    #[error("request error: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response contained no text")]
    Empty,
}

/// `generateContent` over HTTPS.
pub struct GeminiGenerator {
    client: Client<HttpsConnector<HttpConnector>>,
    api_key: String,
    url: String,
    timeout: Duration,
}

impl GeminiGenerator {
    pub fn new(settings: &GenAiSettings, api_key: &str) -> Self {
        let client = Client::builder().build::<_, Body>(HttpsConnector::new());
        GeminiGenerator {
            client,
            api_key: api_key.to_string(),
            url: format!(
                "{}/models/{}:generateContent",
                settings.endpoint.trim_end_matches('/'),
                settings.model
            ),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    async fn request(&self, product_name: &str) -> Result<String, GenAiError> {
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt_for(product_name) }] }]
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri(self.url.as_str())
            .header("x-goog-api-key", self.api_key.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))?;

        let response = self.client.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GenAiError::Status(status.as_u16()));
        }

        let body = hyper::body::to_bytes(response.into_body()).await?;
        extract_text(&body)
    }
}

#[async_trait]
impl DescriptionGenerator for GeminiGenerator {
    async fn generate(&self, product_name: &str) -> String {
        debug!(product = %product_name, "Requesting description");

        match tokio::time::timeout(self.timeout, self.request(product_name)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!(product = %product_name, error = %e, "Description generation failed");
                FALLBACK_DESCRIPTION.to_string()
            }
            Err(_) => {
                warn!(
                    product = %product_name,
                    timeout_secs = self.timeout.as_secs(),
                    "Description generation timed out"
                );
                FALLBACK_DESCRIPTION.to_string()
            }
        }
    }
}

fn prompt_for(product_name: &str) -> String {
    format!(
        "Eres un experto en marketing gastronómico venezolano. Escribe una frase corta \
         (máximo 12 palabras) y muy irresistible para vender: {}. Debe sonar artesanal y delicioso.",
        product_name
    )
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Joins the text parts of the first candidate.
fn extract_text(body: &[u8]) -> Result<String, GenAiError> {
    let response: GenerateResponse = serde_json::from_slice(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(GenAiError::Empty);
    }
    Ok(text.to_string())
}
