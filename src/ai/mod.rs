//! AI service integration for text and image generation
//!
//! Backends implement [`TextGenerationService`] and
//! [`ImageGenerationService`]. Text generation fails fast. Image generation
//! degrades to a seeded placeholder through [`generate_image_or_placeholder`].

pub mod client;
pub mod gemini;
pub mod mock;
pub mod placeholder;

pub use client::GenAiClient;
pub use gemini::{GeminiImageClient, GeminiTextClient};
pub use mock::{MockImageClient, MockTextClient};
pub use placeholder::placeholder_url;

use crate::models::{GeneratedImage, GenerationConfig, PNG_DATA_URI_PREFIX};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Returns the model's raw text. Empty output is an error.
    async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Returns a `data:image/png;base64,...` URI for the first inline image.
    async fn generate_image(&self, prompt: &str) -> Result<String>;
}

pub(crate) fn png_data_uri(base64_data: &str) -> String {
    format!("{}{}", PNG_DATA_URI_PREFIX, base64_data)
}

/// Runs `service` and substitutes a placeholder URL if it fails.
pub async fn generate_image_or_placeholder(
    service: &dyn ImageGenerationService,
    prompt: &str,
) -> GeneratedImage {
    match service.generate_image(prompt).await {
        Ok(uri) => GeneratedImage::generated(uri),
        Err(e) => {
            tracing::error!("Image generation failed: {}", e);
            let url = placeholder_url(prompt);
            tracing::warn!(placeholder = %url, "Image generation degraded to placeholder");
            GeneratedImage::placeholder(url)
        }
    }
}
