use super::{
    generate_image_or_placeholder, GeminiImageClient, GeminiTextClient, ImageGenerationService,
    TextGenerationService,
};
use crate::json::tolerant_json_parse;
use crate::models::{Config, GeneratedImage, GenerationConfig};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Text and image generation behind one handle.
///
/// Cloning is cheap and clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct GenAiClient {
    text: Arc<dyn TextGenerationService>,
    image: Arc<dyn ImageGenerationService>,
}

impl GenAiClient {
    /// Gemini-backed client with default models and timeouts.
    pub fn new(api_key: String) -> Self {
        Self::from_config(&Config::new(api_key))
    }

    pub fn from_config(config: &Config) -> Self {
        // Reuse one HTTP connection pool across both model clients.
        let http_client = reqwest::Client::new();

        info!("Text model: {}", config.text_model);
        info!("Image model: {}", config.image_model);

        let text = GeminiTextClient::new_with_client(
            config.api_key.clone(),
            config.text_model.clone(),
            config.text_timeout,
            http_client.clone(),
        )
        .with_base_url(config.base_url.clone());

        let image = GeminiImageClient::new_with_client(
            config.api_key.clone(),
            config.image_model.clone(),
            config.image_timeout,
            http_client,
        )
        .with_base_url(config.base_url.clone());

        Self::with_services(Arc::new(text), Arc::new(image))
    }

    /// Build a client from concrete services, e.g. mocks in tests.
    pub fn with_services(
        text: Arc<dyn TextGenerationService>,
        image: Arc<dyn ImageGenerationService>,
    ) -> Self {
        Self { text, image }
    }

    /// Generate text with a system instruction, optionally in JSON mode.
    pub async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        is_json: bool,
    ) -> Result<String> {
        let config = GenerationConfig::new(system_instruction, is_json);
        self.generate_text_with(prompt, &config).await
    }

    pub async fn generate_text_with(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        self.text.generate_text(prompt, config).await
    }

    /// JSON-mode generation followed by tolerant parsing.
    ///
    /// `Ok(None)` means the model answered but nothing parseable came back.
    pub async fn generate_json(&self, prompt: &str, system_instruction: &str) -> Result<Option<Value>> {
        let text = self.generate_text(prompt, system_instruction, true).await?;
        let parsed = tolerant_json_parse(&text);
        if parsed.is_none() {
            tracing::warn!("Model returned unparseable JSON ({} bytes)", text.len());
        }
        Ok(parsed)
    }

    /// Always yields a usable image reference; check
    /// [`GeneratedImage::is_degraded`] to detect the placeholder fallback.
    pub async fn generate_image(&self, prompt: &str) -> GeneratedImage {
        generate_image_or_placeholder(self.image.as_ref(), prompt).await
    }
}
