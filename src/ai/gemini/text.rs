use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::TextGenerationService;
use crate::models::{GenerationConfig, DEFAULT_TEXT_MODEL};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: TextGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

impl TextRequest {
    fn new(prompt: &str, config: &GenerationConfig) -> Self {
        Self {
            system_instruction: config
                .system_instruction
                .as_deref()
                .map(Content::system_text),
            contents: vec![Content::user_text(prompt)],
            generation_config: TextGenerationConfig {
                temperature: config.temperature,
                response_mime_type: config.response_format.mime_type(),
            },
        }
    }
}

pub struct GeminiTextClient {
    http: GeminiHttpClient,
}

impl GeminiTextClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(
            api_key,
            DEFAULT_TEXT_MODEL.to_string(),
            Duration::from_secs(30),
            reqwest::Client::new(),
        )
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// Concatenates the non-thought text parts of the first candidate.
    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let text: String = response
            .first_parts()
            .iter()
            .filter_map(|p| match p {
                Part::Text {
                    text,
                    thought: false,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect();

        (!text.is_empty()).then_some(text)
    }

    async fn request_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request = TextRequest::new(prompt, config);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        Self::extract_text(&response)
            .ok_or_else(|| Error::AiProvider("API returned empty content".to_string()))
    }
}

super::impl_with_gemini_base_url!(GeminiTextClient);

#[async_trait]
impl TextGenerationService for GeminiTextClient {
    async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        self.request_text(prompt, config).await.map_err(|e| {
            tracing::error!("Gemini text generation failed: {}", e);
            e
        })
    }
}
