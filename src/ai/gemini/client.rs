use crate::models::DEFAULT_BASE_URL;
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Lightweight Gemini REST client shared by the text and image modules.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`),
    /// not a `models/...`-prefixed path segment.
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!("Sending generateContent request to Gemini (model: {})", self.model);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::AiProvider(format!("Failed to reach Gemini: {}", e))
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.map_err(|e| {
                tracing::error!("Failed to read Gemini error body (status {}): {}", status, e);
                Error::AiProvider(format!(
                    "Gemini API error (status {}): failed to read body: {}",
                    status, e
                ))
            })?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read Gemini response (status {}): {}", status, e);
            Error::AiProvider(format!("Failed to read Gemini response: {}", e))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}
