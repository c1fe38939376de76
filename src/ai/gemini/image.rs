use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::{png_data_uri, ImageGenerationService};
use crate::models::DEFAULT_IMAGE_MODEL;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageRequest {
    contents: Vec<Content>,
    generation_config: ImageGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageGenerationConfig {
    response_modalities: Vec<&'static str>,
}

pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(
            api_key,
            DEFAULT_IMAGE_MODEL.to_string(),
            Duration::from_secs(120),
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
}

super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            contents: vec![Content::user_text(prompt)],
            generation_config: ImageGenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let image_data = response
            .first_parts()
            .iter()
            .find_map(|p| match p {
                Part::InlineData { inline_data } => Some(inline_data),
                _ => None,
            })
            .ok_or_else(|| Error::AiProvider("No image data returned".to_string()))?;

        tracing::debug!(
            "Gemini returned image with mime_type: {}",
            image_data.mime_type
        );

        Ok(png_data_uri(&image_data.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use wiremock::{MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new("key".to_string()).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_image_returns_data_uri() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::image_response("iVBORw0KGgo=")),
            )
            .mount(&server)
            .await;

        let client = make_client(&server);
        let uri = client.generate_image("a lighthouse").await.unwrap();
        assert_eq!(uri, "data:image/png;base64,iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_skips_text_parts_before_image() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "Here is your image" },
                            { "inlineData": { "mimeType": "image/png", "data": "Zmlyc3Q=" } },
                            { "inlineData": { "mimeType": "image/png", "data": "c2Vjb25k" } }
                        ]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let uri = client.generate_image("a lighthouse").await.unwrap();
        assert_eq!(uri, "data:image/png;base64,Zmlyc3Q=");
    }

    #[tokio::test]
    async fn test_request_asks_for_image_modality() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(wiremock::matchers::body_string_contains(
                "\"responseModalities\":[\"IMAGE\"]",
            ))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::image_response("AA==")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(client.model(), "gemini-2.5-flash-image");
        client.generate_image("test").await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_inline_data_is_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200).set_body_json(test_support::text_response("no image here")),
            )
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client.generate_image("a dream").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_quota_error_is_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client.generate_image("a dream").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
