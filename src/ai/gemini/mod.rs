pub mod client;
pub mod image;
pub mod text;
pub mod types;

pub use image::GeminiImageClient;
pub use text::GeminiTextClient;

/// Adds a `with_base_url` builder that forwards to the wrapped `http` client.
macro_rules! impl_with_gemini_base_url {
    ($client:ty) => {
        impl $client {
            pub fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

pub(crate) use impl_with_gemini_base_url;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path_regex};
    use wiremock::MockBuilder;

    pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";

    pub fn post_path_regex(regex: &str) -> MockBuilder {
        wiremock::Mock::given(method("POST")).and(path_regex(regex))
    }

    pub fn text_response(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    pub fn image_response(data: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": data }
                    }]
                }
            }]
        })
    }
}
