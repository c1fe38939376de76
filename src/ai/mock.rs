use super::{png_data_uri, ImageGenerationService, TextGenerationService};
use crate::models::{GenerationConfig, ResponseFormat};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted reply for a mock call.
#[derive(Debug, Clone)]
enum Reply {
    Ok(String),
    Fail(String),
}

impl Reply {
    fn into_result(self) -> Result<String> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Fail(message) => Err(Error::AiProvider(message)),
        }
    }
}

/// Cycles through `replies` by call index; `None` when nothing is scripted.
fn next_reply(replies: &Mutex<Vec<Reply>>, call_count: &Mutex<usize>) -> Option<Reply> {
    let mut count = call_count.lock().unwrap();
    *count += 1;

    let replies = replies.lock().unwrap();
    if replies.is_empty() {
        None
    } else {
        Some(replies[(*count - 1) % replies.len()].clone())
    }
}

pub struct MockTextClient {
    replies: Arc<Mutex<Vec<Reply>>>,
    call_count: Arc<Mutex<usize>>,
    last_config: Arc<Mutex<Option<GenerationConfig>>>,
}

impl MockTextClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_config: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_text_response(self, response: String) -> Self {
        self.replies.lock().unwrap().push(Reply::Ok(response));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.replies.lock().unwrap().push(Reply::Fail(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Config passed to the most recent call.
    pub fn last_config(&self) -> Option<GenerationConfig> {
        self.last_config.lock().unwrap().clone()
    }
}

impl Default for MockTextClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationService for MockTextClient {
    async fn generate_text(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        *self.last_config.lock().unwrap() = Some(config.clone());

        let text = match next_reply(&self.replies, &self.call_count) {
            Some(reply) => reply.into_result()?,
            None => match config.response_format {
                ResponseFormat::Json => serde_json::json!({ "prompt": prompt }).to_string(),
                ResponseFormat::Text => format!("Echo: {}", prompt),
            },
        };

        if text.is_empty() {
            return Err(Error::AiProvider("API returned empty content".to_string()));
        }
        Ok(text)
    }
}

pub struct MockImageClient {
    replies: Arc<Mutex<Vec<Reply>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queues base64 image data; the mock wraps it in a data URI.
    pub fn with_image_response(self, base64_data: String) -> Self {
        self.replies.lock().unwrap().push(Reply::Ok(base64_data));
        self
    }

    pub fn with_failure(self, message: String) -> Self {
        self.replies.lock().unwrap().push(Reply::Fail(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageClient {
    async fn generate_image(&self, _prompt: &str) -> Result<String> {
        let data = match next_reply(&self.replies, &self.call_count) {
            Some(reply) => reply.into_result()?,
            // 1x1 transparent PNG
            None => "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==".to_string(),
        };
        Ok(png_data_uri(&data))
    }
}
