//! Data models and configuration
//!
//! Defines the per-call generation settings, the image result handed back
//! to callers, and the environment-derived client configuration.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEMPERATURE: f32 = 0.85;
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

const DEFAULT_TEXT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
    #[default]
    Text,
    Json,
}

impl ResponseFormat {
    /// MIME type requested from the model, if any.
    pub fn mime_type(self) -> Option<&'static str> {
        match self {
            ResponseFormat::Text => None,
            ResponseFormat::Json => Some("application/json"),
        }
    }
}

/// Sampling and formatting settings for a single text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub response_format: ResponseFormat,
    pub system_instruction: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat::Text,
            system_instruction: None,
        }
    }
}

impl GenerationConfig {
    /// Builds the config used by the `(prompt, system_instruction, is_json)`
    /// call shape. An empty instruction means none.
    pub fn new(system_instruction: &str, is_json: bool) -> Self {
        let system_instruction = if system_instruction.is_empty() {
            None
        } else {
            Some(system_instruction.to_string())
        };

        Self {
            response_format: if is_json {
                ResponseFormat::Json
            } else {
                ResponseFormat::Text
            },
            system_instruction,
            ..Self::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Image bytes returned by the model.
    Generated,
    /// Seeded stand-in used after the model call failed.
    Placeholder,
}

/// Result of an image generation call. Always carries a usable URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub uri: String,
    pub source: ImageSource,
}

impl GeneratedImage {
    pub fn generated(uri: String) -> Self {
        Self {
            uri,
            source: ImageSource::Generated,
        }
    }

    pub fn placeholder(uri: String) -> Self {
        Self {
            uri,
            source: ImageSource::Placeholder,
        }
    }

    /// True when the model call failed and `uri` points at a placeholder.
    pub fn is_degraded(&self) -> bool {
        self.source == ImageSource::Placeholder
    }

    pub fn into_uri(self) -> String {
        self.uri
    }

    /// Decoded PNG bytes for a generated image; `None` for placeholders.
    pub fn png_bytes(&self) -> crate::Result<Option<Vec<u8>>> {
        let Some(data) = self.uri.strip_prefix(PNG_DATA_URI_PREFIX) else {
            return Ok(None);
        };

        use base64::Engine as _;
        base64::engine::general_purpose::STANDARD
            .decode(data)
            .map(Some)
            .map_err(|e| crate::Error::AiProvider(format!("Failed to decode base64 image: {}", e)))
    }
}

impl fmt::Display for GeneratedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub base_url: String,
    pub text_timeout: Duration,
    pub image_timeout: Duration,
}

impl Config {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_timeout: Duration::from_secs(DEFAULT_TEXT_TIMEOUT_SECS),
            image_timeout: Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS),
        }
    }

    /// Loads configuration from the process environment (and `.env`).
    ///
    /// A missing API key is not an error here; the service rejects the
    /// first request instead.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .or_else(|| lookup("GEMINI_API_KEY"))
            .unwrap_or_else(|| {
                tracing::warn!("API_KEY not set; requests will fail authentication");
                String::new()
            });

        let defaults = Self::new(api_key);

        Ok(Self {
            text_model: lookup("GEMINI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: lookup("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
            base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
            text_timeout: parse_timeout(&lookup, "TEXT_TIMEOUT_SECS")?
                .unwrap_or(defaults.text_timeout),
            image_timeout: parse_timeout(&lookup, "IMAGE_TIMEOUT_SECS")?
                .unwrap_or(defaults.image_timeout),
            api_key: defaults.api_key,
        })
    }
}

fn parse_timeout<F>(lookup: &F, key: &str) -> crate::Result<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| crate::Error::Config(format!("Invalid {} '{}': {}", key, raw, e)))
        })
        .transpose()
}
