//! Shared Gemini payload types used by the text and image modules.

use serde::{Deserialize, Serialize};

/// Gemini content container used in both requests and responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    pub fn system_text(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// Untagged union of text and inline media content parts.
///
/// Variant order matters for `#[serde(untagged)]` decoding. Parts this
/// crate does not use (function calls, code execution) land in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
        /// Set on reasoning summaries, which are not part of the answer.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        thought: bool,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}

impl Part {
    pub fn text(text: &str) -> Self {
        Part::Text {
            text: text.to_string(),
            thought: false,
        }
    }
}

/// Base64 inline payload carried by image responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<serde_json::Value>,
}

impl GenerateContentResponse {
    /// Parts of the first candidate, or an empty slice.
    pub fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }
}

/// Candidate completion item returned by Gemini.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}
