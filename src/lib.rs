//! Thin client adapter around the Gemini generative-AI service.
//!
//! Sends text prompts to a language model and image prompts to an image
//! model, normalizes their responses, and recovers JSON from loosely
//! formatted model output.

pub mod ai;
pub mod error;
pub mod json;
pub mod models;

pub use ai::{GenAiClient, ImageGenerationService, TextGenerationService};
pub use error::{Error, Result};
pub use json::{tolerant_json_parse, tolerant_json_parse_as};
pub use models::{Config, GeneratedImage, GenerationConfig, ImageSource, ResponseFormat};
