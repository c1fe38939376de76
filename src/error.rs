//! Error handling and custom error types
//!
//! Provides unified error handling across the crate using thiserror. Every
//! service failure, transport errors included, surfaces as `AiProvider`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
