//! The LLM collaborator: a thin chat-completion client used to turn a
//! natural-language task into a framed patch. The engine itself never
//! touches this module.

pub mod client;
pub mod openai;
pub mod prompt;

pub use client::{Client, Provider};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HttpError: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JsonError: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("ProviderError: {0}")]
    ProviderError(String),

    #[error("ResponseError: {0}")]
    ResponseError(String),
}
