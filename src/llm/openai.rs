//! OpenAI-compatible completion client.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::CompletionError;
use super::client::{Client as GenericClient, Provider};

/// Default model when `--model` is not given.
pub const GPT_4O_MINI: &str = "gpt-4o-mini";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API provider; holds the key and signs each request.
#[derive(Clone)]
pub struct OpenAiProvider {
    api_key: String,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"***")
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

impl Provider for OpenAiProvider {
    fn on_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", self.api_key),
        )
    }
}

/// OpenAI client type.
pub type Client = GenericClient<OpenAiProvider>;

impl Client {
    /// Creates a client from `OPENAI_API_KEY`, honoring `OPENAI_BASE_URL`
    /// for compatible endpoints.
    pub fn from_env() -> Result<Self, std::env::VarError> {
        let api_key = std::env::var("OPENAI_API_KEY")?;
        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(&base_url, OpenAiProvider::new(api_key)))
    }

    pub fn with_api_key(api_key: String) -> Self {
        Self::new(DEFAULT_BASE_URL, OpenAiProvider::new(api_key))
    }

    /// Creates a completion model instance for the given model name.
    pub fn completion_model(&self, model: impl Into<String>) -> Model {
        Model {
            client: self.clone(),
            model: model.into(),
        }
    }
}

/// A client bound to one model id.
#[derive(Clone, Debug)]
pub struct Model {
    client: Client,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl Model {
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// One system + user round trip, returning the assistant's text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .client
            .post("chat/completions")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(CompletionError::ProviderError(format!(
                "{status}: {message}"
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::ResponseError("completion reply carried no content".to_string())
            })
    }
}
