/// Anthropic HTTP client implementation.
///
/// This module provides `AnthropicClient` for making synchronous requests to the
/// Messages endpoint, along with error types, wire types and a builder.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Base URL used when neither the builder nor `ANTHROPIC_BASE_URL` provide one.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

/// Errors that can occur when interacting with the Anthropic API.
#[derive(Debug, Error)]
pub enum AnthropicError {
    /// Network-related errors (connection failures, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Non-success HTTP status, with the message the API returned if any
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Anthropic API-specific errors reported inside a response body
    #[error("Anthropic API error: {message}")]
    Api { message: String },

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No credential was configured
    #[error("API key is not set; run `tagsmith settings set --api-key <KEY>` or set ANTHROPIC_API_KEY")]
    MissingApiKey,
}

/// Conversation role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in a Messages API request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Body of a `POST /v1/messages` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

impl MessageRequest {
    /// Builds a request carrying one user-role message.
    pub fn user(model: impl Into<String>, max_tokens: u32, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens,
            messages: vec![Message {
                role: Role::User,
                content: prompt.into(),
            }],
        }
    }
}

/// A content block of a Messages API response.
///
/// Only text blocks are of interest here; every other block kind
/// (tool use, thinking, ...) deserializes to `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

/// The subset of a Messages API response this crate consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

impl MessageResponse {
    /// Creates a response holding a single text block.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Returns the text of the first text-typed content block, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

/// Builder for constructing `AnthropicClient` instances.
///
/// # Examples
///
/// ```
/// use tagsmith::anthropic::AnthropicClientBuilder;
///
/// let client = AnthropicClientBuilder::new()
///     .api_key("sk-ant-test")
///     .base_url("https://api.anthropic.com")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "https://api.anthropic.com");
/// ```
#[derive(Debug, Default)]
pub struct AnthropicClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl AnthropicClientBuilder {
    /// Creates a new `AnthropicClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key sent in the `x-api-key` header.
    ///
    /// An empty key is treated as unset.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !key.is_empty() {
            self.api_key = Some(key);
        }
        self
    }

    /// Sets the base URL for the API (e.g., "https://api.anthropic.com").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the `AnthropicClient` with the configured settings.
    ///
    /// # Environment Variables
    ///
    /// If `api_key()` was not called with a non-empty key, `ANTHROPIC_API_KEY`
    /// is consulted. If `base_url()` was not called, `ANTHROPIC_BASE_URL` is
    /// consulted before falling back to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns `AnthropicError::MissingApiKey` when no key is available and
    /// `AnthropicError::InvalidUrl` when the base URL does not parse.
    pub fn build(self) -> Result<AnthropicClient, AnthropicError> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => std::env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
        };
        if api_key.trim().is_empty() {
            return Err(AnthropicError::MissingApiKey);
        }

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            std::env::var("ANTHROPIC_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
        };
        let base_url = base_url.trim_end_matches('/').to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| AnthropicError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        // The remote side governs latency; no overall request timeout here.
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<std::time::Duration>)
            .build()
            .map_err(AnthropicError::Network)?;

        Ok(AnthropicClient {
            client,
            api_key,
            base_url,
        })
    }
}

/// Synchronous HTTP client for the Anthropic Messages API.
///
/// Holds the credential and nothing else; it is rebuilt wholesale whenever
/// settings change. Construct it with `AnthropicClientBuilder`.
pub struct AnthropicClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

/// Trait for Messages API operations.
///
/// This trait enables mocking in unit tests and keeps the suggester
/// independent of the HTTP transport.
pub trait MessagesClient: Send + Sync {
    /// Sends one completion request and returns the parsed response.
    fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AnthropicError>;
}

impl AnthropicClient {
    /// Returns the base URL configured for this client.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }

    fn create_message_internal(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, AnthropicError> {
        debug!(
            model = %request.model,
            max_tokens = request.max_tokens,
            "sending messages request"
        );

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.text().map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(AnthropicError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        parse_response_body(&body)
    }
}

impl MessagesClient for AnthropicClient {
    fn create_message(&self, request: &MessageRequest) -> Result<MessageResponse, AnthropicError> {
        self.create_message_internal(request)
    }
}

fn map_transport_error(error: reqwest::Error) -> AnthropicError {
    if error.is_timeout() {
        AnthropicError::Timeout(error)
    } else {
        AnthropicError::Network(error)
    }
}

/// Parses a successful response body.
///
/// A body of `"type": "error"` is reported as `AnthropicError::Api` even when
/// it arrives with a success status.
fn parse_response_body(body: &str) -> Result<MessageResponse, AnthropicError> {
    let json: serde_json::Value =
        serde_json::from_str(body).map_err(AnthropicError::Serialization)?;

    if json.get("type").and_then(|t| t.as_str()) == Some("error") {
        return Err(AnthropicError::Api {
            message: error_message(body),
        });
    }

    serde_json::from_value(json).map_err(AnthropicError::Serialization)
}

/// Extracts `error.message` from an API error body, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
