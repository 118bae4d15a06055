/// Anthropic Messages API client module.
///
/// This module provides a blocking HTTP client for the Anthropic Messages API,
/// the request/response wire types, and the `MessagesClient` trait that the
/// tag suggester depends on.
mod client;

pub use client::{
    AnthropicClient, AnthropicClientBuilder, AnthropicError, ContentBlock, DEFAULT_BASE_URL,
    Message, MessageRequest, MessageResponse, MessagesClient, Role,
};
