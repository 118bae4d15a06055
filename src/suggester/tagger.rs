//! Tag suggester backed by the Anthropic Messages API.
//!
//! This module provides the `TagSuggester` struct which sends a note to the
//! remote model and extracts a JSON array of tags from the reply.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::anthropic::{AnthropicError, MessageRequest, MessagesClient};
use crate::settings::Settings;

use super::prompt::build_prompt;

/// Token budget for a suggestion reply.
pub const MAX_TOKENS: u32 = 200;

/// Errors returned by [`TagSuggester::suggest`].
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The request to the model failed.
    #[error(transparent)]
    Client(#[from] AnthropicError),

    /// The reply contained a bracketed array that is not a JSON list of strings.
    #[error("Malformed tag suggestion: {0}")]
    MalformedReply(#[source] serde_json::Error),
}

/// Builder for constructing `TagSuggester` instances.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tagsmith::anthropic::AnthropicClientBuilder;
/// use tagsmith::settings::Settings;
/// use tagsmith::suggester::TagSuggesterBuilder;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::default().with_env_api_key();
/// let client = AnthropicClientBuilder::new()
///     .api_key(settings.api_key.clone())
///     .build()?;
///
/// let suggester = TagSuggesterBuilder::new()
///     .client(Arc::new(client))
///     .build();
///
/// let tags = suggester.suggest("Learning Rust async programming", &settings)?;
/// println!("{}", tags.join(", "));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct TagSuggesterBuilder {
    client: Option<Arc<dyn MessagesClient>>,
}

impl TagSuggesterBuilder {
    /// Creates a new `TagSuggesterBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client used for suggestion requests.
    pub fn client(mut self, client: Arc<dyn MessagesClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the `TagSuggester`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` was not called before `build()`.
    #[must_use]
    pub fn build(self) -> TagSuggester {
        TagSuggester {
            client: self.client.expect("client must be set via client() method"),
        }
    }
}

/// Suggests tags for note text using a remote model.
///
/// Stateless apart from the client it holds.
pub struct TagSuggester {
    client: Arc<dyn MessagesClient>,
}

impl TagSuggester {
    /// Creates a new `TagSuggester` with the specified client.
    #[must_use]
    pub fn new(client: Arc<dyn MessagesClient>) -> Self {
        Self { client }
    }

    /// Suggests tags for `content`.
    ///
    /// The note is truncated to its first 3000 characters before it is sent.
    /// A reply without any bracketed array yields an empty list. At most
    /// `settings.max_tags` tags are returned.
    ///
    /// # Errors
    ///
    /// Returns `SuggestError::Client` if the request fails and
    /// `SuggestError::MalformedReply` if the array in the reply is not valid JSON.
    pub fn suggest(&self, content: &str, settings: &Settings) -> Result<Vec<String>, SuggestError> {
        let prompt = build_prompt(content, settings.max_tags, settings.language);
        let request = MessageRequest::user(&settings.model, MAX_TOKENS, prompt);

        let response = self.client.create_message(&request)?;

        let Some(text) = response.first_text() else {
            debug!("reply has no text block");
            return Ok(Vec::new());
        };
        let Some(array) = extract_array(text) else {
            debug!("reply has no bracketed array");
            return Ok(Vec::new());
        };

        let mut tags: Vec<String> =
            serde_json::from_str(array).map_err(SuggestError::MalformedReply)?;
        tags.truncate(settings.max_tags as usize);

        debug!(count = tags.len(), "parsed tag suggestion");
        Ok(tags)
    }
}

/// Returns the span from the first `[` to the last `]` of `text`.
///
/// The span may cross newlines. Returns `None` when there is no `[` followed
/// somewhere by a `]`.
fn extract_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;

    if start < end {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anthropic::{ContentBlock, MessageResponse};
    use crate::models::Language;
    use std::sync::Mutex;

    struct MockClient {
        response: MessageResponse,
    }

    impl MockClient {
        fn text(text: &str) -> Self {
            Self {
                response: MessageResponse::from_text(text),
            }
        }
    }

    impl MessagesClient for MockClient {
        fn create_message(
            &self,
            _request: &MessageRequest,
        ) -> Result<MessageResponse, AnthropicError> {
            Ok(self.response.clone())
        }
    }

    struct CapturingMock {
        captured: Mutex<Option<MessageRequest>>,
    }

    impl MessagesClient for CapturingMock {
        fn create_message(
            &self,
            request: &MessageRequest,
        ) -> Result<MessageResponse, AnthropicError> {
            *self.captured.lock().unwrap() = Some(request.clone());
            Ok(MessageResponse::from_text(r#"["captured"]"#))
        }
    }

    fn suggest_with(response: &str) -> Result<Vec<String>, SuggestError> {
        let suggester = TagSuggester::new(Arc::new(MockClient::text(response)));
        suggester.suggest("note content", &Settings::default())
    }

    #[test]
    fn parses_clean_json_array() {
        let tags = suggest_with(r#"["rust", "async"]"#).unwrap();
        assert_eq!(tags, vec!["rust", "async"]);
    }

    #[test]
    fn extracts_array_from_surrounding_text() {
        let tags = suggest_with(
            "Here are the tags:\n\n```json\n[\n  \"rust\",\n  \"ownership\"\n]\n```\nHope this helps!",
        )
        .unwrap();
        assert_eq!(tags, vec!["rust", "ownership"]);
    }

    #[test]
    fn reply_without_brackets_is_empty_suggestion() {
        let tags = suggest_with("I could not find any topics.").unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn reversed_brackets_are_not_an_array() {
        assert_eq!(extract_array("] nothing ["), None);
    }

    #[test]
    fn extraction_is_greedy_across_the_block() {
        assert_eq!(extract_array("a [1] b [2] c"), Some("[1] b [2]"));
    }

    #[test]
    fn malformed_array_is_an_error() {
        let result = suggest_with("Tags: [rust, async]");
        assert!(matches!(result, Err(SuggestError::MalformedReply(_))));
    }

    #[test]
    fn greedy_span_over_two_arrays_is_malformed() {
        let result = suggest_with(r#"["a"] or maybe ["b"]"#);
        assert!(matches!(result, Err(SuggestError::MalformedReply(_))));
    }

    #[test]
    fn non_string_elements_are_malformed() {
        let result = suggest_with("[1, 2, 3]");
        assert!(matches!(result, Err(SuggestError::MalformedReply(_))));
    }

    #[test]
    fn empty_array_is_empty_suggestion() {
        assert!(suggest_with("[]").unwrap().is_empty());
    }

    #[test]
    fn uses_first_text_block_only() {
        let mock = MockClient {
            response: MessageResponse {
                content: vec![
                    ContentBlock::Other,
                    ContentBlock::Text {
                        text: r#"["first"]"#.to_string(),
                    },
                    ContentBlock::Text {
                        text: r#"["second"]"#.to_string(),
                    },
                ],
            },
        };
        let suggester = TagSuggester::new(Arc::new(mock));

        let tags = suggester.suggest("content", &Settings::default()).unwrap();
        assert_eq!(tags, vec!["first"]);
    }

    #[test]
    fn response_without_text_block_is_empty_suggestion() {
        let mock = MockClient {
            response: MessageResponse {
                content: vec![ContentBlock::Other],
            },
        };
        let suggester = TagSuggester::new(Arc::new(mock));

        assert!(suggester.suggest("c", &Settings::default()).unwrap().is_empty());
    }

    #[test]
    fn result_is_bounded_by_max_tags() {
        let suggester = TagSuggester::new(Arc::new(MockClient::text(
            r#"["a", "b", "c", "d", "e", "f", "g"]"#,
        )));
        let settings = Settings {
            max_tags: 3,
            ..Settings::default()
        };

        let tags = suggester.suggest("content", &settings).unwrap();
        assert_eq!(tags, vec!["a", "b", "c"]);
    }

    #[test]
    fn tags_are_returned_verbatim() {
        let tags = suggest_with(r##"["Machine Learning", "#rust"]"##).unwrap();
        assert_eq!(tags, vec!["Machine Learning", "#rust"]);
    }

    #[test]
    fn request_carries_model_budget_and_prompt() {
        let mock = Arc::new(CapturingMock {
            captured: Mutex::new(None),
        });
        let suggester = TagSuggester::new(mock.clone());
        let settings = Settings {
            model: "claude-test".to_string(),
            language: Language::En,
            max_tags: 4,
            ..Settings::default()
        };

        suggester.suggest("Borrow checker notes", &settings).unwrap();

        let captured = mock.captured.lock().unwrap();
        let request = captured.as_ref().unwrap();
        assert_eq!(request.model, "claude-test");
        assert_eq!(request.max_tokens, 200);
        assert_eq!(request.messages.len(), 1);
        assert!(request.messages[0].content.contains("Borrow checker notes"));
        assert!(request.messages[0].content.contains("at most 4 tags"));
        assert!(request.messages[0].content.contains("English"));
    }

    #[test]
    fn long_note_is_truncated_in_outgoing_prompt() {
        let mock = Arc::new(CapturingMock {
            captured: Mutex::new(None),
        });
        let suggester = TagSuggester::new(mock.clone());
        let content = format!("{}{}", "ж".repeat(3000), "щ".repeat(10));

        suggester.suggest(&content, &Settings::default()).unwrap();

        let captured = mock.captured.lock().unwrap();
        let prompt = &captured.as_ref().unwrap().messages[0].content;
        assert_eq!(prompt.matches('ж').count(), 3000);
        assert!(!prompt.contains('щ'));
    }

    #[test]
    fn client_errors_propagate() {
        struct FailingClient;

        impl MessagesClient for FailingClient {
            fn create_message(
                &self,
                _request: &MessageRequest,
            ) -> Result<MessageResponse, AnthropicError> {
                Err(AnthropicError::Http {
                    status: 401,
                    message: "invalid x-api-key".to_string(),
                })
            }
        }

        let suggester = TagSuggesterBuilder::new()
            .client(Arc::new(FailingClient))
            .build();
        let result = suggester.suggest("content", &Settings::default());

        match result {
            Err(SuggestError::Client(AnthropicError::Http { status, .. })) => {
                assert_eq!(status, 401)
            }
            other => panic!("Expected client error, got {:?}", other),
        }
    }
}
