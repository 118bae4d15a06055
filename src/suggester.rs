//! Tag suggestion for note content.
//!
//! The suggester builds a prompt from the note and the user's settings, sends
//! it to the remote model, and pulls a JSON array of tags out of the reply.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tagsmith::anthropic::{AnthropicError, MessageRequest, MessageResponse, MessagesClient};
//! use tagsmith::settings::Settings;
//! use tagsmith::suggester::TagSuggester;
//!
//! struct Canned;
//!
//! impl MessagesClient for Canned {
//!     fn create_message(&self, _: &MessageRequest) -> Result<MessageResponse, AnthropicError> {
//!         Ok(MessageResponse::from_text("Sure! [\"rust\", \"ownership\"]"))
//!     }
//! }
//!
//! let suggester = TagSuggester::new(Arc::new(Canned));
//! let tags = suggester
//!     .suggest("Notes on the borrow checker", &Settings::default())
//!     .unwrap();
//! assert_eq!(tags, vec!["rust", "ownership"]);
//! ```
//!
//! A reply that contains no `[` ... `]` span is an empty suggestion, not an
//! error. A span that is present but not a JSON list of strings is an error.

mod prompt;
mod tagger;

pub use prompt::{MAX_CONTENT_CHARS, build_prompt, language_directive, truncate_chars};
pub use tagger::{MAX_TOKENS, SuggestError, TagSuggester, TagSuggesterBuilder};
