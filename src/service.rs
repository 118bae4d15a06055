use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::anthropic::{AnthropicClientBuilder, AnthropicError};
use crate::batch::{self, BatchReport};
use crate::frontmatter::{apply_tags, read_tags};
use crate::host::{NoteStore, Notifier};
use crate::models::NotePath;
use crate::settings::Settings;
use crate::suggester::TagSuggester;

/// Tags suggested for one note, together with what the note already has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// The note the suggestion is for.
    pub path: NotePath,
    /// Full note text at the time of the request.
    pub content: String,
    /// Tags already recorded in the note's header.
    pub existing: Vec<String>,
    /// Tags proposed by the model, in reply order.
    pub tags: Vec<String>,
}

impl Suggestion {
    /// Returns `true` if the model proposed nothing.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Service layer tying settings, the suggestion client and a note store together.
///
/// The service is UI-independent; the CLI and the review dialog both go
/// through it. Settings are held by value; a settings change means building
/// a new service.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tagsmith::anthropic::{AnthropicError, MessageRequest, MessageResponse, MessagesClient};
/// use tagsmith::host::MemoryStore;
/// use tagsmith::models::NotePath;
/// use tagsmith::settings::Settings;
/// use tagsmith::suggester::TagSuggester;
/// use tagsmith::TaggingService;
///
/// struct Fixed;
///
/// impl MessagesClient for Fixed {
///     fn create_message(&self, _: &MessageRequest) -> Result<MessageResponse, AnthropicError> {
///         Ok(MessageResponse::from_text(r#"["rust"]"#))
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let store = MemoryStore::new();
/// store.insert("a.md", "Borrowing rules in Rust");
///
/// let service = TaggingService::new(store, TagSuggester::new(Arc::new(Fixed)), Settings::default());
/// let path = NotePath::from("a.md");
/// let suggestion = service.suggest_for(&path)?;
/// service.apply(&path, &suggestion.tags)?;
///
/// assert_eq!(service.current_tags(&path)?, vec!["rust"]);
/// # Ok(())
/// # }
/// ```
pub struct TaggingService<S> {
    store: S,
    suggester: TagSuggester,
    settings: Settings,
}

impl<S: NoteStore> TaggingService<S> {
    /// Creates a service from its parts.
    pub fn new(store: S, suggester: TagSuggester, settings: Settings) -> Self {
        Self {
            store,
            suggester,
            settings,
        }
    }

    /// Creates a service that talks to the Anthropic API.
    ///
    /// # Errors
    ///
    /// Fails with [`AnthropicError::MissingApiKey`] before any network
    /// activity if `settings` has no API key, or if the HTTP client cannot be
    /// constructed.
    pub fn connect(store: S, settings: Settings) -> Result<Self> {
        if !settings.has_api_key() {
            return Err(AnthropicError::MissingApiKey.into());
        }

        let client = AnthropicClientBuilder::new()
            .api_key(settings.api_key.clone())
            .build()
            .context("Failed to create Anthropic client")?;

        debug!(model = %settings.model, "connected tagging service");
        Ok(Self::new(
            store,
            TagSuggester::new(Arc::new(client)),
            settings,
        ))
    }

    /// Returns the underlying note store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the settings the service was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Requests tag suggestions for a single note.
    ///
    /// Unlike bulk tagging, short notes are not skipped here.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read, the request fails or the
    /// reply is malformed.
    pub fn suggest_for(&self, path: &NotePath) -> Result<Suggestion> {
        let content = self
            .store
            .read_note(path)
            .with_context(|| format!("Failed to read note {path}"))?;

        let tags = self
            .suggester
            .suggest(&content, &self.settings)
            .with_context(|| format!("Failed to suggest tags for {path}"))?;

        info!(note = %path, count = tags.len(), "received tag suggestion");
        Ok(Suggestion {
            path: path.clone(),
            existing: read_tags(&content),
            content,
            tags,
        })
    }

    /// Merges `tags` into the note's header and writes the note back.
    ///
    /// The note is re-read so edits made since the suggestion are kept. An
    /// empty `tags` still records a tag field, so a note without one gains
    /// `tags: []`. Returns the tags recorded in the header afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read or written.
    pub fn apply(&self, path: &NotePath, tags: &[String]) -> Result<Vec<String>> {
        let content = self
            .store
            .read_note(path)
            .with_context(|| format!("Failed to read note {path}"))?;

        let updated = apply_tags(&content, tags);
        self.store
            .write_note(path, &updated)
            .with_context(|| format!("Failed to write note {path}"))?;
        info!(note = %path, count = tags.len(), "updated note tags");

        Ok(read_tags(&updated))
    }

    /// Returns the tags currently recorded in a note's header.
    ///
    /// # Errors
    ///
    /// Returns an error if the note cannot be read.
    pub fn current_tags(&self, path: &NotePath) -> Result<Vec<String>> {
        let content = self
            .store
            .read_note(path)
            .with_context(|| format!("Failed to read note {path}"))?;
        Ok(read_tags(&content))
    }

    /// Suggests tags for every note in the store.
    ///
    /// See [`batch::run_all`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the notes cannot be enumerated.
    pub fn run_all(&self, notifier: &dyn Notifier) -> Result<BatchReport> {
        batch::run_all(&self.store, &self.suggester, &self.settings, notifier)
    }
}
