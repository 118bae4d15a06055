use serde::{Deserialize, Serialize};

use super::NotePath;

/// A note with its identity and raw text.
///
/// The text is the full document, including any metadata header. Notes are
/// owned by the vault; this crate only reads and rewrites their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Path of the note relative to the vault root.
    pub path: NotePath,
    /// The note's full text.
    pub content: String,
}

impl Note {
    /// Creates a note from its path and text.
    pub fn new(path: impl Into<NotePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the note's path.
    pub fn path(&self) -> &NotePath {
        &self.path
    }

    /// Returns the note's full text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of characters left after trimming surrounding whitespace.
    pub fn trimmed_len(&self) -> usize {
        self.content.trim().chars().count()
    }
}
