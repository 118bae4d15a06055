//! Capabilities the tagging pipeline needs from its host.
//!
//! The pipeline only ever reads, enumerates and rewrites notes, and shows
//! short messages to the user. Those needs are expressed as traits so the
//! core stays independent of where notes live.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::NotePath;
use crate::vault::VaultError;

/// Storage of notes, addressed by path.
pub trait NoteStore {
    /// Enumerates every note, in the store's own order.
    fn list_notes(&self) -> Result<Vec<NotePath>, VaultError>;

    /// Reads a note's full text.
    fn read_note(&self, path: &NotePath) -> Result<String, VaultError>;

    /// Replaces a note's full text.
    fn write_note(&self, path: &NotePath, content: &str) -> Result<(), VaultError>;
}

/// Transient user-facing messages.
pub trait Notifier {
    /// Shows `message` to the user.
    fn notice(&self, message: &str);
}

/// Prints notices to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        println!("{message}");
    }
}

/// Collects notices in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every notice received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notice(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// A note store held entirely in memory.
///
/// Notes are enumerated in path order. Useful for tests and dry runs.
///
/// # Examples
///
/// ```
/// use tagsmith::host::{MemoryStore, NoteStore};
/// use tagsmith::models::NotePath;
///
/// let store = MemoryStore::new();
/// store.insert("a.md", "hello");
///
/// let path = NotePath::from("a.md");
/// assert_eq!(store.read_note(&path).unwrap(), "hello");
/// assert_eq!(store.write_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    notes: Mutex<BTreeMap<NotePath, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a note without counting it as a write.
    pub fn insert(&self, path: impl Into<NotePath>, content: impl Into<String>) {
        if let Ok(mut notes) = self.notes.lock() {
            notes.insert(path.into(), content.into());
        }
    }

    /// Returns the current text of a note, if present.
    pub fn get(&self, path: impl Into<NotePath>) -> Option<String> {
        let path = path.into();
        self.notes.lock().ok()?.get(&path).cloned()
    }

    /// Number of `write_note` calls that succeeded.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl NoteStore for MemoryStore {
    fn list_notes(&self) -> Result<Vec<NotePath>, VaultError> {
        Ok(self
            .notes
            .lock()
            .map(|notes| notes.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read_note(&self, path: &NotePath) -> Result<String, VaultError> {
        self.notes
            .lock()
            .ok()
            .and_then(|notes| notes.get(path).cloned())
            .ok_or_else(|| VaultError::NotFound(PathBuf::from(path.as_path())))
    }

    fn write_note(&self, path: &NotePath, content: &str) -> Result<(), VaultError> {
        let mut notes = self
            .notes
            .lock()
            .map_err(|_| VaultError::NotFound(PathBuf::from(path.as_path())))?;
        if !notes.contains_key(path) {
            return Err(VaultError::NotFound(PathBuf::from(path.as_path())));
        }
        notes.insert(path.clone(), content.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_lists_in_path_order() {
        let store = MemoryStore::new();
        store.insert("b.md", "b");
        store.insert("a.md", "a");

        let paths = store.list_notes().unwrap();
        assert_eq!(paths, vec![NotePath::from("a.md"), NotePath::from("b.md")]);
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryStore::new();
        store.insert("a.md", "old");

        store.write_note(&NotePath::from("a.md"), "new").unwrap();

        assert_eq!(store.get("a.md").as_deref(), Some("new"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn memory_store_counts_writes_from_many_threads() {
        let store = MemoryStore::new();
        store.insert("a.md", "old");
        let path = NotePath::from("a.md");

        std::thread::scope(|scope| {
            for i in 0..8 {
                let (store, path) = (&store, &path);
                scope.spawn(move || store.write_note(path, &format!("v{i}")).unwrap());
            }
        });

        assert_eq!(store.write_count(), 8);
    }

    #[test]
    fn memory_store_rejects_unknown_notes() {
        let store = MemoryStore::new();

        assert!(matches!(
            store.read_note(&NotePath::from("missing.md")),
            Err(VaultError::NotFound(_))
        ));
        assert!(store.write_note(&NotePath::from("missing.md"), "x").is_err());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notice("one");
        notifier.notice("two");

        assert_eq!(notifier.messages(), vec!["one", "two"]);
    }
}
