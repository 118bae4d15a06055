//! A vault: a directory tree of Markdown notes on disk.
//!
//! Notes are identified by their path relative to the vault root. Hidden
//! directories such as `.obsidian`, `.git` or `.trash` are never entered.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::host::NoteStore;
use crate::models::NotePath;
use crate::utils::write_atomically;

/// File extension of notes.
const NOTE_EXTENSION: &str = "md";

/// Errors raised while accessing notes.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The vault root does not exist or is not a directory.
    #[error("Vault root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A note path points outside the vault root.
    #[error("Path is outside the vault: {}", .0.display())]
    OutsideVault(PathBuf),

    /// The note does not exist.
    #[error("Note not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Filesystem-backed note store.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Opens the vault rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotADirectory` if `root` is not an existing directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, VaultError> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|_| VaultError::NotADirectory(root.to_path_buf()))?;
        if !root.is_dir() {
            return Err(VaultError::NotADirectory(root));
        }
        debug!(root = %root.display(), "opened vault");
        Ok(Self { root })
    }

    /// Returns the canonical vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a note path to a file below the vault root.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::OutsideVault` for absolute paths and paths with `..`.
    pub fn resolve(&self, path: &NotePath) -> Result<PathBuf, VaultError> {
        let relative = path.as_path();
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(VaultError::OutsideVault(relative.to_path_buf()));
        }
        Ok(self.root.join(relative))
    }

    /// Turns a user-supplied path into a note path.
    ///
    /// Relative paths are looked up below the vault root first, then relative
    /// to the working directory. Absolute paths must lie inside the vault.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if no such file exists and
    /// `VaultError::OutsideVault` if it exists outside the vault.
    pub fn locate(&self, path: &Path) -> Result<NotePath, VaultError> {
        if path.is_relative() {
            let note = NotePath::new(path);
            if let Ok(full) = self.resolve(&note)
                && full.is_file()
            {
                return Ok(note);
            }
        }

        let full = path
            .canonicalize()
            .map_err(|_| VaultError::NotFound(path.to_path_buf()))?;
        if !full.is_file() {
            return Err(VaultError::NotFound(path.to_path_buf()));
        }
        full.strip_prefix(&self.root)
            .map(NotePath::new)
            .map_err(|_| VaultError::OutsideVault(full.clone()))
    }
}

impl NoteStore for Vault {
    fn list_notes(&self) -> Result<Vec<NotePath>, VaultError> {
        let mut notes = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("skipping unreadable vault entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_note(entry.path()) {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                notes.push(NotePath::new(relative));
            }
        }

        debug!(count = notes.len(), "enumerated vault notes");
        Ok(notes)
    }

    fn read_note(&self, path: &NotePath) -> Result<String, VaultError> {
        let full = self.resolve(path)?;
        std::fs::read_to_string(&full).map_err(|source| io_error(full, source))
    }

    fn write_note(&self, path: &NotePath, content: &str) -> Result<(), VaultError> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(VaultError::NotFound(full));
        }
        write_atomically(&full, content).map_err(|source| io_error(full, source))
    }
}

fn io_error(path: PathBuf, source: io::Error) -> VaultError {
    if source.kind() == io::ErrorKind::NotFound {
        VaultError::NotFound(path)
    } else {
        VaultError::Io { path, source }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn is_note(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(NOTE_EXTENSION))
}
