use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a note: its path relative to the vault root.
///
/// Wraps a `PathBuf` so note identities are not mixed up with arbitrary
/// filesystem paths. The tagging pipeline never changes a note's path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotePath(PathBuf);

impl NotePath {
    /// Creates a new note path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Returns the underlying relative path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for NotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for NotePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_path_displays_relative_path() {
        let path = NotePath::new("projects/rust.md");
        assert_eq!(path.to_string(), "projects/rust.md");
        assert_eq!(path.as_path(), Path::new("projects/rust.md"));
    }

    #[test]
    fn note_paths_order_lexicographically() {
        let mut paths = vec![NotePath::from("b.md"), NotePath::from("a/c.md")];
        paths.sort();
        assert_eq!(paths[0], NotePath::from("a/c.md"));
    }
}
