//! Shared utility functions for settings paths and file writes.
//!
//! These functions are reused by the settings store and the vault.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Environment variable that overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "TAGSMITH_SETTINGS";

/// Gets the cross-platform settings path.
///
/// Returns `$TAGSMITH_SETTINGS` when set, otherwise
/// `{config_dir}/tagsmith/settings.json` where `config_dir` is:
/// - Linux: `~/.config`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn get_settings_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let config_dir =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine config directory"))?;

    Ok(config_dir.join("tagsmith").join("settings.json"))
}

/// Ensures the parent directory of a file exists.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn ensure_parent_directory(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Replaces the contents of `path` atomically.
///
/// Writes into a temporary file in the same directory and renames it over
/// the target, so readers never observe a half-written file. An existing
/// target keeps its permissions; a new file gets the temporary file's
/// owner-only mode.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or persisted.
pub fn write_atomically(path: &Path, contents: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    if let Ok(metadata) = std::fs::metadata(path) {
        file.as_file().set_permissions(metadata.permissions())?;
    }
    file.persist(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn get_settings_path_defaults_to_config_dir() {
        unsafe {
            std::env::remove_var(SETTINGS_PATH_ENV);
        }

        let path = get_settings_path().unwrap();
        assert!(path.to_string_lossy().contains("tagsmith"));
        assert!(path.ends_with("settings.json"));
    }

    #[test]
    #[serial]
    fn get_settings_path_honours_environment_override() {
        unsafe {
            std::env::set_var(SETTINGS_PATH_ENV, "/tmp/custom-settings.json");
        }

        let path = get_settings_path().unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom-settings.json"));

        unsafe {
            std::env::remove_var(SETTINGS_PATH_ENV);
        }
    }

    #[test]
    fn ensure_parent_directory_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a").join("b").join("settings.json");

        ensure_parent_directory(&file).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[test]
    fn write_atomically_replaces_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "old contents that are longer").unwrap();

        write_atomically(&file, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
        // No temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomically_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "old").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_atomically(&file, "new").unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn write_atomically_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");

        write_atomically(&file, "{}").unwrap();

        assert_eq!(std::fs::read_to_string(&file).unwrap(), "{}");
    }
}
