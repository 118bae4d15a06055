pub mod anthropic;
pub mod batch;
pub mod frontmatter;
pub mod host;
pub mod models;
pub mod review;
pub mod service;
pub mod settings;
pub mod suggester;
pub mod utils;
pub mod vault;

pub use batch::BatchReport;
pub use host::{ConsoleNotifier, NoteStore, Notifier};
pub use models::{Language, Note, NotePath};
pub use service::{Suggestion, TaggingService};
pub use settings::Settings;
pub use suggester::TagSuggester;
pub use vault::{Vault, VaultError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let settings = Settings::default();
        assert_eq!(settings.language, Language::Auto);

        let path = NotePath::from("inbox/idea.md");
        let note = Note::new(path.clone(), "  text  ");
        assert_eq!(note.path(), &path);
        assert_eq!(note.trimmed_len(), 4);
    }

    #[test]
    fn vault_accessible_from_crate_root() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::open(dir.path()).unwrap();
        assert!(vault.list_notes().unwrap().is_empty());
    }
}
