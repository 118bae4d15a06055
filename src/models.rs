mod language;
mod note;
mod note_path;

pub use language::Language;
pub use note::Note;
pub use note_path::NotePath;
