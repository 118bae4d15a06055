//! Recording tags in a note's metadata header ("frontmatter").
//!
//! This module is a pure text transform: it never touches the filesystem.
//! It is built from two small pieces:
//!
//! - [`Header`] recognises a `---` delimited block at the very start of a note
//! - [`TagLine`] finds and rewrites the `tags: [...]` line inside that block
//!
//! Everything else in the header is carried over byte for byte, so merging
//! tags never loses or reorders unrelated fields.
//!
//! # Examples
//!
//! ```
//! use tagsmith::frontmatter::apply_tags;
//!
//! let note = "---\naliases: [\"foo\"]\ntags: [\"a\", \"b\"]\n---\nBody";
//! let updated = apply_tags(note, &["b", "c"]);
//!
//! assert_eq!(
//!     updated,
//!     "---\naliases: [\"foo\"]\ntags: [\"a\", \"b\", \"c\"]\n---\nBody"
//! );
//! ```

mod header;
mod tag_field;

pub use header::Header;
pub use tag_field::{TagLine, format_tag_line, format_tag_list, merge_tags, parse_tag_list};

/// Returns `text` with `tags` recorded in its metadata header.
///
/// - Header with a tag field: the field becomes the union of its current tags
///   and `tags` (existing first, duplicates collapsed by exact equality).
/// - Header without a tag field: a tag field line is appended to the header.
/// - No header: a header holding only the tag field is prepended, followed by
///   a blank line and the original text.
///
/// An empty `tags` slice still yields a valid tag field.
pub fn apply_tags<S: AsRef<str>>(text: &str, tags: &[S]) -> String {
    let Some(header) = Header::detect(text) else {
        let merged = merge_tags(Vec::new(), tags);
        return header::prepend_header(&format_tag_line(&merged), text);
    };

    let body = header.body();
    let new_body = match TagLine::find(body) {
        Some(line) => {
            let merged = merge_tags(line.tags(), tags);
            line.replace_in(body, &merged)
        }
        None => {
            let tag_line = format_tag_line(&merge_tags(Vec::new(), tags));
            if header.is_empty() {
                tag_line
            } else {
                format!("{body}{}{tag_line}", header.newline())
            }
        }
    };

    header.replace_body(&new_body)
}

/// Returns the tags currently recorded in `text`'s header, if any.
pub fn read_tags(text: &str) -> Vec<String> {
    Header::detect(text)
        .and_then(|header| TagLine::find(header.body()))
        .map(|line| line.tags())
        .unwrap_or_default()
}
