/// Line-oriented editing of the `tags:` field inside a header body.
///
/// Only the inline list form `tags: ["a", "b"]` is understood. Text after
/// the closing bracket, such as a `# comment`, is left in place. Nested
/// brackets and escaped quotes inside tag values are not supported.
use std::collections::HashSet;

const KEY: &str = "tags:";

/// Location of the tag field line within a header body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine<'a> {
    /// Byte range inside the body, from the key to the closing bracket.
    start: usize,
    end: usize,
    /// Text between the brackets.
    inner: &'a str,
}

impl<'a> TagLine<'a> {
    /// Finds the first line of `body` holding an inline tag list.
    pub fn find(body: &'a str) -> Option<Self> {
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            if let Some((inner, len)) = inline_list(content) {
                return Some(Self {
                    start: offset,
                    end: offset + len,
                    inner,
                });
            }
            offset += line.len();
        }
        None
    }

    /// Returns the tags currently listed on this line.
    pub fn tags(&self) -> Vec<String> {
        parse_tag_list(self.inner)
    }

    /// Returns `body` with this line replaced by a tag line for `tags`.
    pub fn replace_in(&self, body: &str, tags: &[String]) -> String {
        format!("{}{}{}", &body[..self.start], format_tag_line(tags), &body[self.end..])
    }
}

/// Returns the bracket contents if `line` starts with `tags: [ ... ]`,
/// along with the length of the line up to and including the `]`.
fn inline_list(line: &str) -> Option<(&str, usize)> {
    let value = line.strip_prefix(KEY)?;
    let list = value.trim_start();
    let inner = list.strip_prefix('[')?;
    let close = inner.find(']')?;

    let len = line.len() - inner.len() + close + 1;
    Some((&inner[..close], len))
}

/// Splits the inside of a bracketed list into tag strings.
///
/// Elements are trimmed and stripped of surrounding quote characters;
/// elements that end up empty are dropped.
pub fn parse_tag_list(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(str::trim)
        .map(|item| item.trim_matches(['"', '\'']))
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Serializes tags as a bracketed list of double-quoted strings.
pub fn format_tag_list(tags: &[String]) -> String {
    let items: Vec<String> = tags.iter().map(|tag| format!("\"{tag}\"")).collect();
    format!("[{}]", items.join(", "))
}

/// Serializes a complete tag field line.
pub fn format_tag_line(tags: &[String]) -> String {
    format!("{KEY} {}", format_tag_list(tags))
}

/// Unions `existing` with `new`, keeping first-seen order.
///
/// Duplicates are collapsed by exact string equality; no case or
/// punctuation normalization is applied.
pub fn merge_tags<S: AsRef<str>>(existing: Vec<String>, new: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(new.iter().map(|tag| tag.as_ref().to_string()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_tag_line_anywhere_in_body() {
        let body = "title: Notes\ntags: [\"a\", \"b\"]\nstatus: draft";
        let line = TagLine::find(body).unwrap();

        assert_eq!(line.tags(), strings(&["a", "b"]));
        assert_eq!(&body[line.start..line.end], "tags: [\"a\", \"b\"]");
    }

    #[test]
    fn ignores_keys_that_only_end_with_tags() {
        assert!(TagLine::find("mytags: [\"a\"]").is_none());
        assert!(TagLine::find("  tags: [\"nested\"]").is_none());
    }

    #[test]
    fn ignores_block_style_lists() {
        assert!(TagLine::find("tags:\n  - a\n  - b").is_none());
    }

    #[test]
    fn accepts_missing_space_after_colon() {
        let line = TagLine::find("tags:[\"a\"]").unwrap();
        assert_eq!(line.tags(), strings(&["a"]));
    }

    #[test]
    fn trailing_comment_is_not_part_of_the_list() {
        let body = "tags: [\"a\"] # topics\nstatus: draft";
        let line = TagLine::find(body).unwrap();

        assert_eq!(line.tags(), strings(&["a"]));
        assert_eq!(&body[line.start..line.end], "tags: [\"a\"]");

        let updated = line.replace_in(body, &strings(&["a", "b"]));
        assert_eq!(updated, "tags: [\"a\", \"b\"] # topics\nstatus: draft");
    }

    #[test]
    fn unclosed_list_is_not_a_tag_line() {
        assert!(TagLine::find("tags: [\"a\", \"b\"").is_none());
    }

    #[test]
    fn parse_strips_quotes_and_whitespace() {
        assert_eq!(
            parse_tag_list(r#" "rust" , 'async',plain "#),
            strings(&["rust", "async", "plain"])
        );
    }

    #[test]
    fn parse_empty_list_yields_no_tags() {
        assert!(parse_tag_list("").is_empty());
        assert!(parse_tag_list("  ").is_empty());
        assert!(parse_tag_list(r#""", "#).is_empty());
    }

    #[test]
    fn format_uses_double_quotes_and_comma_space() {
        assert_eq!(format_tag_list(&strings(&["a", "b-c"])), r#"["a", "b-c"]"#);
        assert_eq!(format_tag_list(&[]), "[]");
        assert_eq!(format_tag_line(&strings(&["x"])), r#"tags: ["x"]"#);
    }

    #[test]
    fn replace_in_keeps_surrounding_lines() {
        let body = "a: 1\ntags: [\"old\"]\r\nb: 2";
        let line = TagLine::find(body).unwrap();

        let updated = line.replace_in(body, &strings(&["old", "new"]));
        assert_eq!(updated, "a: 1\ntags: [\"old\", \"new\"]\r\nb: 2");
    }

    #[test]
    fn merge_keeps_existing_first_then_new_in_order() {
        let merged = merge_tags(strings(&["a", "b"]), &["b", "c"]);
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }

    #[test]
    fn merge_is_case_sensitive() {
        let merged = merge_tags(strings(&["Rust"]), &["rust"]);
        assert_eq!(merged, strings(&["Rust", "rust"]));
    }

    #[test]
    fn merge_collapses_duplicates_within_inputs() {
        let merged = merge_tags(strings(&["a", "a"]), &["c", "c", "a"]);
        assert_eq!(merged, strings(&["a", "c"]));
    }
}
