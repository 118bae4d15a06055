/// Prompt construction for tag suggestion.
use crate::models::Language;

/// Number of characters of note text sent to the model.
///
/// Truncation is on raw characters, not word boundaries.
pub const MAX_CONTENT_CHARS: usize = 3000;

/// Prompt template for tag suggestion.
///
/// `{max_tags}` and `{language}` are filled first; `{content}` last so that
/// braces inside the note are never treated as placeholders.
const PROMPT_TEMPLATE: &str = r##"Suggest tags for the note below. Return ONLY a JSON array of strings. Do not include any explanatory text.

INSTRUCTIONS:
1. Focus on what the note is ABOUT (primary topics), not things merely mentioned in passing
2. Suggest at most {max_tags} tags
3. {language}
4. Use lowercase for all tags
5. Use hyphens instead of spaces (e.g., "machine-learning" not "machine learning")
6. Do not prefix tags with "#"

EXAMPLE OUTPUT:
["rust", "async-programming", "tokio"]

NOTE CONTENT:
{content}

JSON ARRAY:"##;

/// Returns the instruction line telling the model which language to use.
pub fn language_directive(language: Language) -> &'static str {
    match language {
        Language::En => "Write every tag in English, whatever language the note is written in",
        Language::Ko => "Write every tag in Korean (한국어), whatever language the note is written in",
        Language::Auto => "Detect the language of the note and write the tags in that same language",
    }
}

/// Returns the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Builds the complete prompt for one note.
pub fn build_prompt(content: &str, max_tags: u32, language: Language) -> String {
    PROMPT_TEMPLATE
        .replace("{max_tags}", &max_tags.to_string())
        .replace("{language}", language_directive(language))
        .replace("{content}", truncate_chars(content, MAX_CONTENT_CHARS))
}
