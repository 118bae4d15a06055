/// Detection of the metadata header at the start of a note.
///
/// A header is recognised only when the text starts with a line that is
/// exactly `---` and a later line is exactly `---`. A header without a
/// closing delimiter is treated as absent.
const DELIMITER: &str = "---";

/// A metadata header found at byte offset 0 of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    /// Text between the delimiter lines, without the newline before the closing delimiter.
    body: &'a str,
    /// Everything after the closing `---`, starting with its line ending (if any).
    rest: &'a str,
    /// Line ending used by the opening delimiter line.
    newline: &'static str,
    /// Whether any line, even a blank one, sits between the delimiters.
    has_lines: bool,
}

impl<'a> Header<'a> {
    /// Finds the header at the start of `text`, if there is one.
    pub fn detect(text: &'a str) -> Option<Self> {
        let mut lines = text.split_inclusive('\n');

        let opening = lines.next()?;
        if strip_line_ending(opening) != DELIMITER || !opening.ends_with('\n') {
            return None;
        }
        let newline = if opening.ends_with("\r\n") { "\r\n" } else { "\n" };

        let body_start = opening.len();
        let mut offset = body_start;
        for line in lines {
            if strip_line_ending(line) == DELIMITER {
                let body = strip_line_ending(&text[body_start..offset]);
                let rest = &text[offset + DELIMITER.len()..];
                return Some(Self {
                    body,
                    rest,
                    newline,
                    has_lines: offset > body_start,
                });
            }
            offset += line.len();
        }

        None
    }

    /// Returns the header body.
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Returns `true` if the closing delimiter directly follows the opening one.
    ///
    /// A body made of blank lines is not empty, even though [`Header::body`]
    /// returns `""` for a single blank line.
    pub fn is_empty(&self) -> bool {
        !self.has_lines
    }

    /// Returns the text following the header.
    pub fn rest(&self) -> &'a str {
        self.rest
    }

    /// Returns the line ending the header was written with.
    pub fn newline(&self) -> &'static str {
        self.newline
    }

    /// Rebuilds the document with `body` in place of the current header body.
    pub fn replace_body(&self, body: &str) -> String {
        let nl = self.newline;
        format!("{DELIMITER}{nl}{body}{nl}{DELIMITER}{}", self.rest)
    }
}

/// Builds a brand-new header holding `body`, followed by a blank line and `text`.
pub fn prepend_header(body: &str, text: &str) -> String {
    format!("{DELIMITER}\n{body}\n{DELIMITER}\n\n{text}")
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
