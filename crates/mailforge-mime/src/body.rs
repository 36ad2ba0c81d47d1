//! Plain-text and HTML body parts.

use std::io::{self, Write};

use crate::content_type::ContentType;
use crate::header::Headers;
use crate::multipart::MultipartWriter;

/// A growable body buffer.
///
/// Implements [`Write`] so template renderers can stream straight into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyPart(Vec<u8>);

impl BodyPart {
    /// Creates an empty body.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Replaces the body content.
    pub fn set(&mut self, content: impl AsRef<[u8]>) {
        self.0.clear();
        self.0.extend_from_slice(content.as_ref());
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns true if the body has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the body length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Discards the body content.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl Write for BodyPart {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl From<&str> for BodyPart {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for BodyPart {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<Vec<u8>> for BodyPart {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Writes the `multipart/alternative` body section delimited by `boundary`.
///
/// Empty variants are skipped. When both are present the plain-text part
/// comes first, since clients render the last alternative they support.
/// The closing delimiter is always written.
///
/// # Errors
///
/// Returns an error if the sink rejects a write.
pub fn write_body<W: Write + ?Sized>(
    out: &mut W,
    plain: &[u8],
    html: &[u8],
    boundary: &str,
) -> io::Result<()> {
    let mut section = MultipartWriter::new(out, boundary);

    for (content_type, content) in [
        (ContentType::text_plain(), plain),
        (ContentType::text_html(), html),
    ] {
        if content.is_empty() {
            continue;
        }
        let headers = Headers::new().with("Content-Type", content_type.to_string());
        section.write_part(&headers, content)?;
    }

    section.close()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    fn body(plain: &str, html: &str, boundary: &str) -> String {
        let mut out = Vec::new();
        write_body(&mut out, plain.as_bytes(), html.as_bytes(), boundary).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_body_empty() {
        assert_eq!(body("", "", "test"), "\r\n--test--\r\n");
    }

    #[test]
    fn test_write_body_html_only() {
        assert_eq!(
            body("", "HTML", "t"),
            "--t\r\nContent-Type: text/html; charset=UTF-8\r\n\r\nHTML\r\n--t--\r\n"
        );
    }

    #[test]
    fn test_write_body_plain_only() {
        assert_eq!(
            body("Plain", "", "t"),
            "--t\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nPlain\r\n--t--\r\n"
        );
    }

    #[test]
    fn test_write_body_plain_before_html() {
        assert_eq!(
            body("Plain", "HTML", "t"),
            "--t\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nPlain\r\n\
             --t\r\nContent-Type: text/html; charset=UTF-8\r\n\r\nHTML\r\n--t--\r\n"
        );
    }

    #[test]
    fn test_body_part_write() {
        let mut part = BodyPart::new();
        assert!(part.is_empty());
        write!(part, "Hello, {}!", "World").unwrap();
        assert_eq!(part.as_bytes(), b"Hello, World!");
        assert_eq!(part.len(), 13);
    }

    #[test]
    fn test_body_part_set_replaces() {
        let mut part = BodyPart::from("old content");
        part.set("new");
        assert_eq!(part.as_bytes(), b"new");
        part.clear();
        assert!(part.is_empty());
    }
}
