//! MIME header handling.

use std::fmt;
use std::io::{self, Write};

/// Ordered collection of header fields.
///
/// Fields are written in insertion order, each as a CRLF-terminated
/// `Name: value` line. Names keep the casing they were added with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a header field.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Appends a header field, returning the collection.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Gets the first value for a header (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Gets all values for a header in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over all fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Writes every field as a CRLF-terminated line.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer rejects a write.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        for (name, value) in &self.fields {
            write!(out, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.fields {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

/// Removes line breaks from a header value.
///
/// A CR or LF inside a value would let it start a new header line, so both
/// are dropped.
#[must_use]
pub fn sanitize(value: &str) -> String {
    value.chars().filter(|&c| c != '\r' && c != '\n').collect()
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

    #[test]
    fn test_headers_new() {
        let headers = Headers::new();
        assert!(headers.is_empty());
        assert_eq!(headers.to_string(), "");
    }

    #[test]
    fn test_headers_add_get() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/plain");
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("content-type"), Some("text/plain")); // Case insensitive
        assert_eq!(headers.get("Subject"), None);
    }

    #[test]
    fn test_headers_keep_order_and_duplicates() {
        let headers = Headers::new()
            .with("To", "alice@example.com")
            .with("Subject", "Hi")
            .with("To", "bob@example.com");

        assert_eq!(headers.len(), 3);
        assert_eq!(
            headers.get_all("to"),
            vec!["alice@example.com", "bob@example.com"]
        );
        assert_eq!(
            headers.to_string(),
            "To: alice@example.com\r\nSubject: Hi\r\nTo: bob@example.com\r\n"
        );
    }

    #[test]
    fn test_headers_write_to() {
        let headers = Headers::new().with("Mime-Version", "1.0").with("Subject", "");
        let mut out = Vec::new();
        headers.write_to(&mut out).unwrap();
        assert_eq!(out, b"Mime-Version: 1.0\r\nSubject: \r\n");
    }

    #[test]
    fn test_headers_iter() {
        let headers = Headers::new().with("From", "a").with("To", "b");
        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("From", "a"), ("To", "b")]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("plain"), "plain");
        assert_eq!(sanitize("evil\r\nBcc: victim@example.com"), "evilBcc: victim@example.com");
        assert_eq!(sanitize("a\nb\rc"), "abc");
        assert_eq!(sanitize(""), "");
    }
}
