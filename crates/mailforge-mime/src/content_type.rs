//! MIME content type handling.

use std::fmt;
use std::path::Path;

/// MIME content type with ordered parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    /// Main type (e.g., "text", "application", "multipart").
    pub main_type: String,
    /// Subtype (e.g., "plain", "html", "octet-stream").
    pub sub_type: String,
    /// Parameters in output order (e.g., charset=UTF-8, boundary=xxx).
    pub parameters: Vec<(String, String)>,
}

impl ContentType {
    /// Creates a new content type without parameters.
    #[must_use]
    pub fn new(main_type: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            main_type: main_type.into(),
            sub_type: sub_type.into(),
            parameters: Vec::new(),
        }
    }

    /// Creates a `text/plain; charset=UTF-8` content type.
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "UTF-8")
    }

    /// Creates a `text/html; charset=UTF-8` content type.
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "UTF-8")
    }

    /// Creates an `application/octet-stream` content type.
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Creates a multipart/mixed content type with boundary.
    ///
    /// The mixed container also advertises the UTF-8 charset.
    #[must_use]
    pub fn multipart_mixed(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "mixed")
            .with_parameter("boundary", boundary)
            .with_parameter("charset", "UTF-8")
    }

    /// Creates a multipart/alternative content type with boundary.
    #[must_use]
    pub fn multipart_alternative(boundary: impl Into<String>) -> Self {
        Self::new("multipart", "alternative").with_parameter("boundary", boundary)
    }

    /// Guesses a content type from a filename's extension.
    ///
    /// Falls back to `application/octet-stream` for unknown extensions.
    #[must_use]
    pub fn from_filename(filename: &str) -> Self {
        let guess = mime_guess::from_path(Path::new(filename)).first_or_octet_stream();
        Self::new(guess.type_().as_str(), guess.subtype().as_str())
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Returns the value of a parameter if present.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the boundary parameter if present.
    #[must_use]
    pub fn boundary(&self) -> Option<&str> {
        self.parameter("boundary")
    }

    /// Checks if this is a multipart content type.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.main_type.eq_ignore_ascii_case("multipart")
    }
}

impl fmt::Display for ContentType {
    /// Multipart types fold before their first parameter so the boundary
    /// sits on its own continuation line; the boundary value is quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.sub_type)?;

        for (i, (key, value)) in self.parameters.iter().enumerate() {
            let separator = if i == 0 && self.is_multipart() {
                ";\r\n\t"
            } else {
                "; "
            };
            if key == "boundary" {
                write!(f, "{separator}{key}=\"{value}\"")?;
            } else {
                write!(f, "{separator}{key}={value}")?;
            }
        }

        Ok(())
    }
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
    fn test_text_types() {
        assert_eq!(
            ContentType::text_plain().to_string(),
            "text/plain; charset=UTF-8"
        );
        assert_eq!(
            ContentType::text_html().to_string(),
            "text/html; charset=UTF-8"
        );
    }

    #[test]
    fn test_multipart_mixed() {
        let ct = ContentType::multipart_mixed("mixed");
        assert!(ct.is_multipart());
        assert_eq!(ct.boundary(), Some("mixed"));
        assert_eq!(
            ct.to_string(),
            "multipart/mixed;\r\n\tboundary=\"mixed\"; charset=UTF-8"
        );
    }

    #[test]
    fn test_multipart_alternative() {
        let ct = ContentType::multipart_alternative("alt");
        assert_eq!(ct.to_string(), "multipart/alternative;\r\n\tboundary=\"alt\"");
        assert_eq!(ct.parameter("charset"), None);
    }

    #[test]
    fn test_from_filename() {
        assert_eq!(ContentType::from_filename("notes.txt").to_string(), "text/plain");
        assert_eq!(
            ContentType::from_filename("report.pdf").to_string(),
            "application/pdf"
        );
        assert_eq!(ContentType::from_filename("image.png").to_string(), "image/png");
    }

    #[test]
    fn test_from_filename_unknown() {
        assert_eq!(ContentType::from_filename("blob"), ContentType::octet_stream());
        assert_eq!(
            ContentType::from_filename("data.zz-unknown").to_string(),
            "application/octet-stream"
        );
    }
}
