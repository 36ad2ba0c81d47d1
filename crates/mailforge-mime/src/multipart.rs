//! Boundary-delimited multipart section writer.
//!
//! The first part opens with `--boundary`; every later part is preceded by
//! a CRLF so that the line break before a delimiter belongs to the
//! delimiter, not to the previous part's content. Closing always emits
//! `\r\n--boundary--\r\n`, which for a section without parts is the whole
//! section.

use std::io::{self, Write};

use crate::header::Headers;

/// Writes the parts of one multipart section into a shared sink.
#[derive(Debug)]
pub struct MultipartWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    boundary: &'a str,
    parts: usize,
}

impl<'a, W: Write + ?Sized> MultipartWriter<'a, W> {
    /// Creates a writer for the section delimited by `boundary`.
    pub const fn new(out: &'a mut W, boundary: &'a str) -> Self {
        Self {
            out,
            boundary,
            parts: 0,
        }
    }

    /// Returns the section boundary.
    #[must_use]
    pub const fn boundary(&self) -> &str {
        self.boundary
    }

    /// Returns the number of parts opened so far.
    #[must_use]
    pub const fn parts(&self) -> usize {
        self.parts
    }

    /// Opens a new part and writes its headers.
    ///
    /// Returns the underlying sink so the part content can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a write.
    pub fn open_part(&mut self, headers: &Headers) -> io::Result<&mut W> {
        if self.parts > 0 {
            self.out.write_all(b"\r\n")?;
        }
        write!(self.out, "--{}\r\n", self.boundary)?;
        headers.write_to(&mut *self.out)?;
        self.out.write_all(b"\r\n")?;
        self.parts += 1;
        Ok(&mut *self.out)
    }

    /// Writes a complete part: headers followed by `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a write.
    pub fn write_part(&mut self, headers: &Headers, content: &[u8]) -> io::Result<()> {
        self.open_part(headers)?.write_all(content)
    }

    /// Writes the closing delimiter.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects a write.
    pub fn close(self) -> io::Result<()> {
        write!(self.out, "\r\n--{}--\r\n", self.boundary)
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

    fn text_headers() -> Headers {
        Headers::new().with("Content-Type", "text/plain")
    }

    #[test]
    fn test_empty_section() {
        let mut out = Vec::new();
        let writer = MultipartWriter::new(&mut out, "b");
        assert_eq!(writer.parts(), 0);
        writer.close().unwrap();
        assert_eq!(out, b"\r\n--b--\r\n");
    }

    #[test]
    fn test_single_part() {
        let mut out = Vec::new();
        let mut writer = MultipartWriter::new(&mut out, "b");
        writer.write_part(&text_headers(), b"one").unwrap();
        writer.close().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--b\r\nContent-Type: text/plain\r\n\r\none\r\n--b--\r\n"
        );
    }

    #[test]
    fn test_delimiter_between_parts() {
        let mut out = Vec::new();
        let mut writer = MultipartWriter::new(&mut out, "b");
        writer.write_part(&text_headers(), b"one").unwrap();
        writer.write_part(&Headers::new(), b"two").unwrap();
        assert_eq!(writer.parts(), 2);
        writer.close().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--b\r\nContent-Type: text/plain\r\n\r\none\r\n--b\r\n\r\ntwo\r\n--b--\r\n"
        );
    }

    #[test]
    fn test_open_part_streams_content() {
        let mut out = Vec::new();
        let mut writer = MultipartWriter::new(&mut out, "outer");
        assert_eq!(writer.boundary(), "outer");
        let sink = writer.open_part(&Headers::new()).unwrap();
        sink.write_all(b"nested").unwrap();
        writer.close().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--outer\r\n\r\nnested\r\n--outer--\r\n"
        );
    }
}
