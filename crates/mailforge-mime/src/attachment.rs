//! File attachments.

use std::fmt;
use std::io::{Cursor, Read, Write};

use tracing::trace;

use crate::content_type::ContentType;
use crate::encoding::encode_base64_wrapped;
use crate::error::{Error, Result};
use crate::header::{Headers, sanitize};
use crate::multipart::MultipartWriter;

/// A named binary payload.
///
/// The content source is read to exhaustion exactly once, when the
/// attachment is encoded into a message.
pub struct Attachment {
    filename: String,
    content_type: Option<ContentType>,
    source: Box<dyn Read + Send>,
}

impl Attachment {
    /// Creates an attachment reading its content from `source`.
    ///
    /// Line breaks are stripped from the filename.
    pub fn new(filename: impl AsRef<str>, source: impl Read + Send + 'static) -> Self {
        Self {
            filename: sanitize(filename.as_ref()),
            content_type: None,
            source: Box::new(source),
        }
    }

    /// Creates an attachment from in-memory bytes.
    pub fn from_bytes(filename: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Self {
        Self::new(filename, Cursor::new(content.into()))
    }

    /// Overrides the content type guessed from the filename.
    #[must_use]
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Returns the filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns the content type of the part.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.content_type
            .clone()
            .unwrap_or_else(|| ContentType::from_filename(&self.filename))
    }

    /// Reads the remaining content of the source.
    ///
    /// Once the source has been consumed further calls return no bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Read`] if the source fails before end of data.
    pub fn read_content(&mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        self.source
            .read_to_end(&mut content)
            .map_err(|e| Error::read(&self.filename, e))?;
        Ok(content)
    }

    /// Returns the part headers for this attachment.
    #[must_use]
    pub fn headers(&self) -> Headers {
        Headers::new()
            .with(
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            )
            .with("Content-Transfer-Encoding", "base64")
            .with("Content-Type", self.content_type().to_string())
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Reads, encodes and writes one attachment as a part of `section`.
///
/// The content is base64 encoded and wrapped at `line_length` columns
/// (`0` keeps it on one line).
///
/// # Errors
///
/// Returns [`Error::Read`] if the source cannot be read and
/// [`Error::Write`] if the sink rejects a write.
pub fn write_attachment<W: Write + ?Sized>(
    section: &mut MultipartWriter<'_, W>,
    attachment: &mut Attachment,
    line_length: usize,
) -> Result<()> {
    let content = attachment.read_content()?;
    let encoded = encode_base64_wrapped(&content, line_length);

    trace!(
        filename = %attachment.filename(),
        raw_bytes = content.len(),
        encoded_bytes = encoded.len(),
        "encoding attachment"
    );

    section.write_part(&attachment.headers(), encoded.as_bytes())?;
    Ok(())
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
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "source closed"))
        }
    }

    #[test]
    fn test_read_content_consumes_source() {
        let mut attachment = Attachment::from_bytes("test.txt", "content");
        assert_eq!(attachment.read_content().unwrap(), b"content");
        assert!(attachment.read_content().unwrap().is_empty());
    }

    #[test]
    fn test_read_failure_names_attachment() {
        let mut attachment = Attachment::new("broken.bin", FailingReader);
        let err = attachment.read_content().unwrap_err();
        assert!(err.is_read());
        assert!(err.to_string().contains("broken.bin"));
    }

    #[test]
    fn test_filename_is_sanitized() {
        let attachment = Attachment::from_bytes("evil\r\n.txt", "x");
        assert_eq!(attachment.filename(), "evil.txt");
    }

    #[test]
    fn test_headers_order() {
        let attachment = Attachment::from_bytes("test.txt", "content");
        assert_eq!(
            attachment.headers().to_string(),
            "Content-Disposition: attachment; filename=test.txt\r\n\
             Content-Transfer-Encoding: base64\r\n\
             Content-Type: text/plain\r\n"
        );
    }

    #[test]
    fn test_content_type_override() {
        let attachment = Attachment::from_bytes("test.txt", "content")
            .with_content_type(ContentType::octet_stream());
        assert_eq!(
            attachment.headers().get("Content-Type"),
            Some("application/octet-stream")
        );
    }

    #[test]
    fn test_write_attachment() {
        let mut out = Vec::new();
        let mut section = MultipartWriter::new(&mut out, "mixed");
        let mut attachment = Attachment::from_bytes("another.txt", "another");
        write_attachment(&mut section, &mut attachment, 76).unwrap();
        section.close().unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "--mixed\r\n\
             Content-Disposition: attachment; filename=another.txt\r\n\
             Content-Transfer-Encoding: base64\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             YW5vdGhlcg==\r\n--mixed--\r\n"
        );
    }

    #[test]
    fn test_write_attachment_read_failure() {
        let mut out = Vec::new();
        let mut section = MultipartWriter::new(&mut out, "mixed");
        let mut attachment = Attachment::new("broken.bin", FailingReader);
        let err = write_attachment(&mut section, &mut attachment, 76).unwrap_err();
        assert!(err.is_read());
        assert_eq!(section.parts(), 0);
    }
}
