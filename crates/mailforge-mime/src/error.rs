//! Error types for message composition.

use std::io;

/// Result type alias for composition operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Composition error types.
///
/// Empty or missing optional fields are never errors; only the byte
/// sources and sinks involved in a build can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An attachment's content source could not be fully read.
    #[error("Failed to read attachment {filename}: {source}")]
    Read {
        /// Filename of the attachment being read.
        filename: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a write.
    #[error("Failed to write message: {0}")]
    Write(#[from] io::Error),
}

impl Error {
    /// Creates a read error for the named attachment.
    #[must_use]
    pub fn read(filename: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            filename: filename.into(),
            source,
        }
    }

    /// Returns true if this error came from an attachment source.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        matches!(self, Self::Read { .. })
    }

    /// Returns true if this error came from the output sink.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        matches!(self, Self::Write(_))
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
    fn test_read_error_display() {
        let err = Error::read("report.pdf", io::Error::other("disk gone"));
        assert!(err.is_read());
        assert!(!err.is_write());
        assert_eq!(
            err.to_string(),
            "Failed to read attachment report.pdf: disk gone"
        );
    }

    #[test]
    fn test_write_error_from_io() {
        let err: Error = io::Error::new(io::ErrorKind::WriteZero, "full").into();
        assert!(err.is_write());
        assert_eq!(err.to_string(), "Failed to write message: full");
    }
}
