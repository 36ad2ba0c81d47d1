//! Outgoing message composition.

use std::fmt;
use std::io::Write;

use tracing::{debug, trace};

use crate::attachment::{Attachment, write_attachment};
use crate::body::{BodyPart, write_body};
use crate::boundary::Boundaries;
use crate::config::ComposeConfig;
use crate::content_type::ContentType;
use crate::encoding::encode_rfc2047;
use crate::error::Result;
use crate::header::{Headers, sanitize};
use crate::multipart::MultipartWriter;

/// Progress of a message build.
///
/// A build walks these states in order; any write or read failure aborts
/// it where it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyState {
    /// Nothing written yet.
    Init,
    /// Envelope headers written.
    HeadersWritten,
    /// Outer `multipart/mixed` content type written.
    MixedOpened,
    /// Nested `multipart/alternative` body section written and closed.
    AlternativeWritten,
    /// Every attachment part written.
    AttachmentsWritten,
    /// Outer section closed; the message is complete.
    MixedClosed,
}

impl fmt::Display for AssemblyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::HeadersWritten => write!(f, "headers-written"),
            Self::MixedOpened => write!(f, "mixed-opened"),
            Self::AlternativeWritten => write!(f, "alternative-written"),
            Self::AttachmentsWritten => write!(f, "attachments-written"),
            Self::MixedClosed => write!(f, "mixed-closed"),
        }
    }
}

/// An outgoing email message.
///
/// Setters strip CR and LF from header values. A message is consumed by
/// [`Message::build`] or [`Message::write_to`], so it is serialized exactly
/// once and each attachment source is read exactly once.
#[derive(Debug, Default)]
pub struct Message {
    from_addr: String,
    from_name: String,
    to_addrs: Vec<String>,
    cc_addrs: Vec<String>,
    bcc_addrs: Vec<String>,
    subject: String,
    reply_to: String,
    plain: BodyPart,
    html: BodyPart,
    attachments: Vec<Attachment>,
    config: ComposeConfig,
}

impl Message {
    /// Creates an empty message with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty message with the given configuration.
    #[must_use]
    pub fn with_config(config: ComposeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Sets the sender address.
    #[must_use]
    pub fn from(mut self, address: impl AsRef<str>) -> Self {
        self.from_addr = sanitize(address.as_ref());
        self
    }

    /// Sets the sender display name.
    #[must_use]
    pub fn sender_name(mut self, name: impl AsRef<str>) -> Self {
        self.from_name = sanitize(name.as_ref());
        self
    }

    /// Adds a primary recipient.
    #[must_use]
    pub fn to(mut self, address: impl AsRef<str>) -> Self {
        self.to_addrs.push(sanitize(address.as_ref()));
        self
    }

    /// Adds multiple primary recipients.
    #[must_use]
    pub fn to_all(mut self, addresses: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        self.to_addrs
            .extend(addresses.into_iter().map(|a| sanitize(a.as_ref())));
        self
    }

    /// Adds a CC recipient.
    #[must_use]
    pub fn cc(mut self, address: impl AsRef<str>) -> Self {
        self.cc_addrs.push(sanitize(address.as_ref()));
        self
    }

    /// Adds a BCC recipient. BCC addresses never appear in the headers.
    #[must_use]
    pub fn bcc(mut self, address: impl AsRef<str>) -> Self {
        self.bcc_addrs.push(sanitize(address.as_ref()));
        self
    }

    /// Sets the subject line.
    #[must_use]
    pub fn subject(mut self, subject: impl AsRef<str>) -> Self {
        self.subject = sanitize(subject.as_ref());
        self
    }

    /// Sets the reply-to address.
    #[must_use]
    pub fn reply_to(mut self, address: impl AsRef<str>) -> Self {
        self.reply_to = sanitize(address.as_ref());
        self
    }

    /// Sets the plain-text body.
    #[must_use]
    pub fn plain(mut self, content: impl AsRef<[u8]>) -> Self {
        self.plain.set(content);
        self
    }

    /// Sets the HTML body.
    #[must_use]
    pub fn html(mut self, content: impl AsRef<[u8]>) -> Self {
        self.html.set(content);
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Returns the plain-text body for writing.
    pub const fn plain_mut(&mut self) -> &mut BodyPart {
        &mut self.plain
    }

    /// Returns the HTML body for writing.
    pub const fn html_mut(&mut self) -> &mut BodyPart {
        &mut self.html
    }

    /// Returns the composition configuration.
    #[must_use]
    pub const fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Returns the number of attachments.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// Returns every envelope recipient: To, then CC, then BCC.
    ///
    /// Empty addresses are skipped.
    #[must_use]
    pub fn recipients(&self) -> Vec<&str> {
        self.to_addrs
            .iter()
            .chain(&self.cc_addrs)
            .chain(&self.bcc_addrs)
            .filter(|addr| !addr.is_empty())
            .map(String::as_str)
            .collect()
    }

    /// Formats the `From` header value.
    ///
    /// `Name <address>` when a display name is set, otherwise the bare
    /// address (which may be empty).
    #[must_use]
    pub fn format_from(&self) -> String {
        if self.from_name.is_empty() {
            return self.from_addr.clone();
        }

        let name = if self.config.encode_headers {
            encode_rfc2047(&self.from_name)
        } else {
            self.from_name.clone()
        };
        format!("{name} <{}>", self.from_addr)
    }

    /// Returns the envelope headers in their fixed output order.
    ///
    /// `From`, `Mime-Version`, `Reply-To` (only when set), `Subject`, one
    /// `To` per recipient (a single empty `To` when there are none), then
    /// one `Cc` per CC recipient.
    #[must_use]
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.add("From", self.format_from());
        headers.add("Mime-Version", "1.0");

        if !self.reply_to.is_empty() {
            headers.add("Reply-To", self.reply_to.as_str());
        }

        let subject = if self.config.encode_headers {
            encode_rfc2047(&self.subject)
        } else {
            self.subject.clone()
        };
        headers.add("Subject", subject);

        if self.to_addrs.is_empty() {
            headers.add("To", "");
        }
        for addr in &self.to_addrs {
            headers.add("To", addr.as_str());
        }
        for addr in &self.cc_addrs {
            headers.add("Cc", addr.as_str());
        }

        headers
    }

    /// Builds the message with boundaries from the configured strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment source cannot be read.
    pub fn build(self) -> Result<Vec<u8>> {
        let boundaries = self.config.boundaries.boundaries();
        self.build_with_boundaries(&boundaries)
    }

    /// Builds the message with the given boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment source cannot be read.
    pub fn build_with_boundaries(self, boundaries: &Boundaries) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.write_with_boundaries(&mut out, boundaries)?;
        Ok(out)
    }

    /// Writes the message into `out` with boundaries from the configured
    /// strategy.
    ///
    /// On error, whatever was already written to `out` is incomplete and
    /// should be discarded by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment source cannot be read or the
    /// sink rejects a write.
    pub fn write_to<W: Write + ?Sized>(self, out: &mut W) -> Result<()> {
        let boundaries = self.config.boundaries.boundaries();
        self.write_with_boundaries(out, &boundaries)
    }

    /// Writes the message into `out` with the given boundaries.
    ///
    /// # Errors
    ///
    /// Returns an error if an attachment source cannot be read or the
    /// sink rejects a write.
    pub fn write_with_boundaries<W: Write + ?Sized>(
        mut self,
        out: &mut W,
        boundaries: &Boundaries,
    ) -> Result<()> {
        debug!(
            recipients = self.to_addrs.len() + self.cc_addrs.len() + self.bcc_addrs.len(),
            attachments = self.attachments.len(),
            plain = !self.plain.is_empty(),
            html = !self.html.is_empty(),
            "building message"
        );

        let mut state = AssemblyState::Init;

        self.headers().write_to(out)?;
        advance(&mut state, AssemblyState::HeadersWritten);

        write!(
            out,
            "Content-Type: {}\r\n\r\n",
            ContentType::multipart_mixed(boundaries.mixed.as_str())
        )?;
        advance(&mut state, AssemblyState::MixedOpened);

        let mut mixed = MultipartWriter::new(out, &boundaries.mixed);

        let alternative = Headers::new().with(
            "Content-Type",
            ContentType::multipart_alternative(boundaries.alternative.as_str()).to_string(),
        );
        let sink = mixed.open_part(&alternative)?;
        write_body(
            sink,
            self.plain.as_bytes(),
            self.html.as_bytes(),
            &boundaries.alternative,
        )?;
        advance(&mut state, AssemblyState::AlternativeWritten);

        for attachment in &mut self.attachments {
            write_attachment(&mut mixed, attachment, self.config.line_length)?;
        }
        advance(&mut state, AssemblyState::AttachmentsWritten);

        mixed.close()?;
        advance(&mut state, AssemblyState::MixedClosed);

        Ok(())
    }
}

fn advance(state: &mut AssemblyState, next: AssemblyState) {
    trace!(from = %state, to = %next, "assembly state");
    *state = next;
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

    fn fixed() -> Boundaries {
        Boundaries::new("mixed", "alt")
    }

    #[test]
    fn test_from_header_with_name() {
        let message = Message::new().from("dom@itsallbroken.com").sender_name("Dom");
        assert_eq!(message.format_from(), "Dom <dom@itsallbroken.com>");
    }

    #[test]
    fn test_from_header_without_name() {
        let message = Message::new().from("dom@itsallbroken.com");
        assert_eq!(message.format_from(), "dom@itsallbroken.com");
    }

    #[test]
    fn test_from_header_without_either() {
        assert_eq!(Message::new().format_from(), "");
        assert_eq!(Message::new().headers().to_string().lines().next(), Some("From: "));
    }

    #[test]
    fn test_headers_all_fields() {
        let message = Message::new()
            .from("dom@itsallbroken.com")
            .sender_name("Dom")
            .to("test@itsallbroken.com")
            .subject("Test")
            .reply_to("help@itsallbroken.com");

        assert_eq!(
            message.headers().to_string(),
            "From: Dom <dom@itsallbroken.com>\r\nMime-Version: 1.0\r\n\
             Reply-To: help@itsallbroken.com\r\nSubject: Test\r\n\
             To: test@itsallbroken.com\r\n"
        );
    }

    #[test]
    fn test_headers_no_reply_to() {
        let message = Message::new()
            .from("dom@itsallbroken.com")
            .sender_name("Dom")
            .to("test@itsallbroken.com");

        assert_eq!(
            message.headers().to_string(),
            "From: Dom <dom@itsallbroken.com>\r\nMime-Version: 1.0\r\n\
             Subject: \r\nTo: test@itsallbroken.com\r\n"
        );
    }

    #[test]
    fn test_headers_multiple_to() {
        let message = Message::new()
            .from("dom@itsallbroken.com")
            .sender_name("Dom")
            .to_all(["test@itsallbroken.com", "repairs@itsallbroken.com"]);

        assert_eq!(
            message.headers().to_string(),
            "From: Dom <dom@itsallbroken.com>\r\nMime-Version: 1.0\r\nSubject: \r\n\
             To: test@itsallbroken.com\r\nTo: repairs@itsallbroken.com\r\n"
        );
    }

    #[test]
    fn test_headers_empty_to_list() {
        let headers = Message::new().headers();
        assert_eq!(headers.get_all("To"), vec![""]);
    }

    #[test]
    fn test_headers_cc_and_bcc() {
        let message = Message::new()
            .to("a@example.com")
            .cc("b@example.com")
            .cc("c@example.com")
            .bcc("hidden@example.com");

        let headers = message.headers();
        assert_eq!(headers.get_all("Cc"), vec!["b@example.com", "c@example.com"]);
        assert_eq!(headers.get("Bcc"), None);
        assert!(!headers.to_string().contains("hidden@example.com"));
    }

    #[test]
    fn test_recipients() {
        let message = Message::new()
            .to("")
            .to("a@example.com")
            .cc("b@example.com")
            .bcc("c@example.com");

        assert_eq!(
            message.recipients(),
            vec!["a@example.com", "b@example.com", "c@example.com"]
        );
    }

    #[test]
    fn test_setters_strip_line_breaks() {
        let message = Message::new()
            .subject("Hello\r\nBcc: victim@example.com")
            .to("a@example.com\n")
            .reply_to("r@example.com\r");

        let headers = message.headers();
        assert_eq!(headers.get("Subject"), Some("HelloBcc: victim@example.com"));
        assert_eq!(headers.get("To"), Some("a@example.com"));
        assert_eq!(headers.get("Reply-To"), Some("r@example.com"));
    }

    #[test]
    fn test_encoded_headers() {
        let config = ComposeConfig::builder().encode_headers(true).build();
        let message = Message::with_config(config)
            .from("a@example.com")
            .sender_name("Héllo")
            .subject("Héllo");

        let headers = message.headers();
        assert_eq!(headers.get("From"), Some("=?UTF-8?B?SMOpbGxv?= <a@example.com>"));
        assert_eq!(headers.get("Subject"), Some("=?UTF-8?B?SMOpbGxv?="));
    }

    #[test]
    fn test_build_empty() {
        let got = Message::new()
            .to("")
            .build_with_boundaries(&fixed())
            .unwrap();

        assert_eq!(
            String::from_utf8(got).unwrap(),
            "From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n\
             Content-Type: multipart/mixed;\r\n\tboundary=\"mixed\"; charset=UTF-8\r\n\r\n\
             --mixed\r\nContent-Type: multipart/alternative;\r\n\tboundary=\"alt\"\r\n\r\n\
             \r\n--alt--\r\n\r\n--mixed--\r\n"
        );
    }

    #[test]
    fn test_build_uses_configured_boundaries() {
        let config = ComposeConfig::builder().fixed_boundaries("outer", "inner").build();
        let got = String::from_utf8(Message::with_config(config).build().unwrap()).unwrap();
        assert!(got.contains("boundary=\"outer\""));
        assert!(got.contains("boundary=\"inner\""));
        assert!(got.ends_with("\r\n--outer--\r\n"));
    }

    #[test]
    fn test_plain_mut_streams_body() {
        let mut message = Message::new();
        write!(message.plain_mut(), "Plain").unwrap();
        message.html_mut().set("HTML");

        let got = String::from_utf8(message.build_with_boundaries(&fixed()).unwrap()).unwrap();
        let plain = got.find("Plain").unwrap();
        let html = got.find("HTML").unwrap();
        assert!(plain < html);
    }

    #[test]
    fn test_config_and_attachment_count() {
        let config = ComposeConfig::builder().line_length(0).build();
        let message = Message::with_config(config.clone())
            .attach(Attachment::from_bytes("a.txt", "a"))
            .attach(Attachment::from_bytes("b.txt", "b"));

        assert_eq!(message.config(), &config);
        assert_eq!(message.attachment_count(), 2);
        assert_eq!(Message::new().attachment_count(), 0);
        assert_eq!(Message::new().config(), &ComposeConfig::default());
    }

    #[test]
    fn test_assembly_state_display() {
        assert_eq!(AssemblyState::Init.to_string(), "init");
        assert_eq!(AssemblyState::MixedClosed.to_string(), "mixed-closed");
    }
}
