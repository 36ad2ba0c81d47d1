//! Integration tests for message composition.
//!
//! Messages are built with fixed boundaries so the output can be compared
//! byte for byte, and attachment parts are located with a small splitter
//! that walks the outer `multipart/mixed` section.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{self, Cursor, Read, Write};
use std::sync::{Arc, Mutex};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use mailforge_mime::{Attachment, Boundaries, ComposeConfig, Message};
use tracing_subscriber::fmt::MakeWriter;

const EMPTY_BODY: &str = "Content-Type: multipart/mixed;\r\n\tboundary=\"mixed\"; charset=UTF-8\r\n\r\n\
                          --mixed\r\nContent-Type: multipart/alternative;\r\n\tboundary=\"alt\"\r\n\r\n\
                          \r\n--alt--\r\n\r\n--mixed--\r\n";

fn fixed() -> Boundaries {
    Boundaries::new("mixed", "alt")
}

fn build(message: Message) -> String {
    String::from_utf8(message.build_with_boundaries(&fixed()).unwrap()).unwrap()
}

/// One part of a multipart section: unfolded headers and raw body.
struct SplitPart {
    headers: Vec<(String, String)>,
    body: String,
}

impl SplitPart {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Splits the outer section delimited by `boundary` into its parts.
fn split_parts(message: &str, boundary: &str) -> Vec<SplitPart> {
    let opening = format!("\r\n\r\n--{boundary}\r\n");
    let start = message.find(&opening).expect("missing opening delimiter") + 2;
    let section = &message[start..];

    let delimiter = format!("\r\n--{boundary}");
    let mut chunks: Vec<&str> = section.split(&delimiter).collect();
    assert_eq!(chunks.first(), Some(&""));
    assert_eq!(chunks.pop(), Some("--\r\n"));

    chunks
        .into_iter()
        .skip(1)
        .map(|chunk| {
            let chunk = chunk.strip_prefix("\r\n").expect("delimiter not followed by CRLF");
            let (head, body) = chunk.split_once("\r\n\r\n").expect("missing header end");
            let mut headers: Vec<(String, String)> = Vec::new();
            for line in head.split("\r\n") {
                if let Some(continuation) = line.strip_prefix('\t') {
                    if let Some((_, value)) = headers.last_mut() {
                        value.push(' ');
                        value.push_str(continuation);
                    }
                } else if let Some((name, value)) = line.split_once(": ") {
                    headers.push((name.to_string(), value.to_string()));
                }
            }
            SplitPart {
                headers,
                body: body.to_string(),
            }
        })
        .collect()
}

fn attachment_parts(message: &str) -> Vec<SplitPart> {
    split_parts(message, "mixed")
        .into_iter()
        .filter(|part| part.header("Content-Disposition").is_some())
        .collect()
}

fn decode(body: &str) -> Vec<u8> {
    let cleaned: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD.decode(cleaned).unwrap()
}

#[test]
fn build_empty() {
    let got = build(Message::new().to(""));
    assert_eq!(
        got,
        format!("From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n{EMPTY_BODY}")
    );
}

#[test]
fn build_html_only() {
    let got = build(Message::new().to("").html("HTML"));
    assert_eq!(
        got,
        "From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n\
         Content-Type: multipart/mixed;\r\n\tboundary=\"mixed\"; charset=UTF-8\r\n\r\n\
         --mixed\r\nContent-Type: multipart/alternative;\r\n\tboundary=\"alt\"\r\n\r\n\
         --alt\r\nContent-Type: text/html; charset=UTF-8\r\n\r\nHTML\r\n--alt--\r\n\
         \r\n--mixed--\r\n"
    );
}

#[test]
fn build_plain_only() {
    let got = build(Message::new().to("").plain("Plain"));
    assert_eq!(
        got,
        "From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n\
         Content-Type: multipart/mixed;\r\n\tboundary=\"mixed\"; charset=UTF-8\r\n\r\n\
         --mixed\r\nContent-Type: multipart/alternative;\r\n\tboundary=\"alt\"\r\n\r\n\
         --alt\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\nPlain\r\n--alt--\r\n\
         \r\n--mixed--\r\n"
    );
}

#[test]
fn build_header_variants() {
    let cases = [
        (
            Message::new().to("").reply_to("reply"),
            "From: \r\nMime-Version: 1.0\r\nReply-To: reply\r\nSubject: \r\nTo: \r\n",
        ),
        (
            Message::new().to("").sender_name("name"),
            "From: name <>\r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n",
        ),
        (
            Message::new().to("").from("addr").sender_name("name"),
            "From: name <addr>\r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n",
        ),
        (
            Message::new().to("").from("from"),
            "From: from\r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n",
        ),
        (
            Message::new().to("").subject("subject"),
            "From: \r\nMime-Version: 1.0\r\nSubject: subject\r\nTo: \r\n",
        ),
        (
            Message::new().to_all(["one", "two"]),
            "From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: one\r\nTo: two\r\n",
        ),
    ];

    for (message, headers) in cases {
        assert_eq!(build(message), format!("{headers}{EMPTY_BODY}"));
    }
}

#[test]
fn build_scenario_headers() {
    let got = build(
        Message::new()
            .from("dom@x.com")
            .sender_name("Dom")
            .to("test@x.com")
            .subject("Test")
            .reply_to("help@x.com"),
    );
    assert!(got.starts_with(
        "From: Dom <dom@x.com>\r\nMime-Version: 1.0\r\nReply-To: help@x.com\r\n\
         Subject: Test\r\nTo: test@x.com\r\nContent-Type: multipart/mixed;"
    ));
}

#[test]
fn build_without_attachments_has_no_disposition() {
    let got = build(Message::new().plain("Plain").html("HTML"));
    assert!(attachment_parts(&got).is_empty());
    assert_eq!(split_parts(&got, "mixed").len(), 1);
}

#[test]
fn build_one_attachment() {
    let got = build(Message::new().attach(Attachment::from_bytes("test.txt", "content")));

    let parts = attachment_parts(&got);
    assert_eq!(parts.len(), 1);
    assert_eq!(
        parts[0].header("Content-Disposition"),
        Some("attachment; filename=test.txt")
    );
    assert_eq!(parts[0].header("Content-Transfer-Encoding"), Some("base64"));
    assert_eq!(parts[0].body, "Y29udGVudA==");
}

#[test]
fn build_two_attachments_in_order() {
    let got = build(
        Message::new()
            .attach(Attachment::new("test.txt", Cursor::new("content")))
            .attach(Attachment::new("another.txt", Cursor::new("another"))),
    );

    let parts = attachment_parts(&got);
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts[0].header("Content-Disposition"),
        Some("attachment; filename=test.txt")
    );
    assert_eq!(parts[0].body, "Y29udGVudA==");
    assert_eq!(
        parts[1].header("Content-Disposition"),
        Some("attachment; filename=another.txt")
    );
    assert_eq!(parts[1].body, "YW5vdGhlcg==");
}

#[test]
fn build_attachment_after_body_section() {
    let got = build(
        Message::new()
            .plain("Plain")
            .html("HTML")
            .attach(Attachment::from_bytes("test.txt", "content")),
    );

    let parts = split_parts(&got, "mixed");
    assert_eq!(parts.len(), 2);
    assert_eq!(
        parts[0].header("Content-Type"),
        Some("multipart/alternative; boundary=\"alt\"")
    );
    assert!(parts[0].body.ends_with("\r\n--alt--\r\n"));
    assert_eq!(parts[1].header("Content-Type"), Some("text/plain"));
}

#[test]
fn build_large_attachment_round_trips() {
    let content: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let got = build(Message::new().attach(Attachment::from_bytes("blob.bin", content.clone())));

    let parts = attachment_parts(&got);
    assert_eq!(parts.len(), 1);
    assert!(parts[0].body.split("\r\n").all(|line| line.len() <= 76));
    assert_eq!(decode(&parts[0].body), content);
    assert_eq!(parts[0].header("Content-Type"), Some("application/octet-stream"));
}

#[test]
fn build_unwrapped_attachment() {
    let config = ComposeConfig::builder()
        .fixed_boundaries("mixed", "alt")
        .line_length(0)
        .build();
    let content = vec![42u8; 500];
    let got = Message::with_config(config)
        .attach(Attachment::from_bytes("blob.bin", content.clone()))
        .build()
        .unwrap();
    let got = String::from_utf8(got).unwrap();

    let parts = attachment_parts(&got);
    assert!(!parts[0].body.contains("\r\n"));
    assert_eq!(decode(&parts[0].body), content);
}

#[test]
fn build_is_reproducible_with_fixed_boundaries() {
    let make = || {
        Message::new()
            .from("dom@x.com")
            .sender_name("Dom")
            .to("test@x.com")
            .cc("cc@x.com")
            .subject("Test")
            .plain("Plain")
            .html("HTML")
            .attach(Attachment::from_bytes("test.txt", "content"))
    };
    assert_eq!(build(make()), build(make()));
}

#[test]
fn build_random_boundaries_differ_between_messages() {
    let first = String::from_utf8(Message::new().build().unwrap()).unwrap();
    let second = String::from_utf8(Message::new().build().unwrap()).unwrap();
    assert_ne!(first, second);
    assert!(first.ends_with("--\r\n"));
}

#[test]
fn build_cc_follows_to() {
    let got = build(Message::new().to("a@x.com").cc("b@x.com").bcc("c@x.com"));
    assert!(got.contains("To: a@x.com\r\nCc: b@x.com\r\nContent-Type: multipart/mixed;"));
    assert!(!got.contains("c@x.com"));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device unplugged"))
    }
}

#[test]
fn read_failure_aborts_build() {
    let err = Message::new()
        .attach(Attachment::from_bytes("ok.txt", "fine"))
        .attach(Attachment::new("broken.bin", FailingReader))
        .build_with_boundaries(&fixed())
        .unwrap_err();

    assert!(err.is_read());
    assert!(err.to_string().contains("broken.bin"));
}

/// Accepts writes until `limit` bytes have been written.
struct LimitedWriter {
    written: Vec<u8>,
    limit: usize,
}

impl Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "sink full"));
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_aborts_build() {
    for limit in [0, 10, 120, 200] {
        let mut sink = LimitedWriter {
            written: Vec::new(),
            limit,
        };
        let err = Message::new()
            .to("a@x.com")
            .plain("Plain")
            .attach(Attachment::from_bytes("test.txt", "content"))
            .write_with_boundaries(&mut sink, &fixed())
            .unwrap_err();

        assert!(err.is_write(), "limit {limit}");
        assert!(sink.written.len() <= limit);
    }
}

#[test]
fn write_to_streams_into_caller_sink() {
    let mut sink = Vec::new();
    let config = ComposeConfig::builder().fixed_boundaries("mixed", "alt").build();
    Message::with_config(config).to("").write_to(&mut sink).unwrap();
    assert_eq!(
        String::from_utf8(sink).unwrap(),
        format!("From: \r\nMime-Version: 1.0\r\nSubject: \r\nTo: \r\n{EMPTY_BODY}")
    );
}

/// Shared buffer collecting formatted log lines.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn build_logs_assembly_and_attachment_events() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();

    let got = tracing::subscriber::with_default(subscriber, || {
        build(Message::new().attach(Attachment::from_bytes("test.txt", "content")))
    });
    assert_eq!(attachment_parts(&got).len(), 1);

    let output = logs.contents();
    assert!(output.contains("building message"), "{output}");
    assert!(output.contains("encoding attachment"), "{output}");
    assert!(output.contains("test.txt"), "{output}");
    assert!(output.contains("assembly state"), "{output}");
    assert!(output.contains("to=mixed-closed"), "{output}");
}
