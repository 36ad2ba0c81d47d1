//! Property tests for header formatting and attachment encoding.

#![allow(clippy::unwrap_used)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use proptest::prelude::*;

use mailforge_mime::encoding::encode_base64_wrapped;
use mailforge_mime::{Attachment, Boundaries, Message};

/// Header-safe text: printable ASCII without line breaks.
fn header_text() -> impl Strategy<Value = String> {
    "[ -~]{0,40}"
}

proptest! {
    #[test]
    fn from_header_uses_name_iff_present(addr in header_text(), name in header_text()) {
        let message = Message::new().from(&addr).sender_name(&name);
        let expected = if name.is_empty() {
            addr.clone()
        } else {
            format!("{name} <{addr}>")
        };
        let from = message.headers().get("From").unwrap().to_string();
        prop_assert_eq!(from, expected);
    }

    #[test]
    fn reply_to_present_iff_non_empty(reply_to in header_text()) {
        let headers = Message::new().reply_to(&reply_to).headers();
        prop_assert_eq!(headers.get("Reply-To").is_some(), !reply_to.is_empty());
    }

    #[test]
    fn to_lines_match_recipients(recipients in prop::collection::vec(header_text(), 1..8)) {
        let headers = Message::new().to_all(&recipients).headers();
        let to: Vec<&str> = headers.get_all("To");
        let expected: Vec<&str> = recipients.iter().map(String::as_str).collect();
        prop_assert_eq!(to, expected);
    }

    #[test]
    fn wrapped_base64_decodes_to_input(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        line_length in prop_oneof![Just(0usize), 4usize..120],
    ) {
        let encoded = encode_base64_wrapped(&data, line_length);
        if line_length > 0 {
            prop_assert!(encoded.split("\r\n").all(|line| line.len() <= line_length));
        }
        let joined: String = encoded.split("\r\n").collect();
        prop_assert_eq!(STANDARD.decode(joined).unwrap(), data);
    }

    #[test]
    fn attachments_round_trip(contents in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..512),
        0..4,
    )) {
        let boundaries = Boundaries::new("mixed", "alt");
        let mut message = Message::new();
        for (i, content) in contents.iter().enumerate() {
            message = message.attach(Attachment::from_bytes(format!("file{i}.bin"), content.clone()));
        }

        let built = String::from_utf8(message.build_with_boundaries(&boundaries).unwrap()).unwrap();
        prop_assert_eq!(
            built.matches("Content-Disposition: attachment;").count(),
            contents.len()
        );

        for (i, content) in contents.iter().enumerate() {
            let marker = format!("Content-Disposition: attachment; filename=file{i}.bin\r\n");
            let start = built.find(&marker).unwrap();
            let after_headers = start + built[start..].find("\r\n\r\n").unwrap() + 4;
            let end = after_headers + built[after_headers..].find("\r\n--mixed").unwrap();
            let joined: String = built[after_headers..end].split("\r\n").collect();
            prop_assert_eq!(&STANDARD.decode(joined).unwrap(), content);
        }
    }

    #[test]
    fn fixed_boundaries_are_deterministic(
        subject in header_text(),
        plain in "[a-z ]{0,64}",
        html in "[a-z<>/ ]{0,64}",
    ) {
        let boundaries = Boundaries::new("mixed", "alt");
        let make = || Message::new().subject(&subject).plain(&plain).html(&html);
        prop_assert_eq!(
            make().build_with_boundaries(&boundaries).unwrap(),
            make().build_with_boundaries(&boundaries).unwrap()
        );
    }
}
