//! MIME encoding utilities.
//!
//! Supports Base64 body encoding (RFC 2045) and RFC 2047 header encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Encodes data as Base64 on a single line.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Encodes data as Base64, breaking lines at `line_length` characters.
///
/// Lines are separated by CRLF with no trailing line break. A
/// `line_length` of zero produces a single line.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8], line_length: usize) -> String {
    let encoded = encode_base64(data);
    if line_length == 0 || encoded.len() <= line_length {
        return encoded;
    }

    let mut result = String::with_capacity(encoded.len() + 2 * (encoded.len() / line_length));
    // Base64 output is pure ASCII, so byte chunks are valid char boundaries
    for (i, chunk) in encoded.as_bytes().chunks(line_length).enumerate() {
        if i > 0 {
            result.push_str("\r\n");
        }
        result.extend(chunk.iter().map(|&b| char::from(b)));
    }
    result
}

/// Longest input chunk per encoded-word; 45 bytes encode to 60 base64
/// characters, keeping each word within the 75 character limit of RFC 2047.
const MAX_WORD_BYTES: usize = 45;

/// Encodes a header value as RFC 2047 encoded-words if needed.
///
/// Format: `=?UTF-8?B?encoded-text?=`. Long values are split on character
/// boundaries into several words separated by a space; decoders drop that
/// space when joining adjacent words. Plain ASCII text without `=?`
/// sequences is returned unchanged.
#[must_use]
pub fn encode_rfc2047(text: &str) -> String {
    if text.is_ascii() && !text.contains("=?") {
        return text.to_string();
    }

    let mut words = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.char_indices() {
        if idx + ch.len_utf8() - start > MAX_WORD_BYTES {
            words.push(encoded_word(&text[start..idx]));
            start = idx;
        }
    }
    words.push(encoded_word(&text[start..]));
    words.join(" ")
}

fn encoded_word(chunk: &str) -> String {
    format!("=?UTF-8?B?{}?=", encode_base64(chunk.as_bytes()))
}
