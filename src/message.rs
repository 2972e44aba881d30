//! Splitting a fetched `BODY[]` into its RFC 5322 header block and body.

use mailparse::{MailHeaderMap, MailParseError};

/// A message as fetched from the server, split at the blank line that ends the header block.
///
/// Header values are unfolded and have RFC 2047 encoded-words decoded; the body is left exactly as
/// the server sent it, so [`ParsedMessage::body_len`] is the byte count on the wire.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedMessage {
    headers: Vec<(String, String)>,
    message_id: Option<String>,
    body: Vec<u8>,
}

impl ParsedMessage {
    /// Parse the raw bytes of a message.
    pub fn parse(raw: &[u8]) -> Result<Self, MailParseError> {
        let (headers, offset) = mailparse::parse_headers(raw)?;
        let message_id = headers.get_first_value("Message-Id");
        let headers = headers
            .iter()
            .map(|h| (h.get_key(), h.get_value()))
            .collect();

        Ok(ParsedMessage {
            headers,
            message_id,
            body: raw[offset.min(raw.len())..].to_vec(),
        })
    }

    /// All headers in the order they appear in the message.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers[..]
    }

    /// First value of the named header. Names compare case-insensitively.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// The `Message-Id` header, as written in the message.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// The body bytes following the header block.
    pub fn body(&self) -> &[u8] {
        &self.body[..]
    }

    /// Length in bytes of [`ParsedMessage::body`].
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// Decode an envelope subject, turning RFC 2047 encoded-words into text.
///
/// Anything `mailparse` cannot make sense of is shown as lossy UTF-8 rather than dropped.
pub fn decode_subject(raw: &[u8]) -> String {
    let mut composed = b"Subject: ".to_vec();
    composed.extend_from_slice(raw);
    match mailparse::parse_header(&composed) {
        Ok((header, _)) => header.get_value().trim().to_string(),
        Err(_) => String::from_utf8_lossy(raw).trim().to_string(),
    }
}
