use super::Seq;

/// An IMAP [`FETCH` response](https://tools.ietf.org/html/rfc3501#section-7.4.2) that contains
/// data about a particular message. Only the attributes this crate asks for are kept, and they
/// are copied out of the response buffer so a `Fetch` can outlive the line it was parsed from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fetch {
    /// The ordinal number of this message in its containing mailbox.
    pub message: Seq,

    pub(crate) envelope: Option<Envelope>,
    pub(crate) body: Option<Vec<u8>>,
}

impl Fetch {
    /// The envelope of this message, if `ENVELOPE` was included in the fetch query.
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// The full content of this message, if `BODY[]` (or `BODY.PEEK[]`) was included in the
    /// fetch query and the server returned a non-empty section.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// The parts of an [RFC 3501 envelope](https://tools.ietf.org/html/rfc3501#section-7.4.2) that
/// get reported.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Envelope {
    /// Subject line with any RFC 2047 encoded-words decoded.
    pub subject: Option<String>,
    /// The `Message-Id` as seen by the server.
    pub message_id: Option<String>,
}
