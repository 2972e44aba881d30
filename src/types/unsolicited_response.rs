use super::Seq;

/// Responses that the server sends that are not related to the current command.
/// [RFC 3501](https://tools.ietf.org/html/rfc3501#section-7) states that clients need to be able
/// to accept any response at any time.
///
/// Note that `Recent`, `Exists` and `Expunge` responses refer to the currently selected folder,
/// so the user must take care when interpreting these.
#[derive(Debug, PartialEq, Eq)]
pub enum UnsolicitedResponse {
    /// An unsolicited `EXISTS` response: the mailbox size changed.
    Exists(u32),

    /// An unsolicited `RECENT` response.
    Recent(u32),

    /// An unsolicited `EXPUNGE` response for the given message sequence number.
    Expunge(Seq),

    /// An unsolicited [`STATUS response`](https://tools.ietf.org/html/rfc3501#section-7.2.4).
    Status {
        /// The mailbox that this status response is for.
        mailbox: String,
        /// The `MESSAGES` attribute, when the server included it.
        messages: Option<u32>,
    },

    /// An untagged `OK`, `NO` or `BAD` carrying human readable text.
    Notice {
        /// `OK`, `NO` or `BAD`.
        status: &'static str,
        /// Information text that may be presented to the user.
        information: Option<String>,
    },

    /// An unsolicited `FETCH` for a message other than the ones asked about.
    Fetch(Seq),
}
