use super::Flag;

/// Meta-information about an IMAP mailbox, as returned by
/// [`EXAMINE`](https://tools.ietf.org/html/rfc3501#section-6.3.2).
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Mailbox {
    /// Defined flags in the mailbox.  See the description of the [FLAGS
    /// response](https://tools.ietf.org/html/rfc3501#section-7.2.6) for more detail.
    pub flags: Vec<Flag>,

    /// The number of messages in the mailbox.
    pub exists: u32,

    /// The number of messages with the \Recent flag set.
    pub recent: u32,

    /// Message sequence number of the first unseen message in the mailbox.
    pub unseen: Option<u32>,

    /// A list of message flags that the client can change permanently.
    pub permanent_flags: Vec<Flag>,

    /// The next unique identifier value.
    pub uid_next: Option<u32>,

    /// The unique identifier validity value.
    pub uid_validity: Option<u32>,
}
