//! Owned views of the IMAP responses this crate consumes.

use std::fmt;

/// From section [2.3.1.2 of RFC 3501](https://tools.ietf.org/html/rfc3501#section-2.3.1.2).
///
/// A relative position from 1 to the number of messages in the mailbox.
/// This position is ordered by ascending unique identifier.  As
/// each new message is added, it is assigned a message sequence number
/// that is 1 higher than the number of messages in the mailbox before
/// that new message was added.
pub type Seq = u32;

/// An inclusive range of message sequence numbers, rendered as `from:to` on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SeqRange {
    /// First message in the range.
    pub from: Seq,
    /// Last message in the range.
    pub to: Seq,
}

impl SeqRange {
    /// A range holding exactly one message.
    pub fn single(seq: Seq) -> Self {
        SeqRange { from: seq, to: seq }
    }

    /// The range `[max(1, exists - back), exists]`, i.e. the newest message plus up to `back`
    /// messages before it. `None` when the mailbox is empty.
    pub fn tail(exists: u32, back: u32) -> Option<Self> {
        if exists == 0 {
            return None;
        }
        Some(SeqRange {
            from: exists.saturating_sub(back).max(1),
            to: exists,
        })
    }

    /// Number of messages covered by the range.
    pub fn len(&self) -> u32 {
        self.to - self.from + 1
    }

    /// Always false: a range covers at least one message.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for SeqRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}:{}", self.from, self.to)
        }
    }
}

mod flag;
pub use self::flag::Flag;

mod mailbox;
pub use self::mailbox::Mailbox;

mod fetch;
pub use self::fetch::{Envelope, Fetch};

mod name;
pub use self::name::{Name, NameAttribute};

mod unsolicited_response;
pub use self::unsolicited_response::UnsolicitedResponse;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_of_empty_mailbox() {
        assert_eq!(SeqRange::tail(0, 3), None);
    }

    #[test]
    fn tail_never_starts_below_one() {
        for exists in 1..=4 {
            let range = SeqRange::tail(exists, 3).unwrap();
            assert_eq!(range.from, 1);
            assert_eq!(range.to, exists);
        }
    }

    #[test]
    fn tail_of_large_mailbox() {
        let range = SeqRange::tail(120, 3).unwrap();
        assert_eq!(range, SeqRange { from: 117, to: 120 });
        assert_eq!(range.len(), 4);
        assert_eq!(range.to_string(), "117:120");
    }

    #[test]
    fn single_renders_without_colon() {
        assert_eq!(SeqRange::single(42).to_string(), "42");
        assert_eq!(SeqRange::single(42).len(), 1);
    }
}
