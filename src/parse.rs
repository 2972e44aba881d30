use imap_proto::{AttributeValue, MailboxDatum, Response, ResponseCode, Status, StatusAttribute};
use std::borrow::Cow;
use std::sync::mpsc;

use super::error::{Error, ParseError, Result};
use super::message::decode_subject;
use super::types::*;

/// The outcome of offering one response to a command-specific mapper: either it is one of the
/// items the command asked for, or it is handed back to be treated as unilateral.
pub(crate) enum MapOrNot<'a, T> {
    Map(T),
    Not(Response<'a>),
}

/// Maps a `LIST` response onto an owned [`Name`].
pub(crate) fn parse_name(resp: Response<'_>) -> MapOrNot<'_, Name> {
    match resp {
        Response::MailboxData(MailboxDatum::List {
            name_attributes,
            delimiter,
            name,
        }) => MapOrNot::Map(Name {
            attributes: name_attributes
                .into_iter()
                .map(NameAttribute::from)
                .collect(),
            delimiter: delimiter.map(Cow::into_owned),
            name: name.into_owned(),
        }),
        resp => MapOrNot::Not(resp),
    }
}

/// Maps a `FETCH` response onto an owned [`Fetch`], keeping the envelope and body section.
pub(crate) fn parse_fetch(resp: Response<'_>) -> MapOrNot<'_, Fetch> {
    match resp {
        Response::Fetch(num, attrs) => {
            let mut fetch = Fetch {
                message: num,
                ..Fetch::default()
            };

            for attr in attrs {
                match attr {
                    AttributeValue::Envelope(envelope) => {
                        fetch.envelope = Some(Envelope {
                            subject: envelope.subject.as_deref().map(decode_subject),
                            message_id: envelope
                                .message_id
                                .as_deref()
                                .map(|id| String::from_utf8_lossy(id).into_owned()),
                        });
                    }
                    AttributeValue::BodySection {
                        data: Some(data), ..
                    } if !data.is_empty() => {
                        fetch.body = Some(data.into_owned());
                    }
                    AttributeValue::Rfc822(Some(data)) if !data.is_empty() => {
                        fetch.body = Some(data.into_owned());
                    }
                    _ => {}
                }
            }

            MapOrNot::Map(fetch)
        }
        resp => MapOrNot::Not(resp),
    }
}

/// Parses the untagged lines of a `SELECT` or `EXAMINE` into a [`Mailbox`].
pub(crate) fn parse_mailbox(
    mut lines: &[u8],
    unsolicited: &mut mpsc::Sender<UnsolicitedResponse>,
) -> Result<Mailbox> {
    let mut mailbox = Mailbox::default();

    while !lines.is_empty() {
        match imap_proto::parser::parse_response(lines) {
            Ok((
                rest,
                Response::Data {
                    status: Status::Ok,
                    code: Some(code),
                    ..
                },
            )) => {
                lines = rest;

                match code {
                    ResponseCode::UidValidity(uid) => {
                        mailbox.uid_validity = Some(uid);
                    }
                    ResponseCode::UidNext(unext) => {
                        mailbox.uid_next = Some(unext);
                    }
                    ResponseCode::Unseen(n) => {
                        mailbox.unseen = Some(n);
                    }
                    ResponseCode::PermanentFlags(flags) => {
                        mailbox
                            .permanent_flags
                            .extend(flags.into_iter().map(|f| Flag::from(&*f)));
                    }
                    _ => {}
                }
            }
            Ok((rest, Response::MailboxData(MailboxDatum::Exists(e)))) => {
                lines = rest;
                mailbox.exists = e;
            }
            Ok((rest, Response::MailboxData(MailboxDatum::Recent(r)))) => {
                lines = rest;
                mailbox.recent = r;
            }
            Ok((rest, Response::MailboxData(MailboxDatum::Flags(flags)))) => {
                lines = rest;
                mailbox
                    .flags
                    .extend(flags.into_iter().map(|f| Flag::from(&*f)));
            }
            Ok((rest, resp)) => {
                lines = rest;
                if let Some(resp) = handle_unilateral(resp, unsolicited) {
                    return Err(unexpected(&resp));
                }
            }
            Err(_) => {
                return Err(Error::Parse(ParseError::Invalid(lines.to_vec())));
            }
        }
    }

    Ok(mailbox)
}

pub(crate) fn unexpected(resp: &Response<'_>) -> Error {
    Error::Parse(ParseError::Unexpected(format!("{:?}", resp)))
}

// check if this is simply a unilateral server response
// (see Section 7 of RFC 3501):
pub(crate) fn handle_unilateral<'a>(
    res: Response<'a>,
    unsolicited: &mut mpsc::Sender<UnsolicitedResponse>,
) -> Option<Response<'a>> {
    let response = match res {
        Response::MailboxData(MailboxDatum::Status { mailbox, status }) => {
            UnsolicitedResponse::Status {
                mailbox: mailbox.into_owned(),
                messages: status.iter().find_map(|attr| match attr {
                    StatusAttribute::Messages(n) => Some(*n),
                    _ => None,
                }),
            }
        }
        Response::MailboxData(MailboxDatum::Recent(n)) => UnsolicitedResponse::Recent(n),
        Response::MailboxData(MailboxDatum::Exists(n)) => UnsolicitedResponse::Exists(n),
        Response::Expunge(n) => UnsolicitedResponse::Expunge(n),
        Response::Fetch(n, _) => UnsolicitedResponse::Fetch(n),
        Response::Data {
            status,
            information,
            ..
        } if !matches!(status, Status::Bye | Status::PreAuth) => UnsolicitedResponse::Notice {
            status: match status {
                Status::No => "NO",
                Status::Bad => "BAD",
                _ => "OK",
            },
            information: information.map(Cow::into_owned),
        },
        res => return Some(res),
    };

    // nobody listening is fine, these are informational
    let _ = unsolicited.send(response);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(line: &[u8]) -> Response<'_> {
        imap_proto::parser::parse_response(line).unwrap().1
    }

    #[test]
    fn parse_name_test() {
        let line = b"* LIST (\\HasNoChildren) \".\" \"INBOX\"\r\n";
        let name = match parse_name(one(line)) {
            MapOrNot::Map(name) => name,
            MapOrNot::Not(resp) => panic!("not a name: {:?}", resp),
        };
        assert_eq!(name.name(), "INBOX");
        assert_eq!(name.delimiter(), Some("."));
        assert!(name.is_selectable());
    }

    #[test]
    fn parse_name_noselect() {
        let line = b"* LIST (\\Noselect \\HasChildren) \"/\" \"[Gmail]\"\r\n";
        let name = match parse_name(one(line)) {
            MapOrNot::Map(name) => name,
            MapOrNot::Not(resp) => panic!("not a name: {:?}", resp),
        };
        assert_eq!(name.name(), "[Gmail]");
        assert_eq!(name.attributes()[0], NameAttribute::NoSelect);
        assert!(!name.is_selectable());
    }

    #[test]
    fn parse_fetch_envelope() {
        let line = b"* 3 FETCH (ENVELOPE (\"Mon, 7 Feb 1994 21:52:25 -0800\" \
            \"=?utf-8?Q?caf=C3=A9?=\" NIL NIL NIL NIL NIL NIL NIL \"<abc@example.org>\"))\r\n";
        let fetch = match parse_fetch(one(line)) {
            MapOrNot::Map(fetch) => fetch,
            MapOrNot::Not(resp) => panic!("not a fetch: {:?}", resp),
        };
        assert_eq!(fetch.message, 3);
        let envelope = fetch.envelope().unwrap();
        assert_eq!(envelope.subject.as_deref(), Some("café"));
        assert_eq!(envelope.message_id.as_deref(), Some("<abc@example.org>"));
        assert_eq!(fetch.body(), None);
    }

    #[test]
    fn parse_fetch_body() {
        let line = b"* 2 FETCH (BODY[] {3}\r\nfoo)\r\n";
        let fetch = match parse_fetch(one(line)) {
            MapOrNot::Map(fetch) => fetch,
            MapOrNot::Not(resp) => panic!("not a fetch: {:?}", resp),
        };
        assert_eq!(fetch.message, 2);
        assert_eq!(fetch.body(), Some(&b"foo"[..]));
    }

    #[test]
    fn parse_fetch_empty_body_is_none() {
        let line = b"* 2 FETCH (BODY[] NIL)\r\n";
        let fetch = match parse_fetch(one(line)) {
            MapOrNot::Map(fetch) => fetch,
            MapOrNot::Not(resp) => panic!("not a fetch: {:?}", resp),
        };
        assert_eq!(fetch.body(), None);
    }

    #[test]
    fn parse_mailbox_test() {
        let lines = b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n\
            * OK [PERMANENTFLAGS ()] Read-only mailbox.\r\n\
            * 17 EXISTS\r\n\
            * 2 RECENT\r\n\
            * OK [UNSEEN 8] First unseen.\r\n\
            * OK [UIDVALIDITY 1257842737] UIDs valid\r\n\
            * OK [UIDNEXT 4392] Predicted next UID\r\n";
        let (mut send, recv) = mpsc::channel();
        let mailbox = parse_mailbox(lines, &mut send).unwrap();
        assert!(recv.try_recv().is_err());
        assert_eq!(
            mailbox,
            Mailbox {
                flags: vec![
                    Flag::Answered,
                    Flag::Flagged,
                    Flag::Deleted,
                    Flag::Seen,
                    Flag::Draft
                ],
                exists: 17,
                recent: 2,
                unseen: Some(8),
                permanent_flags: vec![],
                uid_next: Some(4392),
                uid_validity: Some(1257842737),
            }
        );
    }

    #[test]
    fn parse_mailbox_w_unilateral() {
        let lines = b"* 4 EXISTS\r\n\
            * 2 EXPUNGE\r\n\
            * STATUS Archive (MESSAGES 10 UIDNEXT 11)\r\n";
        let (mut send, recv) = mpsc::channel();
        let mailbox = parse_mailbox(lines, &mut send).unwrap();
        assert_eq!(mailbox.exists, 4);
        assert_eq!(recv.try_recv().unwrap(), UnsolicitedResponse::Expunge(2));
        assert_eq!(
            recv.try_recv().unwrap(),
            UnsolicitedResponse::Status {
                mailbox: "Archive".to_string(),
                messages: Some(10),
            }
        );
    }

    #[test]
    fn parse_mailbox_invalid() {
        let (mut send, _recv) = mpsc::channel();
        match parse_mailbox(b"* JUNK\r\n", &mut send) {
            Err(Error::Parse(ParseError::Invalid(_))) => {}
            other => panic!("expected invalid response, got {:?}", other),
        }
    }

    #[test]
    fn bye_is_not_unilateral() {
        let (mut send, recv) = mpsc::channel();
        let resp = one(b"* BYE Autologout; idle for too long\r\n");
        assert!(handle_unilateral(resp, &mut send).is_some());
        assert!(recv.try_recv().is_err());
    }

    #[test]
    fn untagged_no_is_a_notice() {
        let (mut send, recv) = mpsc::channel();
        let resp = one(b"* NO Disk is 98% full, please delete unnecessary data\r\n");
        assert!(handle_unilateral(resp, &mut send).is_none());
        assert_eq!(
            recv.try_recv().unwrap(),
            UnsolicitedResponse::Notice {
                status: "NO",
                information: Some("Disk is 98% full, please delete unnecessary data".to_string()),
            }
        );
    }
}
