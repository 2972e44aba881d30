use bufstream::BufStream;
use imap_proto::{Response, Status};
use std::borrow::Cow;
use std::io::{Read, Write};
use std::sync::mpsc;

use super::error::{Error, ParseError, Result, ValidateError};
use super::parse::{handle_unilateral, parse_fetch, parse_mailbox, parse_name, MapOrNot};
use super::types::*;

static TAG_PREFIX: &str = "a";
const INITIAL_TAG: u32 = 0;
const CR: u8 = 0x0d;
const LF: u8 = 0x0a;

macro_rules! quote {
    ($x:expr) => {
        format!("\"{}\"", $x.replace(r"\", r"\\").replace("\"", "\\\""))
    };
}

pub(crate) fn validate_str(value: &str) -> Result<String> {
    let quoted = quote!(value);
    if quoted.contains('\n') {
        return Err(Error::Validate(ValidateError('\n')));
    }
    if quoted.contains('\r') {
        return Err(Error::Validate(ValidateError('\r')));
    }
    Ok(quoted)
}

/// Stream to interface with the IMAP server. This interface is only for the command stream.
///
/// Commands are issued one at a time; each is tagged `a1`, `a2`, ... and the client reads until
/// the matching tagged completion before the next command can be sent.
#[derive(Debug)]
pub struct Client<T: Read + Write> {
    stream: BufStream<T>,
    tag: u32,
    /// Log every line sent and received at `trace` level.
    pub debug: bool,
    unsolicited_responses_tx: mpsc::Sender<UnsolicitedResponse>,
    /// Server responses that are not related to the command that was running when they arrived.
    pub unsolicited_responses: mpsc::Receiver<UnsolicitedResponse>,
}

/// The items of a streaming command (`LIST`, `FETCH`), parsed as they come off the wire.
///
/// The command's tagged completion is only known once every item has been read, so callers
/// iterate first and then call [`Responses::finish`] to learn whether the command succeeded.
/// I/O and parse failures also end the iteration and surface through `finish`.
///
/// Dropping a stream that has not been drained reads the remaining responses so that the next
/// command starts on a clean line.
pub struct Responses<'c, T: Read + Write, I> {
    client: &'c mut Client<T>,
    tag: String,
    map: fn(Response<'_>) -> MapOrNot<'_, I>,
    status: Option<Result<()>>,
    invalid: Option<Error>,
}

impl<'c, T: Read + Write, I> Responses<'c, T, I> {
    fn new(client: &'c mut Client<T>, map: fn(Response<'_>) -> MapOrNot<'_, I>) -> Self {
        let tag = format!("{}{}", TAG_PREFIX, client.tag);
        Responses {
            client,
            tag,
            map,
            status: None,
            invalid: None,
        }
    }

    /// Drain whatever items are left and return the command's completion status.
    pub fn finish(mut self) -> Result<()> {
        for _ in self.by_ref() {}
        self.status.replace(Ok(())).unwrap_or(Ok(()))
    }
}

impl<'c, T: Read + Write, I> Iterator for Responses<'c, T, I> {
    type Item = I;

    fn next(&mut self) -> Option<I> {
        while self.status.is_none() {
            let mut buf = Vec::new();
            if let Err(e) = self.client.read_one(&mut buf) {
                self.status = Some(Err(e));
                break;
            }

            match imap_proto::parser::parse_response(&buf) {
                Ok((
                    _,
                    Response::Done {
                        tag,
                        status,
                        information,
                        ..
                    },
                )) => {
                    self.status = Some(if tag.0 == self.tag {
                        completion(status, information, self.invalid.take())
                    } else {
                        Err(Error::Parse(ParseError::UnexpectedTag(tag.0)))
                    });
                }
                Ok((_, resp)) => match (self.map)(resp) {
                    MapOrNot::Map(item) => return Some(item),
                    MapOrNot::Not(resp) => {
                        match handle_unilateral(resp, &mut self.client.unsolicited_responses_tx) {
                            Some(Response::Data {
                                status: Status::Bye,
                                information,
                                ..
                            }) => {
                                self.status = Some(Err(Error::Bye(explanation(information))));
                            }
                            Some(resp) => {
                                tracing::debug!(tag = %self.tag, response = ?resp, "ignoring unexpected response");
                            }
                            None => {}
                        }
                    }
                },
                Err(_) => {
                    // keep reading up to our completion so the next command starts in sync
                    self.invalid
                        .get_or_insert_with(|| Error::Parse(ParseError::Invalid(buf.clone())));
                }
            }
        }
        None
    }
}

impl<'c, T: Read + Write, I> Drop for Responses<'c, T, I> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

fn explanation(information: Option<Cow<'_, str>>) -> String {
    information
        .map(Cow::into_owned)
        .unwrap_or_else(|| "no explanation given".to_string())
}

fn status_result(status: Status, information: Option<Cow<'_, str>>) -> Result<()> {
    match status {
        Status::Ok => Ok(()),
        Status::No => Err(Error::No(explanation(information))),
        Status::Bad => Err(Error::Bad(explanation(information))),
        Status::Bye => Err(Error::Bye(explanation(information))),
        _ => Err(Error::Parse(ParseError::Unexpected(explanation(information)))),
    }
}

/// A failed completion wins over an unparseable line seen earlier in the same response.
fn completion(
    status: Status,
    information: Option<Cow<'_, str>>,
    invalid: Option<Error>,
) -> Result<()> {
    status_result(status, information).and_then(|()| invalid.map_or(Ok(()), Err))
}

impl<T: Read + Write> Client<T> {
    /// Creates a new client with the underlying stream.
    ///
    /// The server greeting is not read here; see [`Client::read_greeting`].
    pub fn new(stream: T) -> Client<T> {
        let (tx, rx) = mpsc::channel();
        Client {
            stream: BufStream::new(stream),
            tag: INITIAL_TAG,
            debug: false,
            unsolicited_responses_tx: tx,
            unsolicited_responses: rx,
        }
    }

    /// Read the untagged line the server sends when a connection opens.
    ///
    /// A `BYE` greeting means the server refuses the connection.
    pub fn read_greeting(&mut self) -> Result<()> {
        let mut v = Vec::new();
        self.read_one(&mut v)?;
        match imap_proto::parser::parse_response(&v) {
            Ok((
                _,
                Response::Data {
                    status: Status::Bye,
                    information,
                    ..
                },
            )) => Err(Error::Bye(explanation(information))),
            _ => Ok(()),
        }
    }

    /// Log in to the IMAP server.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.run_command_and_check_ok(&format!(
            "LOGIN {} {}",
            validate_str(username)?,
            validate_str(password)?
        ))
    }

    /// Open a mailbox read-only, as described in
    /// [RFC 3501 section 6.3.2](https://tools.ietf.org/html/rfc3501#section-6.3.2).
    pub fn examine(&mut self, mailbox_name: &str) -> Result<Mailbox> {
        let lines = self
            .run_command_and_read_response(&format!("EXAMINE {}", validate_str(mailbox_name)?))?;
        parse_mailbox(&lines, &mut self.unsolicited_responses_tx)
    }

    /// The LIST command returns a subset of names from the complete set
    /// of all names available to the client.
    pub fn list(
        &mut self,
        reference_name: &str,
        mailbox_search_pattern: &str,
    ) -> Result<Responses<'_, T, Name>> {
        self.run_command(&format!(
            "LIST {} {}",
            quote!(reference_name),
            mailbox_search_pattern
        ))?;
        Ok(Responses::new(self, parse_name))
    }

    /// Fetch retrieves data associated with a set of messages in the selected mailbox.
    pub fn fetch<S: AsRef<str>>(
        &mut self,
        sequence_set: S,
        query: &str,
    ) -> Result<Responses<'_, T, Fetch>> {
        self.run_command(&format!("FETCH {} {}", sequence_set.as_ref(), query))?;
        Ok(Responses::new(self, parse_fetch))
    }

    /// Noop always succeeds, and it does nothing.
    pub fn noop(&mut self) -> Result<()> {
        self.run_command_and_check_ok("NOOP")
    }

    /// Logout informs the server that the client is done with the connection.
    pub fn logout(&mut self) -> Result<()> {
        self.run_command_and_check_ok("LOGOUT")
    }

    /// Runs a command and checks if it returns OK.
    pub fn run_command_and_check_ok(&mut self, command: &str) -> Result<()> {
        self.run_command_and_read_response(command).map(|_| ())
    }

    /// Runs any command passed to it.
    pub fn run_command(&mut self, untagged_command: &str) -> Result<()> {
        let command = self.create_command(untagged_command);
        self.write_line(command.as_bytes())?;
        if self.debug {
            let shown = if untagged_command.starts_with("LOGIN ") {
                "LOGIN <redacted>"
            } else {
                untagged_command
            };
            tracing::trace!("C: {}{} {}", TAG_PREFIX, self.tag, shown);
        }
        Ok(())
    }

    /// Runs a command and returns the untagged lines the server sent before completing it.
    pub fn run_command_and_read_response(&mut self, untagged_command: &str) -> Result<Vec<u8>> {
        self.run_command(untagged_command)?;
        self.read_response()
    }

    fn read_response(&mut self) -> Result<Vec<u8>> {
        let mut v = Vec::new();
        self.read_response_onto(&mut v)?;
        Ok(v)
    }

    fn read_response_onto(&mut self, data: &mut Vec<u8>) -> Result<()> {
        let mut continue_from = None;
        let mut invalid = None;
        let mut try_first = !data.is_empty();
        let match_tag = format!("{}{}", TAG_PREFIX, self.tag);
        loop {
            let line_start = if try_first {
                try_first = false;
                0
            } else {
                let start_new = data.len();
                self.readline(data)?;
                continue_from.take().unwrap_or(start_new)
            };

            let break_with = {
                let line = &data[line_start..];

                match imap_proto::parser::parse_response(line) {
                    Ok((
                        _,
                        Response::Done {
                            tag,
                            status,
                            information,
                            ..
                        },
                    )) => {
                        if tag.0 != match_tag {
                            Some(Err(Error::Parse(ParseError::UnexpectedTag(tag.0))))
                        } else {
                            Some(completion(status, information, invalid.take()))
                        }
                    }
                    Ok(..) => None,
                    Err(nom::Err::Incomplete(..)) => {
                        continue_from = Some(line_start);
                        None
                    }
                    Err(_) => {
                        invalid.get_or_insert_with(|| {
                            Error::Parse(ParseError::Invalid(line.to_vec()))
                        });
                        None
                    }
                }
            };

            match break_with {
                Some(Ok(())) => {
                    data.truncate(line_start);
                    break Ok(());
                }
                Some(Err(e)) => break Err(e),
                None => {}
            }
        }
    }

    /// Read lines until they form one complete response; literals span several lines.
    fn read_one(&mut self, into: &mut Vec<u8>) -> Result<()> {
        loop {
            self.readline(into)?;
            if let Err(nom::Err::Incomplete(..)) = imap_proto::parser::parse_response(into) {
                continue;
            }
            return Ok(());
        }
    }

    fn readline(&mut self, into: &mut Vec<u8>) -> Result<usize> {
        use std::io::BufRead;
        let read = self.stream.read_until(LF, into)?;
        if read == 0 {
            return Err(Error::ConnectionLost);
        }

        if self.debug {
            let line = &into[into.len() - read..];
            tracing::trace!("S: {}", String::from_utf8_lossy(line).trim_end());
        }

        Ok(read)
    }

    fn create_command(&mut self, command: &str) -> String {
        self.tag += 1;
        format!("{}{} {}", TAG_PREFIX, self.tag, command)
    }

    fn write_line(&mut self, buf: &[u8]) -> Result<()> {
        self.stream.write_all(buf)?;
        self.stream.write_all(&[CR, LF])?;
        self.stream.flush()?;
        Ok(())
    }
}

#[cfg(test)]
impl Client<super::mock_stream::MockStream> {
    pub(crate) fn written(&self) -> &[u8] {
        &self.stream.get_ref().written_buf
    }
}
