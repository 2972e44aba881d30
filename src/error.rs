use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;
use std::net::TcpStream;
use std::result;

use mailparse::MailParseError;
use native_tls::Error as TlsError;
use native_tls::HandshakeError as TlsHandshakeError;

pub type Result<T> = result::Result<T, Error>;

/// A set of errors that can occur while talking to the IMAP server or inspecting a mailbox.
#[derive(Debug)]
pub enum Error {
    /// An `io::Error` that occurred while trying to read or write to a network stream.
    Io(IoError),
    /// An error from the `native_tls` library during the TLS handshake.
    TlsHandshake(TlsHandshakeError<TcpStream>),
    /// An error from the `native_tls` library while managing the socket.
    Tls(TlsError),
    /// A BAD response from the IMAP server.
    Bad(String),
    /// A NO response from the IMAP server.
    No(String),
    /// The server said BYE while a command was in flight.
    Bye(String),
    /// The connection was terminated unexpectedly.
    ConnectionLost,
    /// Error parsing a server response.
    Parse(ParseError),
    /// Error validating input data.
    Validate(ValidateError),
    /// The selected mailbox holds no messages, so there is nothing to fetch.
    EmptyMailbox(String),
    /// The server answered a body fetch without any body section.
    MissingBody,
    /// The fetched bytes are not a parseable RFC 5322 message.
    Mail(MailParseError),
}

impl From<IoError> for Error {
    fn from(err: IoError) -> Error {
        Error::Io(err)
    }
}

impl From<TlsHandshakeError<TcpStream>> for Error {
    fn from(err: TlsHandshakeError<TcpStream>) -> Error {
        Error::TlsHandshake(err)
    }
}

impl From<TlsError> for Error {
    fn from(err: TlsError) -> Error {
        Error::Tls(err)
    }
}

impl From<MailParseError> for Error {
    fn from(err: MailParseError) -> Error {
        Error::Mail(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::Io(ref e) => fmt::Display::fmt(e, f),
            Error::Tls(ref e) => fmt::Display::fmt(e, f),
            Error::TlsHandshake(ref e) => fmt::Display::fmt(e, f),
            Error::Validate(ref e) => fmt::Display::fmt(e, f),
            Error::Parse(ref e) => fmt::Display::fmt(e, f),
            Error::Mail(ref e) => fmt::Display::fmt(e, f),
            Error::Bad(ref data) => write!(f, "Bad Response: {}", data),
            Error::No(ref data) => write!(f, "No Response: {}", data),
            Error::Bye(ref data) => write!(f, "Server closed the session: {}", data),
            Error::ConnectionLost => f.write_str("Connection lost"),
            Error::EmptyMailbox(ref name) => write!(f, "no messages in mailbox {}", name),
            Error::MissingBody => f.write_str("server didn't return message body"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            Error::Tls(ref e) => Some(e),
            Error::TlsHandshake(ref e) => Some(e),
            Error::Mail(ref e) => Some(e),
            Error::Parse(ref e) => Some(e),
            Error::Validate(ref e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ParseError {
    /// A response the parser could not make sense of, kept verbatim.
    Invalid(Vec<u8>),
    /// A tagged completion arrived for a command we did not send.
    UnexpectedTag(String),
    /// A response that is well-formed but not expected for the running command.
    Unexpected(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ParseError::Invalid(ref data) => write!(
                f,
                "Unable to parse response: {:?}",
                String::from_utf8_lossy(data)
            ),
            ParseError::UnexpectedTag(ref tag) => {
                write!(f, "Completion for unknown command tag {}", tag)
            }
            ParseError::Unexpected(ref what) => write!(f, "Unexpected response: {}", what),
        }
    }
}

impl StdError for ParseError {}

// Invalid character found. Expand as needed
#[derive(Debug)]
pub struct ValidateError(pub char);

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // print character in debug form because invalid ones are often whitespaces
        write!(f, "Invalid character in input: {:?}", self.0)
    }
}

impl StdError for ValidateError {}
