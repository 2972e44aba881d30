//! The inspection run: log in, walk every mailbox, report on its newest messages, log out.
//!
//! Connection, login and listing failures end the run. Anything that goes wrong inside a single
//! mailbox is logged with the mailbox name and the run moves on to the next one; nothing is
//! retried.

use native_tls::TlsStream;
use std::io::{Read, Write};
use std::net::TcpStream;
use tracing::{debug, error, info, warn};

use crate::client::Client;
use crate::client_builder::ClientBuilder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::message::ParsedMessage;
use crate::types::{Mailbox, Name, SeqRange};
use crate::utils::iter_join;

/// How many messages before the newest one get their envelope fetched.
pub const ENVELOPE_WINDOW: u32 = 3;

/// What happened to one mailbox during a run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MailboxReport {
    pub name: String,
    pub outcome: Outcome,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The server flags the name `\Noselect`.
    NotSelectable,
    /// `EXAMINE` failed; holds the server's explanation.
    OpenFailed(String),
    /// The mailbox holds no messages.
    Empty,
    /// The mailbox was opened and its newest messages looked at.
    Inspected {
        exists: u32,
        subjects: Vec<String>,
        newest: Option<NewestMessage>,
    },
}

/// Summary of the parsed newest message of a mailbox.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewestMessage {
    pub message_id: Option<String>,
    pub body_len: usize,
}

/// Open a TLS connection to the configured server and read its greeting.
pub fn connect(config: &Config) -> Result<Client<TlsStream<TcpStream>>> {
    info!("Connecting to server...");
    let client = ClientBuilder::new(config.host.as_str(), config.port)
        .debug(config.trace)
        .native_tls()?;
    info!(host = %config.host, port = config.port, "Connected");
    Ok(client)
}

/// Log in, inspect every mailbox and log out.
///
/// The session is logged out once, after the mailbox walk, whether or not the walk succeeded.
pub fn run<T: Read + Write>(client: &mut Client<T>, config: &Config) -> Result<Vec<MailboxReport>> {
    client.login(&config.username, &config.password)?;
    info!(user = %config.username, "Logged in");

    let reports = inspect_all(client);

    if let Err(e) = client.logout() {
        warn!(error = %e, "logout failed");
    }
    reports
}

fn inspect_all<T: Read + Write>(client: &mut Client<T>) -> Result<Vec<MailboxReport>> {
    let names = list_mailboxes(client)?;
    let reports = names
        .iter()
        .map(|name| MailboxReport {
            name: name.name().to_string(),
            outcome: inspect_mailbox(client, name),
        })
        .collect();
    Ok(reports)
}

/// List every mailbox, draining the listing before its completion status is looked at.
pub fn list_mailboxes<T: Read + Write>(client: &mut Client<T>) -> Result<Vec<Name>> {
    let mut listing = client.list("", "*")?;

    info!("Mailboxes:");
    let mut names = Vec::new();
    for name in listing.by_ref() {
        info!("* {}", name.name());
        names.push(name);
    }

    listing.finish()?;
    Ok(names)
}

/// Open one mailbox read-only and report on its newest messages.
pub fn inspect_mailbox<T: Read + Write>(client: &mut Client<T>, name: &Name) -> Outcome {
    let mailbox_name = name.name();
    let outcome = inspect_selectable(client, name);

    for response in client.unsolicited_responses.try_iter() {
        debug!(mailbox = mailbox_name, ?response, "unsolicited response");
    }
    outcome
}

fn inspect_selectable<T: Read + Write>(client: &mut Client<T>, name: &Name) -> Outcome {
    let mailbox_name = name.name();
    if !name.is_selectable() {
        info!(mailbox = mailbox_name, "Not selectable, skipping mailbox");
        return Outcome::NotSelectable;
    }

    let mailbox = match client.examine(mailbox_name) {
        Ok(mailbox) => mailbox,
        Err(e) => {
            error!(mailbox = mailbox_name, "ERR: {}", e);
            return Outcome::OpenFailed(e.to_string());
        }
    };
    info!(
        "Opened '{}' for reading [{} messages]",
        mailbox_name, mailbox.exists
    );
    info!(
        "Flags for {}: ({})",
        mailbox_name,
        iter_join(&mailbox.flags, " ")
    );

    let range = match SeqRange::tail(mailbox.exists, ENVELOPE_WINDOW) {
        Some(range) => range,
        None => {
            info!(mailbox = mailbox_name, "No messages, skipping mailbox");
            return Outcome::Empty;
        }
    };

    let subjects = fetch_subjects(client, mailbox_name, range);
    let newest = fetch_newest(client, mailbox_name, &mailbox)
        .ok()
        .map(|message| NewestMessage {
            message_id: message.message_id().map(str::to_string),
            body_len: message.body_len(),
        });

    Outcome::Inspected {
        exists: mailbox.exists,
        subjects,
        newest,
    }
}

/// Fetch and log the envelope subjects of `range`. Failures are logged, never fatal.
fn fetch_subjects<T: Read + Write>(
    client: &mut Client<T>,
    mailbox_name: &str,
    range: SeqRange,
) -> Vec<String> {
    let mut subjects = Vec::new();
    let mut fetches = match client.fetch(range.to_string(), "ENVELOPE") {
        Ok(fetches) => fetches,
        Err(e) => {
            error!(mailbox = mailbox_name, "ERR: {}", e);
            return subjects;
        }
    };

    info!("Last {} messages:", range.len());
    // unilateral FETCH lines (flag changes) carry no envelope
    for envelope in fetches.by_ref().filter_map(|fetch| fetch.envelope) {
        let subject = envelope.subject.unwrap_or_default();
        info!(
            message_id = envelope.message_id.as_deref().unwrap_or_default(),
            "* {}", subject
        );
        subjects.push(subject);
    }

    if let Err(e) = fetches.finish() {
        error!(mailbox = mailbox_name, "ERR: {}", e);
    }
    subjects
}

/// Fetch the newest message of the selected `mailbox` in full and parse it.
///
/// An empty mailbox is an error and costs no round trip. Every error is logged with the mailbox
/// name before it is returned.
pub fn fetch_newest<T: Read + Write>(
    client: &mut Client<T>,
    mailbox_name: &str,
    mailbox: &Mailbox,
) -> Result<ParsedMessage> {
    let result = fetch_and_parse_newest(client, mailbox_name, mailbox);
    match result {
        Ok(ref message) => {
            for (key, value) in message.headers() {
                info!("{}: {}", key, value);
            }
            info!("MESSAGE : {}", message.message_id().unwrap_or_default());
            info!("Message body length {}", message.body_len());
        }
        Err(ref e) => error!(mailbox = mailbox_name, "ERR: {}", e),
    }
    result
}

fn fetch_and_parse_newest<T: Read + Write>(
    client: &mut Client<T>,
    mailbox_name: &str,
    mailbox: &Mailbox,
) -> Result<ParsedMessage> {
    if mailbox.exists == 0 {
        return Err(Error::EmptyMailbox(mailbox_name.to_string()));
    }

    let newest = mailbox.exists;
    let mut fetches = client.fetch(SeqRange::single(newest).to_string(), "BODY.PEEK[]")?;

    info!("Last message:");
    let body = fetches
        .by_ref()
        .filter(|fetch| fetch.message == newest)
        .find_map(|fetch| fetch.body);
    fetches.finish()?;

    let body = body.ok_or(Error::MissingBody)?;
    Ok(ParsedMessage::parse(&body)?)
}
