//! A read-only IMAP inspector.
//!
//! It connects to a server over implicit TLS, logs in, lists every mailbox and opens each one
//! with `EXAMINE`. For every mailbox it logs the subjects of the newest few messages, then fetches
//! the newest message in full and logs its headers, `Message-Id` and body length.
//!
//! # Usage
//!
//! ```no_run
//! use imap_inspect::ClientBuilder;
//!
//! # fn main() -> imap_inspect::Result<()> {
//! let mut client = ClientBuilder::new("imap.example.com", 993).native_tls()?;
//! client.login("me@example.com", "password")?;
//!
//! let mut names = client.list("", "*")?;
//! for name in names.by_ref() {
//!     println!("{}", name.name());
//! }
//! names.finish()?;
//!
//! let mailbox = client.examine("INBOX")?;
//! let newest = imap_inspect::workflow::fetch_newest(&mut client, "INBOX", &mailbox)?;
//! println!("{:?} ({} bytes)", newest.message_id(), newest.body_len());
//!
//! client.logout()?;
//! # Ok(())
//! # }
//! ```
//!
//! The `imap-inspect` binary runs the whole inspection; see [`workflow::run`].

mod parse;
mod types;
mod utils;

pub mod client;
mod client_builder;
pub mod config;
pub mod error;
pub mod message;
pub mod workflow;

pub use client::{Client, Responses};
pub use client_builder::ClientBuilder;
pub use error::{Error, Result};
pub use types::*;

#[cfg(test)]
mod mock_stream;
