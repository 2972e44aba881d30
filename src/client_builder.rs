use crate::{Client, Result};
use native_tls::{TlsConnector, TlsStream};
use std::io::{Read, Write};
use std::net::TcpStream;

/// A convenience builder for [`Client`] structs over an implicit-TLS transport.
///
/// Creating a [`Client`] using `native-tls` transport is straightforward:
/// ```no_run
/// # use imap_inspect::ClientBuilder;
/// # fn main() -> Result<(), imap_inspect::Error> {
/// let client = ClientBuilder::new("imap.example.com", 993).native_tls()?;
/// # Ok(())
/// # }
/// ```
///
/// The returned client has already consumed the server greeting and is ready for `LOGIN`.
pub struct ClientBuilder<D>
where
    D: AsRef<str>,
{
    domain: D,
    port: u16,
    debug: bool,
}

impl<D> ClientBuilder<D>
where
    D: AsRef<str>,
{
    /// Make a new `ClientBuilder` using the given domain and port.
    pub fn new(domain: D, port: u16) -> Self {
        ClientBuilder {
            domain,
            port,
            debug: false,
        }
    }

    /// Trace the protocol exchange of the resulting client, see [`Client::debug`].
    pub fn debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Return a new [`Client`] using a `native-tls` transport.
    pub fn native_tls(&mut self) -> Result<Client<TlsStream<TcpStream>>> {
        self.connect(|domain, tcp| {
            let ssl_conn = TlsConnector::builder().build()?;
            Ok(TlsConnector::connect(&ssl_conn, domain, tcp)?)
        })
    }

    /// Make a [`Client`] using a custom TLS initialization, for setups that need private CAs or
    /// other specific TLS parameters.
    ///
    /// The `handshake` argument receives the domain and the connected [`TcpStream`] and should
    /// only perform TLS initialization over that socket, yielding the encrypted stream.
    pub fn connect<F, C>(&mut self, handshake: F) -> Result<Client<C>>
    where
        F: FnOnce(&str, TcpStream) -> Result<C>,
        C: Read + Write,
    {
        let tcp = TcpStream::connect((self.domain.as_ref(), self.port))?;
        let tls = handshake(self.domain.as_ref(), tcp)?;

        let mut client = Client::new(tls);
        client.debug = self.debug;
        client.read_greeting()?;
        Ok(client)
    }
}
