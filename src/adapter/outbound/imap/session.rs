//! Blocking IMAP client driven from async code.
//!
//! The `imap` crate is synchronous, so every command runs on the blocking
//! pool. The socket carries read/write timeouts and each command is also
//! bounded by [`tokio::time::timeout`]. One command holds the session lock
//! at a time.

use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use native_tls::{TlsConnector, TlsStream};
use parking_lot::Mutex;
use tracing::debug;

use super::settings::MailboxConfig;
use crate::domain::{MessageId, SearchQuery};
use crate::error::{ConfigError, Error, Result};
use crate::port::{MailConnector, MailSession};

type ImapSessionInner = imap::Session<TlsStream<TcpStream>>;

/// Connect, greeting, login and select each get one timeout.
const CONNECT_STEPS: u32 = 4;

/// Opens IMAP sessions over implicit TLS.
pub struct ImapConnector {
    config: Arc<MailboxConfig>,
    password: Arc<str>,
}

impl ImapConnector {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if no password was loaded.
    pub fn new(config: MailboxConfig) -> Result<Self> {
        let password = config
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::MissingField {
                field: "MAILSIGNAL_MAIL_PASSWORD",
            })?;
        Ok(Self {
            config: Arc::new(config),
            password: password.into(),
        })
    }
}

#[async_trait]
impl MailConnector for ImapConnector {
    type Session = ImapSession;

    async fn connect(&self) -> Result<ImapSession> {
        let config = Arc::clone(&self.config);
        let password = Arc::clone(&self.password);
        let timeout = self.config.timeout();
        let connect_timeout = connect_timeout(timeout);

        let task = tokio::task::spawn_blocking(move || open_session(&config, &password));
        let inner = match tokio::time::timeout(connect_timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join)) => return Err(Error::Mail(format!("IMAP worker failed: {join}"))),
            Err(_) => {
                return Err(Error::Timeout {
                    operation: "connect",
                    secs: connect_timeout.as_secs(),
                })
            }
        };

        debug!(host = %self.config.host, folder = %self.config.folder, "IMAP session open");
        Ok(ImapSession {
            inner: Arc::new(Mutex::new(Some(inner))),
            timeout,
        })
    }

    fn host(&self) -> &str {
        &self.config.host
    }
}

/// Budget for the whole connect sequence, saturating instead of overflowing.
fn connect_timeout(command_timeout: Duration) -> Duration {
    command_timeout
        .checked_mul(CONNECT_STEPS)
        .unwrap_or(Duration::MAX)
}

fn open_session(config: &MailboxConfig, password: &str) -> Result<ImapSessionInner> {
    let timeout = config.timeout();
    let addr = (config.host.as_str(), config.port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| Error::Mail(format!("cannot resolve {}", config.host)))?;

    let tcp = TcpStream::connect_timeout(&addr, timeout)?;
    tcp.set_read_timeout(Some(timeout))?;
    tcp.set_write_timeout(Some(timeout))?;

    let tls = TlsConnector::builder().build()?;
    let stream = tls
        .connect(&config.host, tcp)
        .map_err(|e| Error::Mail(format!("TLS handshake failed: {e}")))?;

    let mut client = imap::Client::new(stream);
    client.read_greeting()?;

    let mut session = client
        .login(&config.account, password)
        .map_err(|(e, _)| Error::Mail(format!("login failed: {e}")))?;
    session.select(&config.folder)?;
    Ok(session)
}

/// An authenticated IMAP session with the folder selected.
pub struct ImapSession {
    inner: Arc<Mutex<Option<ImapSessionInner>>>,
    timeout: Duration,
}

impl ImapSession {
    /// Run one IMAP command on the blocking pool under the command timeout.
    async fn blocking<T, F>(&self, operation: &'static str, command: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ImapSessionInner) -> imap::error::Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || {
            let mut guard = inner.lock();
            let session = guard
                .as_mut()
                .ok_or_else(|| Error::Mail("session closed".to_string()))?;
            command(session).map_err(Error::from)
        });

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(Error::Mail(format!("IMAP worker failed: {join}"))),
            Err(_) => Err(Error::Timeout {
                operation,
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl MailSession for ImapSession {
    async fn probe(&mut self) -> Result<()> {
        self.blocking("noop", |session| session.noop()).await
    }

    async fn search(&mut self, query: &SearchQuery) -> Result<Vec<MessageId>> {
        let criteria = query.to_imap();
        debug!(criteria = %criteria, "IMAP search");
        let uids = self
            .blocking("search", move |session| session.uid_search(&criteria))
            .await?;

        let mut ids: Vec<MessageId> = uids.into_iter().map(MessageId::new).collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn fetch_body(&mut self, id: MessageId) -> Result<Vec<u8>> {
        let body = self
            .blocking("fetch", move |session| {
                let fetches = session.uid_fetch(id.to_string(), "BODY.PEEK[]")?;
                Ok(fetches.iter().find_map(|f| f.body().map(<[u8]>::to_vec)))
            })
            .await?;
        body.ok_or_else(|| Error::Mail(format!("message {id} has no body")))
    }

    async fn flag_seen(&mut self, id: MessageId) -> Result<()> {
        self.blocking("store", move |session| {
            session.uid_store(id.to_string(), "+FLAGS (\\Seen)")?;
            Ok(())
        })
        .await
    }

    async fn flag_delivered(&mut self, id: MessageId) -> Result<()> {
        self.blocking("store", move |session| {
            session.uid_store(id.to_string(), "+FLAGS (\\Seen \\Flagged)")?;
            Ok(())
        })
        .await
    }

    async fn close(&mut self) {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || {
            let taken = inner.lock().take();
            if let Some(mut session) = taken {
                let _ = session.close();
                let _ = session.logout();
            }
        });
        if tokio::time::timeout(self.timeout, task).await.is_err() {
            debug!("IMAP logout timed out");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> MailboxConfig {
        MailboxConfig {
            host: "127.0.0.1".to_string(),
            port,
            account: "bot@example.com".to_string(),
            folder: "INBOX".to_string(),
            sender: "noreply@tradingview.com".to_string(),
            timeout_secs: 2,
            password: Some("app-password".to_string()),
        }
    }

    #[test]
    fn missing_password_is_a_config_error() {
        let mut config = config(993);
        config.password = None;
        let result = ImapConnector::new(config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingField {
                field: "MAILSIGNAL_MAIL_PASSWORD"
            }))
        ));
    }

    #[test]
    fn connect_budget_covers_every_step() {
        assert_eq!(connect_timeout(Duration::from_secs(5)), Duration::from_secs(20));
    }

    #[test]
    fn connect_budget_saturates_on_huge_timeouts() {
        assert_eq!(connect_timeout(Duration::from_secs(u64::MAX)), Duration::MAX);
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let connector = ImapConnector::new(config(port)).unwrap();

        let result = connector.connect().await;
        assert!(result.is_err());
        assert_eq!(connector.host(), "127.0.0.1");
    }
}
