//! Connector trait — the abstraction over the IRC client.
//!
//! Opening a connection never blocks on the network: the connector hands
//! back a `Connection` right away and does the handshake in the background.
//! Every connection owns its own event channel, so events from two models
//! can never interleave on the same receiver. The channel is unbounded: the
//! reader hands events off without waiting on whoever forwards them.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::event::ConnectionEvent;

/// Validated settings for one IRC connection.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: Option<u16>,
    pub use_tls: bool,
    pub nick: String,
    pub password: Option<String>,
    pub channel: String,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("nick", &self.nick)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("channel", &self.channel)
            .finish()
    }
}

/// Asks a running connection to quit.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: oneshot::Sender<String>,
}

impl ShutdownHandle {
    /// Create a handle and the receiver the connection task listens on.
    pub fn new() -> (Self, oneshot::Receiver<String>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Request shutdown with the given QUIT message.
    ///
    /// Returns `false` if the connection task is already gone.
    pub fn close(self, quit_message: impl Into<String>) -> bool {
        self.tx.send(quit_message.into()).is_ok()
    }
}

/// A live connection: its event stream plus the means to stop it.
#[derive(Debug)]
pub struct Connection {
    pub events: mpsc::UnboundedReceiver<ConnectionEvent>,
    pub shutdown: ShutdownHandle,
}

/// Opens connections to chat servers.
pub trait Connector: Send + Sync {
    /// Human-readable transport name (e.g., "irc").
    fn name(&self) -> &str;

    /// Start connecting in the background and return immediately.
    ///
    /// Must be called from within a tokio runtime.
    fn open(&self, settings: ConnectionSettings) -> Connection;
}
