//! IRC connector built on the `irc` crate.
//!
//! Each opened connection runs in its own task: connect, identify, join the
//! configured channel, then push every `PRIVMSG` onto the connection's event
//! channel in the order the server sent them. The hand-off never waits, so
//! a slow consumer cannot stall PING replies or QUIT. Transport failures are
//! reported as `ConnectionEvent::Error`; whether the task reconnects is
//! decided by the `ReconnectPolicy`.

use std::time::Duration;

use chatrelay_core::error::TransportError;
use chatrelay_core::event::{ConnectionEvent, InboundChatEvent};
use chatrelay_core::policy::ReconnectPolicy;
use chatrelay_core::transport::{Connection, ConnectionSettings, Connector, ShutdownHandle};
use futures::StreamExt;
use irc::client::prelude::{Client, Command, Config, Message};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// QUIT text used when the shutdown handle is dropped without a message.
const DEFAULT_QUIT_MESSAGE: &str = "chatrelay shutting down";

/// How long to keep draining the stream after QUIT so it gets flushed.
const QUIT_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens IRC connections.
#[derive(Debug, Clone)]
pub struct IrcConnector {
    reconnect: ReconnectPolicy,
}

impl Default for IrcConnector {
    fn default() -> Self {
        Self::new(ReconnectPolicy::default())
    }
}

impl IrcConnector {
    pub fn new(reconnect: ReconnectPolicy) -> Self {
        Self { reconnect }
    }
}

impl Connector for IrcConnector {
    fn name(&self) -> &str {
        "irc"
    }

    fn open(&self, settings: ConnectionSettings) -> Connection {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = ShutdownHandle::new();

        info!(
            host = %settings.host,
            nick = %settings.nick,
            channel = %settings.channel,
            "Opening IRC connection"
        );
        tokio::spawn(run_connection(
            settings,
            self.reconnect.clone(),
            tx,
            shutdown_rx,
        ));

        Connection {
            events: rx,
            shutdown,
        }
    }
}

/// How one connect-and-stream session ended.
enum SessionEnd {
    Shutdown,
    Dropped {
        error: TransportError,
        established: bool,
    },
}

async fn run_connection(
    settings: ConnectionSettings,
    policy: ReconnectPolicy,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    mut shutdown: oneshot::Receiver<String>,
) {
    let mut attempt = 0u32;

    loop {
        match session(&settings, &events, &mut shutdown).await {
            SessionEnd::Shutdown => break,
            SessionEnd::Dropped { error, established } => {
                warn!(host = %settings.host, error = %error, "IRC connection dropped");
                if events.send(ConnectionEvent::Error(error)).is_err() {
                    return;
                }

                if established {
                    attempt = 0;
                }
                attempt = attempt.saturating_add(1);

                let Some(delay) = policy.delay_for(attempt) else {
                    debug!(host = %settings.host, "Not reconnecting");
                    break;
                };

                info!(
                    host = %settings.host,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnecting to IRC server"
                );
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = &mut shutdown => break,
                }
            }
        }
    }

    let _ = events.send(ConnectionEvent::Closed);
    debug!(host = %settings.host, "IRC connection task finished");
}

async fn session(
    settings: &ConnectionSettings,
    events: &mpsc::UnboundedSender<ConnectionEvent>,
    shutdown: &mut oneshot::Receiver<String>,
) -> SessionEnd {
    let connect_error = |reason: String| SessionEnd::Dropped {
        error: TransportError::Connect {
            host: settings.host.clone(),
            reason,
        },
        established: false,
    };

    let connected = tokio::select! {
        result = Client::from_config(irc_config(settings)) => result,
        _ = &mut *shutdown => return SessionEnd::Shutdown,
    };
    let mut client = match connected {
        Ok(client) => client,
        Err(e) => return connect_error(e.to_string()),
    };

    if let Err(e) = client.identify() {
        return connect_error(e.to_string());
    }
    let mut stream = match client.stream() {
        Ok(stream) => stream,
        Err(e) => return connect_error(e.to_string()),
    };

    info!(host = %settings.host, nick = %settings.nick, "Connected to IRC server");

    loop {
        tokio::select! {
            quit = &mut *shutdown => {
                let quit = quit.unwrap_or_else(|_| DEFAULT_QUIT_MESSAGE.to_string());
                if let Err(e) = client.send(Command::QUIT(Some(quit))) {
                    debug!(host = %settings.host, error = %e, "Failed to send QUIT");
                }
                let _ = tokio::time::timeout(QUIT_FLUSH_TIMEOUT, async {
                    while stream.next().await.is_some() {}
                })
                .await;
                return SessionEnd::Shutdown;
            }
            next = stream.next() => match next {
                Some(Ok(message)) => {
                    if let Some(event) = chat_event(&message) {
                        if events.send(ConnectionEvent::Message(event)).is_err() {
                            // Nobody is listening any more.
                            return SessionEnd::Shutdown;
                        }
                    }
                }
                Some(Err(e)) => {
                    return SessionEnd::Dropped {
                        error: TransportError::Stream(e.to_string()),
                        established: true,
                    };
                }
                None => {
                    return SessionEnd::Dropped {
                        error: TransportError::Closed("server closed the connection".into()),
                        established: true,
                    };
                }
            }
        }
    }
}

/// Client configuration for one connection: one nick, one channel.
fn irc_config(settings: &ConnectionSettings) -> Config {
    Config {
        nickname: Some(settings.nick.clone()),
        server: Some(settings.host.clone()),
        port: settings.port,
        use_tls: Some(settings.use_tls),
        password: settings.password.clone(),
        channels: vec![settings.channel.clone()],
        ..Config::default()
    }
}

/// Turn a plain `PRIVMSG` into a chat event. CTCP requests and everything
/// else are ignored.
fn chat_event(message: &Message) -> Option<InboundChatEvent> {
    match &message.command {
        Command::PRIVMSG(target, text) if !text.starts_with('\u{1}') => {
            Some(InboundChatEvent::new(
                message.source_nickname().unwrap_or_default(),
                target.as_str(),
                text.as_str(),
            ))
        }
        _ => None,
    }
}
