//! The IRC relay adapter.
//!
//! Bridges the host's model lifecycle to IRC: every registered model gets
//! its own IRC connection, and every chat line on that connection is POSTed
//! to the host's HTTP server. Configuration problems are returned to the
//! host; transport and postback problems are logged and never escape.

use std::sync::Arc;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chatrelay_config::AppConfig;
use chatrelay_core::adapter::ModelAdapter;
use chatrelay_core::error::Result;
use chatrelay_core::event::{ConnectionEvent, InboundChatEvent};
use chatrelay_core::model::{AdapterConfig, AdapterDefaults, ModelDescriptor};
use chatrelay_core::policy::ForwardPolicy;
use chatrelay_core::postback::Postback;
use chatrelay_core::transport::Connector;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info, warn};

use crate::irc_client::IrcConnector;
use crate::postback::{HttpPostback, postback_url};
use crate::registry::{ConnectionRegistry, RegisteredConnection, RelayCounts, RelayStats};

const ADAPTER_NAME: &str = "irc";

/// Upper bound on waiting for a connection to wind down during teardown.
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Host-wide settings read each time a message is forwarded.
#[derive(Debug)]
pub struct HostSettings {
    postback_host: String,
    port: AtomicU16,
}

impl HostSettings {
    pub fn new(postback_host: impl Into<String>, port: u16) -> Self {
        Self {
            postback_host: postback_host.into(),
            port: AtomicU16::new(port),
        }
    }

    pub fn port(&self) -> u16 {
        self.port.load(Ordering::Relaxed)
    }

    /// Change the port; forwards issued afterwards use the new value.
    pub fn set_port(&self, port: u16) {
        self.port.store(port, Ordering::Relaxed);
    }

    pub fn postback_url(&self, path: &str) -> String {
        postback_url(&self.postback_host, self.port(), path)
    }
}

impl Default for HostSettings {
    fn default() -> Self {
        Self::new("localhost", 1337)
    }
}

/// Relays IRC channel messages to the host's HTTP server, one connection
/// per registered model.
pub struct ChatRelayAdapter {
    defaults: AdapterDefaults,
    connector: Arc<dyn Connector>,
    postback: Arc<dyn Postback>,
    host: Arc<HostSettings>,
    forward_policy: ForwardPolicy,
    quit_message: String,
    registry: RwLock<ConnectionRegistry>,
}

impl ChatRelayAdapter {
    pub fn new(
        connector: Arc<dyn Connector>,
        postback: Arc<dyn Postback>,
        host: Arc<HostSettings>,
    ) -> Self {
        Self {
            defaults: AdapterDefaults::default(),
            connector,
            postback,
            host,
            forward_policy: ForwardPolicy::default(),
            quit_message: "chatrelay shutting down".into(),
            registry: RwLock::new(ConnectionRegistry::new()),
        }
    }

    /// Build an adapter with the real IRC connector and HTTP postback.
    pub fn from_config(config: &AppConfig) -> Self {
        let connector = Arc::new(IrcConnector::new(config.reconnect.clone()));
        let postback = Arc::new(HttpPostback::new(Duration::from_secs(
            config.forwarding.timeout_secs,
        )));
        let host = Arc::new(HostSettings::new(
            config.host.postback_host.clone(),
            config.host.port,
        ));

        Self::new(connector, postback, host)
            .with_defaults(config.defaults.clone())
            .with_forward_policy(config.forwarding.policy())
            .with_quit_message(config.quit_message.clone())
    }

    pub fn with_defaults(mut self, defaults: AdapterDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_forward_policy(mut self, policy: ForwardPolicy) -> Self {
        self.forward_policy = policy;
        self
    }

    pub fn with_quit_message(mut self, quit_message: impl Into<String>) -> Self {
        self.quit_message = quit_message.into();
        self
    }

    /// Shared host settings (e.g. to change the port at runtime).
    pub fn host(&self) -> &Arc<HostSettings> {
        &self.host
    }

    /// Validate a model, open its connection, and start relaying.
    ///
    /// Returns as soon as the relay is wired up; the IRC handshake carries
    /// on in the background.
    pub async fn register_collection(&self, model: &ModelDescriptor) -> Result<()> {
        info!(
            adapter = ADAPTER_NAME,
            identity = %model.identity,
            "Registering model with the IRC adapter"
        );

        let mut config = model.config.clone();
        config.absorb_defaults(&self.defaults);

        let settings = config.validate().inspect_err(|e| {
            warn!(identity = %model.identity, error = %e, "Rejected model configuration");
        })?;

        debug!(
            identity = %model.identity,
            transport = self.connector.name(),
            "Opening connection"
        );
        let connection = self.connector.open(settings);
        let stats = Arc::new(RelayStats::default());
        let relay = Relay {
            identity: model.identity.clone(),
            path: config.postback_path().to_string(),
            host: Arc::clone(&self.host),
            postback: Arc::clone(&self.postback),
            policy: self.forward_policy.clone(),
            stats: Arc::clone(&stats),
        };
        let relay_task = tokio::spawn(relay.run(connection.events));

        let previous = self.registry.write().await.insert(
            model.identity.clone(),
            config,
            RegisteredConnection::new(connection.shutdown, relay_task, stats),
        );
        if let Some(previous) = previous {
            warn!(identity = %model.identity, "Model registered twice, closing old connection");
            self.close(&model.identity, previous).await;
        }

        Ok(())
    }

    /// Close the connection for `identity` and forget the model.
    ///
    /// Unknown identities are logged and otherwise ignored.
    pub async fn teardown(&self, identity: &str) -> Result<()> {
        info!(adapter = ADAPTER_NAME, identity = %identity, "Tearing down model");

        let removed = self.registry.write().await.remove(identity);
        match removed {
            Some((_, connection)) => self.close(identity, connection).await,
            None => warn!(identity = %identity, "Teardown for unregistered model"),
        }
        Ok(())
    }

    /// Tear down every registered model.
    pub async fn teardown_all(&self) {
        let drained = self.registry.write().await.drain();
        for (identity, connection) in drained {
            self.close(&identity, connection).await;
        }
    }

    async fn close(&self, identity: &str, connection: RegisteredConnection) {
        let RegisteredConnection {
            shutdown,
            mut relay,
            stats,
        } = connection;

        if !shutdown.close(self.quit_message.clone()) {
            debug!(identity = %identity, "Connection task already finished");
        }

        if tokio::time::timeout(TEARDOWN_TIMEOUT, &mut relay).await.is_err() {
            warn!(identity = %identity, "Relay did not stop in time, aborting it");
            relay.abort();
        }

        let counts = stats.snapshot();
        info!(
            identity = %identity,
            forwarded = counts.forwarded,
            forward_failures = counts.forward_failures,
            transport_errors = counts.transport_errors,
            "Connection closed"
        );
    }

    /// Effective (defaulted) config stored for `identity`.
    pub async fn config(&self, identity: &str) -> Option<AdapterConfig> {
        self.registry.read().await.config(identity).cloned()
    }

    pub async fn is_registered(&self, identity: &str) -> bool {
        self.registry.read().await.contains(identity)
    }

    /// Registered identities, sorted.
    pub async fn identities(&self) -> Vec<String> {
        self.registry.read().await.identities()
    }

    pub async fn len(&self) -> usize {
        self.registry.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.registry.read().await.is_empty()
    }

    pub async fn stats(&self, identity: &str) -> Option<RelayCounts> {
        self.registry
            .read()
            .await
            .connection(identity)
            .map(RegisteredConnection::stats)
    }
}

#[async_trait]
impl ModelAdapter for ChatRelayAdapter {
    fn name(&self) -> &str {
        ADAPTER_NAME
    }

    async fn register_collection(&self, model: &ModelDescriptor) -> Result<()> {
        ChatRelayAdapter::register_collection(self, model).await
    }

    async fn teardown(&self, identity: &str) -> Result<()> {
        ChatRelayAdapter::teardown(self, identity).await
    }
}

/// Drains one connection's events and forwards its chat lines.
struct Relay {
    identity: String,
    path: String,
    host: Arc<HostSettings>,
    postback: Arc<dyn Postback>,
    policy: ForwardPolicy,
    stats: Arc<RelayStats>,
}

impl Relay {
    async fn run(self, mut events: mpsc::UnboundedReceiver<ConnectionEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                ConnectionEvent::Message(chat) => self.forward(&chat).await,
                ConnectionEvent::Error(e) => {
                    self.stats.record_transport_error();
                    error!(
                        adapter = ADAPTER_NAME,
                        identity = %self.identity,
                        error = %e,
                        "IRC transport error"
                    );
                }
                ConnectionEvent::Closed => break,
            }
        }
        debug!(identity = %self.identity, "Relay finished");
    }

    async fn forward(&self, chat: &InboundChatEvent) {
        let url = self.host.postback_url(&self.path);
        let mut attempt = 0u32;

        loop {
            match self.postback.deliver(&url, chat).await {
                Ok(()) => {
                    self.stats.record_forwarded();
                    debug!(identity = %self.identity, from = %chat.from, "Forwarded chat message");
                    return;
                }
                Err(e) if attempt < self.policy.max_retries => {
                    attempt += 1;
                    warn!(
                        identity = %self.identity,
                        attempt,
                        error = %e,
                        "Postback failed, retrying"
                    );
                    tokio::time::sleep(self.policy.retry_delay()).await;
                }
                Err(e) => {
                    self.stats.record_forward_failure();
                    error!(
                        identity = %self.identity,
                        url = %url,
                        error = %e,
                        "Postback failed, dropping chat message"
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_core::error::{AdapterError, ConfigurationError, ForwardingError, TransportError};
    use chatrelay_core::transport::{Connection, ConnectionSettings, ShutdownHandle};
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;
    use tokio::sync::mpsc::UnboundedReceiver;

    // ── Mocks ────────────────────────────────────────────────────────────

    /// Records every opened connection and lets tests push events into it.
    #[derive(Default)]
    struct MockConnector {
        opened: Mutex<Vec<(ConnectionSettings, mpsc::UnboundedSender<ConnectionEvent>)>>,
        quits: Arc<Mutex<Vec<String>>>,
    }

    impl MockConnector {
        fn opened(&self) -> usize {
            self.opened.lock().unwrap().len()
        }

        fn settings(&self, index: usize) -> ConnectionSettings {
            self.opened.lock().unwrap()[index].0.clone()
        }

        fn sender(&self, index: usize) -> mpsc::UnboundedSender<ConnectionEvent> {
            self.opened.lock().unwrap()[index].1.clone()
        }
    }

    impl Connector for MockConnector {
        fn name(&self) -> &str {
            "mock"
        }

        fn open(&self, settings: ConnectionSettings) -> Connection {
            let (tx, rx) = mpsc::unbounded_channel();
            let (shutdown, shutdown_rx) = ShutdownHandle::new();

            let closer = tx.clone();
            let quits = Arc::clone(&self.quits);
            tokio::spawn(async move {
                if let Ok(message) = shutdown_rx.await {
                    quits.lock().unwrap().push(message);
                }
                let _ = closer.send(ConnectionEvent::Closed);
            });

            self.opened.lock().unwrap().push((settings, tx));
            Connection { events: rx, shutdown }
        }
    }

    /// Captures deliveries; fails the first `fail_first` calls.
    struct MockPostback {
        delivered: mpsc::UnboundedSender<(String, InboundChatEvent)>,
        fail_first: AtomicU32,
    }

    impl MockPostback {
        fn new() -> (Self, UnboundedReceiver<(String, InboundChatEvent)>) {
            Self::failing(0)
        }

        fn failing(count: u32) -> (Self, UnboundedReceiver<(String, InboundChatEvent)>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    delivered: tx,
                    fail_first: AtomicU32::new(count),
                },
                rx,
            )
        }
    }

    #[async_trait]
    impl Postback for MockPostback {
        async fn deliver(
            &self,
            url: &str,
            event: &InboundChatEvent,
        ) -> std::result::Result<(), ForwardingError> {
            let remaining = self.fail_first.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_first.store(remaining - 1, Ordering::SeqCst);
                return Err(ForwardingError::Status {
                    url: url.to_string(),
                    status_code: 503,
                });
            }
            let _ = self.delivered.send((url.to_string(), event.clone()));
            Ok(())
        }
    }

    fn valid_config() -> AdapterConfig {
        AdapterConfig {
            host: Some("irc.libera.chat".into()),
            nick: Some("relaybot".into()),
            channel: Some("#sailsjs".into()),
            ..AdapterConfig::default()
        }
    }

    fn adapter_with(
        connector: &Arc<MockConnector>,
        postback: MockPostback,
    ) -> ChatRelayAdapter {
        ChatRelayAdapter::new(
            Arc::clone(connector) as Arc<dyn Connector>,
            Arc::new(postback),
            Arc::new(HostSettings::new("localhost", 1337)),
        )
    }

    async fn next_delivery(
        rx: &mut UnboundedReceiver<(String, InboundChatEvent)>,
    ) -> (String, InboundChatEvent) {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("delivery timed out")
            .expect("postback channel closed")
    }

    // ── Registration ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn missing_fields_fail_in_priority_order_without_connecting() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        let cases = [
            (
                AdapterConfig { channel: None, ..valid_config() },
                ConfigurationError::MissingChannel,
            ),
            (
                AdapterConfig { nick: None, ..valid_config() },
                ConfigurationError::MissingNick,
            ),
            (
                AdapterConfig { host: None, ..valid_config() },
                ConfigurationError::MissingHost,
            ),
            (AdapterConfig::default(), ConfigurationError::MissingChannel),
            (
                AdapterConfig { host: None, nick: None, ..valid_config() },
                ConfigurationError::MissingNick,
            ),
        ];

        for (config, expected) in cases {
            let err = adapter
                .register_collection(&ModelDescriptor::new("broken", config))
                .await
                .unwrap_err();
            match err {
                AdapterError::Configuration(actual) => assert_eq!(actual, expected),
                other => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(connector.opened(), 0);
        assert!(!adapter.is_registered("broken").await);
    }

    #[tokio::test]
    async fn valid_config_registers_without_handshake() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        adapter
            .register_collection(&ModelDescriptor::new("ircmessage", valid_config()))
            .await
            .unwrap();

        assert_eq!(connector.opened(), 1);
        let settings = connector.settings(0);
        assert_eq!(settings.host, "irc.libera.chat");
        assert_eq!(settings.nick, "relaybot");
        assert_eq!(settings.channel, "#sailsjs");
        assert!(adapter.is_registered("ircmessage").await);
        assert_eq!(adapter.identities().await, vec!["ircmessage".to_string()]);
    }

    #[tokio::test]
    async fn postback_url_defaults_to_chat() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();
        let stored = adapter.config("m").await.unwrap();
        assert_eq!(stored.postback_url.as_deref(), Some("/chat"));
    }

    #[tokio::test]
    async fn explicit_postback_url_is_kept() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        let config = AdapterConfig {
            postback_url: Some("/custom".into()),
            ..valid_config()
        };
        adapter
            .register_collection(&ModelDescriptor::new("m", config))
            .await
            .unwrap();
        let stored = adapter.config("m").await.unwrap();
        assert_eq!(stored.postback_url.as_deref(), Some("/custom"));
    }

    #[tokio::test]
    async fn caller_mutation_does_not_reach_stored_config() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        let mut descriptor = ModelDescriptor::new("m", valid_config());
        adapter.register_collection(&descriptor).await.unwrap();

        descriptor.config.nick = Some("someone-else".into());
        descriptor.config.channel = None;
        descriptor
            .config
            .extra
            .insert("injected".into(), serde_json::Value::Bool(true));

        let stored = adapter.config("m").await.unwrap();
        assert_eq!(stored.nick.as_deref(), Some("relaybot"));
        assert_eq!(stored.channel.as_deref(), Some("#sailsjs"));
        assert!(stored.extra.is_empty());
    }

    // ── Forwarding ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn inbound_message_posts_once_to_chat() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        connector
            .sender(0)
            .send(ConnectionEvent::Message(InboundChatEvent::new(
                "alice", "#sailsjs", "hi",
            )))
            .unwrap();

        let (url, event) = next_delivery(&mut rx).await;
        assert_eq!(url, "http://localhost:1337/chat");
        assert_eq!(event, InboundChatEvent::new("alice", "#sailsjs", "hi"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(adapter.stats("m").await.unwrap().forwarded, 1);
    }

    #[tokio::test]
    async fn port_is_read_at_forward_time() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        adapter.host().set_port(8080);
        connector
            .sender(0)
            .send(ConnectionEvent::Message(InboundChatEvent::new("a", "#b", "c")))
            .unwrap();

        let (url, _) = next_delivery(&mut rx).await;
        assert_eq!(url, "http://localhost:8080/chat");
    }

    #[tokio::test]
    async fn transport_error_does_not_stop_forwarding() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        let tx = connector.sender(0);
        tx.send(ConnectionEvent::Error(TransportError::Stream("ping timeout".into())))
            .unwrap();
        tx.send(ConnectionEvent::Message(InboundChatEvent::new(
            "alice", "#sailsjs", "still here",
        )))
        .unwrap();

        let (_, event) = next_delivery(&mut rx).await;
        assert_eq!(event.message, "still here");

        tokio::time::sleep(Duration::from_millis(50)).await;
        let stats = adapter.stats("m").await.unwrap();
        assert_eq!(stats.transport_errors, 1);
        assert_eq!(stats.forwarded, 1);
    }

    #[tokio::test]
    async fn messages_forwarded_in_order() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        let tx = connector.sender(0);
        for i in 0..5 {
            tx.send(ConnectionEvent::Message(InboundChatEvent::new(
                "alice",
                "#sailsjs",
                format!("line {i}"),
            )))
            .unwrap();
        }

        for i in 0..5 {
            let (_, event) = next_delivery(&mut rx).await;
            assert_eq!(event.message, format!("line {i}"));
        }
    }

    #[tokio::test]
    async fn two_models_do_not_cross_talk() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        adapter
            .register_collection(&ModelDescriptor::new("alpha", valid_config()))
            .await
            .unwrap();
        adapter
            .register_collection(&ModelDescriptor::new(
                "beta",
                AdapterConfig {
                    host: Some("irc.oftc.net".into()),
                    nick: Some("otherbot".into()),
                    channel: Some("#rust".into()),
                    postback_url: Some("/beta".into()),
                    ..AdapterConfig::default()
                },
            ))
            .await
            .unwrap();

        assert_eq!(connector.opened(), 2);
        assert_eq!(connector.settings(1).host, "irc.oftc.net");

        connector
            .sender(1)
            .send(ConnectionEvent::Message(InboundChatEvent::new("bob", "#rust", "b")))
            .unwrap();
        let (url, event) = next_delivery(&mut rx).await;
        assert_eq!(url, "http://localhost:1337/beta");
        assert_eq!(event.to, "#rust");

        connector
            .sender(0)
            .send(ConnectionEvent::Message(InboundChatEvent::new("alice", "#sailsjs", "a")))
            .unwrap();
        let (url, event) = next_delivery(&mut rx).await;
        assert_eq!(url, "http://localhost:1337/chat");
        assert_eq!(event.to, "#sailsjs");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(adapter.stats("alpha").await.unwrap().forwarded, 1);
        assert_eq!(adapter.stats("beta").await.unwrap().forwarded, 1);
    }

    #[tokio::test]
    async fn failed_postback_is_counted_and_relay_continues() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::failing(1);
        let adapter = adapter_with(&connector, postback);
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        let tx = connector.sender(0);
        tx.send(ConnectionEvent::Message(InboundChatEvent::new("a", "#b", "lost")))
            .unwrap();
        tx.send(ConnectionEvent::Message(InboundChatEvent::new("a", "#b", "kept")))
            .unwrap();

        let (_, event) = next_delivery(&mut rx).await;
        assert_eq!(event.message, "kept");
        tokio::time::sleep(Duration::from_millis(50)).await;
        let stats = adapter.stats("m").await.unwrap();
        assert_eq!(stats.forward_failures, 1);
        assert_eq!(stats.forwarded, 1);
    }

    #[tokio::test]
    async fn retries_follow_forward_policy() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::failing(2);
        let adapter = adapter_with(&connector, postback).with_forward_policy(ForwardPolicy {
            max_retries: 2,
            retry_delay_ms: 1,
        });
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        connector
            .sender(0)
            .send(ConnectionEvent::Message(InboundChatEvent::new("a", "#b", "eventually")))
            .unwrap();

        let (_, event) = next_delivery(&mut rx).await;
        assert_eq!(event.message, "eventually");
        assert_eq!(adapter.stats("m").await.unwrap().forward_failures, 0);
    }

    // ── Teardown ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn teardown_closes_connection_and_forgets_model() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback).with_quit_message("bye all");
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();

        adapter.teardown("m").await.unwrap();

        assert!(!adapter.is_registered("m").await);
        assert!(adapter.config("m").await.is_none());
        assert_eq!(*connector.quits.lock().unwrap(), vec!["bye all".to_string()]);
    }

    #[tokio::test]
    async fn teardown_unknown_identity_succeeds() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        assert!(adapter.teardown("never-registered").await.is_ok());
    }

    #[tokio::test]
    async fn teardown_all_closes_every_connection() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);
        for identity in ["a", "b", "c"] {
            adapter
                .register_collection(&ModelDescriptor::new(identity, valid_config()))
                .await
                .unwrap();
        }

        adapter.teardown_all().await;

        assert!(adapter.is_empty().await);
        assert_eq!(connector.quits.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn reregistering_replaces_old_connection() {
        let connector = Arc::new(MockConnector::default());
        let (postback, mut rx) = MockPostback::new();
        let adapter = adapter_with(&connector, postback);

        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();
        adapter
            .register_collection(&ModelDescriptor::new(
                "m",
                AdapterConfig {
                    nick: Some("newbot".into()),
                    ..valid_config()
                },
            ))
            .await
            .unwrap();

        assert_eq!(adapter.len().await, 1);
        assert_eq!(connector.quits.lock().unwrap().len(), 1);
        assert_eq!(
            adapter.config("m").await.unwrap().nick.as_deref(),
            Some("newbot")
        );

        connector
            .sender(1)
            .send(ConnectionEvent::Message(InboundChatEvent::new("a", "#b", "new")))
            .unwrap();
        let (_, event) = next_delivery(&mut rx).await;
        assert_eq!(event.message, "new");
    }

    #[tokio::test]
    async fn usable_through_model_adapter_trait() {
        let connector = Arc::new(MockConnector::default());
        let (postback, _rx) = MockPostback::new();
        let adapter: Box<dyn ModelAdapter> = Box::new(adapter_with(&connector, postback));

        assert_eq!(adapter.name(), "irc");
        adapter
            .register_collection(&ModelDescriptor::new("m", valid_config()))
            .await
            .unwrap();
        adapter.teardown("m").await.unwrap();
        assert_eq!(connector.opened(), 1);
    }
}
