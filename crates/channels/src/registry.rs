//! Connection registry — what the adapter knows about each registered model.
//!
//! Two maps keyed by model identity: the effective configuration (kept for
//! diagnostics) and the live connection. Both are inserted together on
//! registration and removed together on teardown.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chatrelay_core::model::AdapterConfig;
use chatrelay_core::transport::ShutdownHandle;
use tokio::task::JoinHandle;

/// Per-connection relay counters.
#[derive(Debug, Default)]
pub struct RelayStats {
    forwarded: AtomicU64,
    forward_failures: AtomicU64,
    transport_errors: AtomicU64,
}

impl RelayStats {
    pub(crate) fn record_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_forward_failure(&self) {
        self.forward_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> RelayCounts {
        RelayCounts {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayCounts {
    /// Messages accepted by the postback endpoint
    pub forwarded: u64,
    /// Messages dropped after every postback attempt failed
    pub forward_failures: u64,
    /// Transport errors reported by the connection
    pub transport_errors: u64,
}

/// A live connection owned by the registry.
#[derive(Debug)]
pub struct RegisteredConnection {
    pub(crate) shutdown: ShutdownHandle,
    pub(crate) relay: JoinHandle<()>,
    pub(crate) stats: Arc<RelayStats>,
}

impl RegisteredConnection {
    pub fn new(shutdown: ShutdownHandle, relay: JoinHandle<()>, stats: Arc<RelayStats>) -> Self {
        Self {
            shutdown,
            relay,
            stats,
        }
    }

    pub fn stats(&self) -> RelayCounts {
        self.stats.snapshot()
    }
}

/// Identity → config and identity → connection.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    configs: HashMap<String, AdapterConfig>,
    connections: HashMap<String, RegisteredConnection>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a model's config and connection. Returns the connection that
    /// was previously registered under the same identity, if any.
    pub fn insert(
        &mut self,
        identity: impl Into<String>,
        config: AdapterConfig,
        connection: RegisteredConnection,
    ) -> Option<RegisteredConnection> {
        let identity = identity.into();
        self.configs.insert(identity.clone(), config);
        self.connections.insert(identity, connection)
    }

    /// Remove both entries for `identity`.
    pub fn remove(&mut self, identity: &str) -> Option<(AdapterConfig, RegisteredConnection)> {
        let config = self.configs.remove(identity);
        let connection = self.connections.remove(identity);
        config.zip(connection)
    }

    pub fn config(&self, identity: &str) -> Option<&AdapterConfig> {
        self.configs.get(identity)
    }

    pub fn connection(&self, identity: &str) -> Option<&RegisteredConnection> {
        self.connections.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.connections.contains_key(identity)
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<String> {
        let mut identities: Vec<String> = self.connections.keys().cloned().collect();
        identities.sort();
        identities
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Empty the registry, handing back every connection.
    pub fn drain(&mut self) -> Vec<(String, RegisteredConnection)> {
        self.configs.clear();
        let mut drained: Vec<_> = self.connections.drain().collect();
        drained.sort_by(|a, b| a.0.cmp(&b.0));
        drained
    }
}
