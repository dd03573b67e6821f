//! # ChatRelay Core
//!
//! Domain types, traits, and error definitions for the ChatRelay IRC
//! adapter. This crate knows nothing about IRC or HTTP libraries; it
//! defines the seams the implementations in `chatrelay-channels` plug into.
//!
//! - [`ModelAdapter`]: the host lifecycle contract
//! - [`Connector`]: opens chat connections that report [`ConnectionEvent`]s
//! - [`Postback`]: delivers [`InboundChatEvent`]s over HTTP

pub mod adapter;
pub mod error;
pub mod event;
pub mod model;
pub mod policy;
pub mod postback;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use adapter::ModelAdapter;
pub use error::{AdapterError, ConfigurationError, ForwardingError, Result, TransportError};
pub use event::{ConnectionEvent, InboundChatEvent};
pub use model::{AdapterConfig, AdapterDefaults, ModelDescriptor, DEFAULT_POSTBACK_URL};
pub use policy::{ForwardPolicy, ReconnectPolicy};
pub use postback::Postback;
pub use transport::{Connection, ConnectionSettings, Connector, ShutdownHandle};
