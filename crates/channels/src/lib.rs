//! IRC relay implementations for ChatRelay.
//!
//! - **Adapter** — `ChatRelayAdapter`, the host lifecycle bridge
//! - **Registry** — per-identity config and live connection bookkeeping
//! - **IRC client** — `IrcConnector`, built on the `irc` crate
//! - **Postback** — `HttpPostback`, form POSTs via `reqwest`

pub mod adapter;
pub mod irc_client;
pub mod postback;
pub mod registry;

pub use adapter::{ChatRelayAdapter, HostSettings};
pub use irc_client::IrcConnector;
pub use postback::HttpPostback;
pub use registry::{ConnectionRegistry, RegisteredConnection, RelayCounts, RelayStats};
