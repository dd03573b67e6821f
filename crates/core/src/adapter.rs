//! Host lifecycle contract.
//!
//! A host registers each of its models with an adapter at startup and tears
//! them down on halt. Failures come back as `Err`, never as a panic; the
//! host decides whether a failed registration aborts startup.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::ModelDescriptor;

#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Adapter name used in logs (e.g., "irc").
    fn name(&self) -> &str;

    /// Called once per model at startup.
    async fn register_collection(&self, model: &ModelDescriptor) -> Result<()>;

    /// Release whatever `register_collection` acquired for `identity`.
    async fn teardown(&self, identity: &str) -> Result<()>;
}
