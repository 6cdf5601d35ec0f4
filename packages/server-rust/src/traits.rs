use async_trait::async_trait;
use connector_core::{EndpointId, Message, ResourceMetadata, Resolved};
use uuid::Uuid;

/// Persistence backend for resource metadata imported from peers.
#[async_trait]
pub trait ResourceStorage: Send + Sync {
    /// Stores `metadata` and returns the generated resource id.
    async fn save(&self, metadata: ResourceMetadata) -> anyhow::Result<Uuid>;

    /// Loads the metadata stored under `id`.
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ResourceMetadata>>;
}

/// Maps internal endpoint addresses to the resources they serve.
#[async_trait]
pub trait EndpointDirectory: Send + Sync {
    /// Resolves `endpoint` to a resource id, or to the endpoint the resource
    /// has moved to. `None` when nothing is known under that address.
    async fn resolve(&self, endpoint: &EndpointId) -> anyhow::Result<Option<Resolved<Uuid>>>;
}

/// Performs the network exchange for a finished message.
///
/// Retry policy, timeouts, and TLS belong to implementations; callers only
/// propagate failures.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Sends `message` and returns the peer's response message.
    async fn send(&self, message: Message) -> anyhow::Result<Message>;
}
