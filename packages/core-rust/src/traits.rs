use async_trait::async_trait;

use crate::types::ConnectorInfo;

/// Source of the local connector's identity.
///
/// Read-only. Returns `None` only while the connector configuration has not
/// been loaded; header builds treat that as a build failure.
pub trait ConnectorIdentity: Send + Sync {
    /// The connector's id and declared outbound model version.
    fn connector(&self) -> Option<ConnectorInfo>;
}

/// Issuer of the opaque bearer token attached to every outbound message.
///
/// Implementations may block on a remote trust service and may fail; callers
/// propagate failures and never retry here.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a current dynamic attribute token.
    async fn dynamic_attribute_token(&self) -> anyhow::Result<String>;
}
