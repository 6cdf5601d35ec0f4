//! Configuration-backed connector identity and token provider.

use anyhow::bail;
use async_trait::async_trait;
use connector_core::{ConnectorIdentity, ConnectorInfo, TokenProvider};

use crate::network::ConnectorConfig;

/// Identity read once from [`ConnectorConfig`].
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    info: ConnectorInfo,
}

impl StaticIdentity {
    #[must_use]
    pub fn new(info: ConnectorInfo) -> Self {
        Self { info }
    }
}

impl From<&ConnectorConfig> for StaticIdentity {
    fn from(config: &ConnectorConfig) -> Self {
        Self::new(ConnectorInfo {
            id: config.id.clone(),
            outbound_model_version: config.model_version.clone(),
        })
    }
}

impl ConnectorIdentity for StaticIdentity {
    fn connector(&self) -> Option<ConnectorInfo> {
        Some(self.info.clone())
    }
}

/// Hands out a fixed token. Meant for development deployments that run
/// without a trust service.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn dynamic_attribute_token(&self) -> anyhow::Result<String> {
        if self.token.is_empty() {
            bail!("no security token configured");
        }
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_from_config() {
        let config = ConnectorConfig::default();
        let identity = StaticIdentity::from(&config);
        let info = identity.connector().unwrap();
        assert_eq!(info.id, config.id);
        assert_eq!(info.outbound_model_version, config.model_version);
    }

    #[tokio::test]
    async fn static_token_is_returned() {
        let tokens = StaticTokenProvider::new("eyJ.abc");
        assert_eq!(tokens.dynamic_attribute_token().await.unwrap(), "eyJ.abc");
    }

    #[tokio::test]
    async fn empty_token_fails() {
        let tokens = StaticTokenProvider::new("");
        assert!(tokens.dynamic_attribute_token().await.is_err());
    }
}
