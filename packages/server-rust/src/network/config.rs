//! Network and connector configuration.

use std::time::Duration;

use url::Url;

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete.
    pub request_timeout: Duration,
    /// Largest request body accepted, in bytes.
    pub max_body_size: usize,
    /// Externally visible base URL, used instead of the `Host` header when
    /// reconstructing request URLs behind a proxy.
    pub public_base_url: Option<Url>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            max_body_size: 4 * 1024 * 1024,
            public_base_url: None,
        }
    }
}

/// Identity of the local connector.
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Connector URI, stamped as issuer and sender agent.
    pub id: Url,
    /// Information-model version declared on outbound messages.
    pub model_version: String,
    /// Fixed security token for deployments without a trust service.
    /// Empty means outbound header builds fail.
    pub security_token: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            id: Url::parse("https://localhost:8080/connector")
                .expect("default connector id is a valid URL"),
            model_version: "4.0.0".to_string(),
            security_token: String::new(),
        }
    }
}
