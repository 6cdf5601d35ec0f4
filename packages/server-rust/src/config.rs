//! Command-line and environment configuration.

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::network::{ConnectorConfig, NetworkConfig};

/// Connector server options. Every flag can also be set through its
/// environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "connector", version, about = "Data-space connector message server")]
pub struct Cli {
    /// Connector URI stamped as issuer and sender agent.
    #[arg(long = "connector-id", env = "CONNECTOR_ID", default_value = "https://localhost:8080/connector")]
    pub connector_id: Url,

    /// Information-model version declared on outbound messages.
    #[arg(long = "model-version", env = "CONNECTOR_MODEL_VERSION", default_value = "4.0.0")]
    pub model_version: String,

    /// Static security token attached to outbound messages.
    #[arg(long = "security-token", env = "CONNECTOR_SECURITY_TOKEN", default_value = "", hide_env_values = true)]
    pub security_token: String,

    /// Bind address.
    #[arg(long, env = "CONNECTOR_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Listen port.
    #[arg(short, long, env = "CONNECTOR_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Allowed CORS origins, comma separated.
    #[arg(long = "cors-origins", env = "CONNECTOR_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long = "request-timeout", env = "CONNECTOR_REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes.
    #[arg(long = "max-body-size", env = "CONNECTOR_MAX_BODY_SIZE", default_value_t = 4 * 1024 * 1024)]
    pub max_body_size: usize,

    /// Externally visible base URL, when running behind a proxy.
    #[arg(long = "public-url", env = "CONNECTOR_PUBLIC_URL")]
    pub public_url: Option<Url>,

    /// Emit logs as JSON lines.
    #[arg(long = "log-json", env = "CONNECTOR_LOG_JSON")]
    pub log_json: bool,
}

impl Cli {
    #[must_use]
    pub fn into_configs(self) -> (NetworkConfig, ConnectorConfig) {
        let network = NetworkConfig {
            host: self.host,
            port: self.port,
            cors_origins: self.cors_origins,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_body_size: self.max_body_size,
            public_base_url: self.public_url,
        };
        let connector = ConnectorConfig {
            id: self.connector_id,
            model_version: self.model_version,
            security_token: self.security_token,
        };
        (network, connector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["connector"]).unwrap();
        assert!(!cli.log_json);
        let (network, connector) = cli.into_configs();

        let defaults = ConnectorConfig::default();
        assert_eq!(connector.id, defaults.id);
        assert_eq!(connector.model_version, defaults.model_version);
        assert!(connector.security_token.is_empty());
        assert_eq!(network.port, 8080);
        assert_eq!(network.cors_origins, vec!["*"]);
        assert_eq!(network.max_body_size, NetworkConfig::default().max_body_size);
        assert!(network.public_base_url.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "connector",
            "--connector-id",
            "https://provider.example/connector",
            "--model-version",
            "4.2.7",
            "--port",
            "9090",
            "--cors-origins",
            "https://a.example,https://b.example",
            "--request-timeout",
            "5",
            "--public-url",
            "https://public.example/",
        ])
        .unwrap();
        let (network, connector) = cli.into_configs();

        assert_eq!(connector.id.as_str(), "https://provider.example/connector");
        assert_eq!(connector.model_version, "4.2.7");
        assert_eq!(network.port, 9090);
        assert_eq!(network.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(network.request_timeout, Duration::from_secs(5));
        assert_eq!(
            network.public_base_url.unwrap().as_str(),
            "https://public.example/"
        );
    }

    #[test]
    fn invalid_connector_id_is_rejected() {
        assert!(Cli::try_parse_from(["connector", "--connector-id", "not a uri"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
