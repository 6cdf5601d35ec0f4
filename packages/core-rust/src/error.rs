//! Error taxonomy of the protocol layer.
//!
//! Every failure either fully succeeds or fully fails: header builds never
//! return a half-populated header and extraction never returns partial
//! metadata.

/// A header could not be built because a required value was unavailable.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A per-message parameter (recipient, artifact, contract, correlation id) was not set.
    #[error("missing required message parameter: {field}")]
    MissingParameter { field: &'static str },
    /// The connector identity provider returned no connector.
    #[error("connector identity is not available")]
    MissingIdentity,
    /// The security-token provider failed or returned an empty token.
    #[error("security token could not be obtained: {0}")]
    Token(#[source] anyhow::Error),
}

/// A peer payload could not be interpreted as a resource description.
///
/// Every variant carries the raw payload so the rejected exchange can be
/// diagnosed after the fact.
#[derive(Debug, thiserror::Error)]
pub enum InvalidResource {
    /// The payload is not a JSON document at all.
    #[error("payload is not valid JSON-LD: {source}")]
    Unparseable {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
    /// The payload is JSON but neither a resource nor a connector document.
    #[error("payload is neither a resource nor a connector description")]
    UnknownShape { payload: String },
    /// The connector document carries no offered resource with the expected id.
    #[error("resource {expected} not found in the first resource catalog")]
    NotInCatalog { payload: String, expected: String },
    /// The resource was located but a nested structure is malformed.
    #[error("resource metadata could not be mapped: {reason}")]
    Malformed { payload: String, reason: String },
}

impl InvalidResource {
    /// The raw payload that was rejected.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::Unparseable { payload, .. }
            | Self::UnknownShape { payload }
            | Self::NotInCatalog { payload, .. }
            | Self::Malformed { payload, .. } => payload,
        }
    }
}

/// A path expected to address an endpoint carries no UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("no resource uuid found in path: {path}")]
    NoUuid { path: String },
}

/// Errors raised by the request body buffer.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("failed to drain request body: {0}")]
    Io(#[from] std::io::Error),
    /// Asynchronous listener-based reads are not supported on a buffered body.
    #[error("read listeners are not supported on a buffered request body")]
    ListenerUnsupported,
}
