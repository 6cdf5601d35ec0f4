//! Service-level error type and its HTTP mapping.

use axum::response::{IntoResponse, Response};
use axum::Json;
use connector_core::{BodyError, BuildError, EndpointError, InvalidResource};
use http::StatusCode;
use serde_json::json;
use tracing::{error, warn};

/// Errors surfaced by the message services and HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("message header could not be built: {0}")]
    Build(#[from] BuildError),
    #[error("invalid resource payload: {0}")]
    InvalidResource(#[from] InvalidResource),
    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),
    #[error("transport failure: {0}")]
    Transport(#[source] anyhow::Error),
    #[error("endpoint resolution failed: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("request body could not be read: {0}")]
    Body(#[from] BodyError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
}

impl ServiceError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Build(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Transport(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidResource(_) | Self::Endpoint(_) | Self::Body(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::InvalidResource(e) => {
                warn!(error = %e, payload_len = e.payload().len(), "rejected peer payload");
            }
            _ if status.is_server_error() => error!(error = %self, "request failed"),
            _ => warn!(error = %self, "request rejected"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
