//! Reconstruction of the current request URL and endpoint resolution
//! against it.

use axum::extract::FromRequestParts;
use connector_core::{EndpointError, EndpointId};
use http::header::HOST;
use http::request::Parts;
use url::Url;
use uuid::Uuid;

use super::handlers::AppState;
use crate::service::ServiceError;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The externally visible URL of the request being handled.
#[derive(Debug, Clone)]
pub struct CurrentRequest {
    base: String,
    url: Url,
}

impl CurrentRequest {
    /// Rebuilds the request URL from `public_base` when configured, otherwise
    /// from the `Host` and `X-Forwarded-Proto` headers.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BadRequest`] if the headers do not form a URL.
    pub fn from_parts(parts: &Parts, public_base: Option<&Url>) -> Result<Self, ServiceError> {
        let base = if let Some(base) = public_base {
            base.as_str().trim_end_matches('/').to_string()
        } else {
            let scheme = header(parts, FORWARDED_PROTO).unwrap_or("http");
            let host = header(parts, HOST.as_str())
                .or_else(|| parts.uri.authority().map(http::uri::Authority::as_str))
                .unwrap_or("localhost");
            format!("{scheme}://{host}")
        };

        let url = Url::parse(&format!("{base}{}", parts.uri.path())).map_err(|e| {
            ServiceError::BadRequest(format!("request URL cannot be reconstructed: {e}"))
        })?;
        Ok(Self { base, url })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The endpoint addressed by this request for `resource_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NoUuid`] if the path does not contain `resource_id`.
    pub fn endpoint(&self, resource_id: Uuid) -> Result<EndpointId, EndpointError> {
        EndpointId::for_current(self.url.as_str(), resource_id)
    }

    /// The request URL with the trailing `/{resource_id}` removed.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NoUuid`] if the path does not contain `resource_id`.
    pub fn base_path(&self, resource_id: Uuid) -> Result<String, EndpointError> {
        self.endpoint(resource_id).map(|e| e.base_path().to_string())
    }

    /// Endpoint of `resource_id` under `route`, on the same host as this request.
    #[must_use]
    pub fn endpoint_under(&self, route: &str, resource_id: Uuid) -> EndpointId {
        EndpointId::new(format!("{}{route}", self.base), resource_id)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

impl FromRequestParts<AppState> for CurrentRequest {
    type Rejection = ServiceError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts, state.config.public_base_url.as_ref())
    }
}
