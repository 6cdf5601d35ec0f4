//! HTTP middleware for the connector server.
//!
//! Layer ordering follows the outer-to-inner convention: the first layer
//! listed is the outermost (sees the request first, the response last).

use std::io::{self, Read};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::HeaderName;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use connector_core::{BodyError, RequestBody};
use futures_util::TryStreamExt;
use sha2::{Digest, Sha256};
use tokio_util::io::{StreamReader, SyncIoBridge};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::config::NetworkConfig;
use super::shutdown::ShutdownController;
use crate::service::ServiceError;

type HttpLayers = tower::layer::util::Stack<
    RequestBodyLimitLayer,
    tower::layer::util::Stack<
        PropagateRequestIdLayer,
        tower::layer::util::Stack<
            TimeoutLayer,
            tower::layer::util::Stack<
                CorsLayer,
                tower::layer::util::Stack<
                    CompressionLayer,
                    tower::layer::util::Stack<
                        TraceLayer<
                            tower_http::classify::SharedClassifier<
                                tower_http::classify::ServerErrorsAsFailures,
                            >,
                        >,
                        tower::layer::util::Stack<
                            SetRequestIdLayer<MakeRequestUuid>,
                            tower::layer::util::Identity,
                        >,
                    >,
                >,
            >,
        >,
    >,
>;

/// Builds the transport-level middleware stack.
///
/// Outermost to innermost: request id, tracing, gzip compression, CORS,
/// timeout, request id propagation, body size limit.
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .into_inner()
}

/// `"*"` allows any origin; otherwise only the listed origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// The request body as drained by [`buffer_body`], shared by every reader.
#[derive(Debug, Clone)]
pub struct BufferedBody(pub Bytes);

/// Drains the request body once so handlers and verification steps can each
/// read it independently.
///
/// The body is buffered through [`RequestBody`] on the blocking pool. A digest
/// of the buffered bytes is logged, then the handler receives both a rebuilt
/// body and a [`BufferedBody`] extension.
///
/// # Errors
///
/// Returns [`ServiceError::Body`] if the body stream fails or exceeds the
/// configured size limit.
pub async fn buffer_body(request: Request, next: Next) -> Result<Response, ServiceError> {
    let (mut parts, body) = request.into_parts();

    let reader = StreamReader::new(body.into_data_stream().map_err(io::Error::other));
    let source = SyncIoBridge::new(reader);
    let (bytes, digest) = tokio::task::spawn_blocking(move || drain_with_digest(source))
        .await
        .map_err(|e| BodyError::Io(io::Error::other(e)))??;

    debug!(len = bytes.len(), sha256 = %digest, "request body buffered");

    parts.extensions.insert(BufferedBody(bytes.clone()));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

fn drain_with_digest<R: Read>(source: R) -> Result<(Bytes, String), BodyError> {
    let mut body = RequestBody::new(source);
    let mut hasher = Sha256::new();
    io::copy(&mut body.stream()?, &mut hasher)?;
    Ok((body.into_bytes()?, hex::encode(hasher.finalize())))
}

/// Holds an in-flight guard for the duration of each request so shutdown can
/// drain them.
pub async fn track_in_flight(
    State(shutdown): State<Arc<ShutdownController>>,
    request: Request,
    next: Next,
) -> Response {
    let _guard = shutdown.in_flight_guard();
    next.run(request).await
}
