//! Resource lookup with redirect-on-move, and import of peer resource
//! descriptions.

use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Json};
use connector_core::Resolved;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::AppState;
use crate::network::endpoint::CurrentRequest;
use crate::network::middleware::BufferedBody;
use crate::service::ServiceError;

/// Route under which stored resources are served.
pub const RESOURCES_ROUTE: &str = "/api/resources";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Imported {
    id: Uuid,
    endpoint: String,
}

/// `GET /api/resources/{id}`: the stored metadata, a 308 to the endpoint the
/// resource moved to, or 404.
pub async fn get_resource_handler(
    State(state): State<AppState>,
    current: CurrentRequest,
    Path(id): Path<Uuid>,
) -> Result<Response, ServiceError> {
    let endpoint = current.endpoint(id)?;

    match state
        .directory
        .resolve(&endpoint)
        .await
        .map_err(ServiceError::Storage)?
    {
        Some(Resolved::Found(resource)) => {
            let metadata = state
                .storage
                .get(resource)
                .await
                .map_err(ServiceError::Storage)?
                .ok_or_else(|| ServiceError::NotFound(endpoint.to_uri()))?;
            Ok(Json(metadata).into_response())
        }
        Some(Resolved::Moved(target)) => {
            info!(from = %endpoint, to = %target, "resource moved");
            Ok(Redirect::permanent(&target.to_uri()).into_response())
        }
        None => Err(ServiceError::NotFound(endpoint.to_uri())),
    }
}

/// `POST /api/resources/import/{resourceId}`: imports the peer description
/// of `resourceId` carried in the body.
pub async fn import_resource_handler(
    State(state): State<AppState>,
    current: CurrentRequest,
    Path(resource_id): Path<Uuid>,
    Extension(BufferedBody(body)): Extension<BufferedBody>,
) -> Result<Response, ServiceError> {
    let payload = std::str::from_utf8(&body)
        .map_err(|e| ServiceError::BadRequest(format!("payload is not UTF-8: {e}")))?;

    let id = state.descriptions.save_metadata(payload, resource_id).await?;
    let endpoint = current.endpoint_under(RESOURCES_ROUTE, id).to_uri();

    Ok((
        StatusCode::CREATED,
        [(LOCATION, endpoint.clone())],
        Json(Imported { id, endpoint }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use connector_core::{EndpointId, ResourceMetadata};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::network::{ConnectorServices, NetworkConfig, NetworkModule};
    use crate::service::test_support::header_builder;
    use crate::service::MessageService;
    use crate::storage::MemoryResourceStore;
    use crate::traits::ResourceStorage;

    const HOST: &str = "connector.example";
    const PEER_RESOURCE: &str = "d3b07384-d9a0-4c9b-8f3e-5a1c2b3d4e5f";

    fn router(store: &Arc<MemoryResourceStore>) -> Router {
        let services = ConnectorServices::in_memory(
            MessageService::new(header_builder("token")),
            Arc::clone(store),
        );
        NetworkModule::new(NetworkConfig::default(), services).build_router()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("host", HOST)
            .body(Body::empty())
            .unwrap()
    }

    fn import(resource: &str, payload: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/resources/import/{resource}"))
            .header("host", HOST)
            .header("content-type", "application/ld+json")
            .body(Body::from(payload))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn peer_connector() -> String {
        json!({
            "@type": "ids:BaseConnector",
            "ids:resourceCatalog": [{
                "ids:offeredResource": [{
                    "@type": "ids:Resource",
                    "@id": format!("https://peer.example/api/offers/{PEER_RESOURCE}"),
                    "ids:title": [{"@value": "Sensor data"}],
                    "ids:version": "7"
                }]
            }]
        })
        .to_string()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn import_creates_resource_and_points_at_it() {
        let store = Arc::new(MemoryResourceStore::new());
        let response = router(&store)
            .oneshot(import(PEER_RESOURCE, peer_connector()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[LOCATION].to_str().unwrap().to_string();
        let body = json_body(response).await;

        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        assert_eq!(location, format!("http://{HOST}/api/resources/{id}"));
        assert_eq!(body["endpoint"], location.as_str());
        assert_eq!(
            store.get(id).await.unwrap().unwrap().version.as_deref(),
            Some("7")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn import_of_unknown_resource_is_bad_request() {
        let store = Arc::new(MemoryResourceStore::new());
        let response = router(&store)
            .oneshot(import(&Uuid::new_v4().to_string(), peer_connector()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn import_of_garbage_is_bad_request() {
        let store = Arc::new(MemoryResourceStore::new());
        let response = router(&store)
            .oneshot(import(PEER_RESOURCE, "<html>".to_string()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid resource payload"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stored_resource_is_served() {
        let store = Arc::new(MemoryResourceStore::new());
        let id = store
            .save(ResourceMetadata {
                title: Some("Stored".to_string()),
                ..ResourceMetadata::default()
            })
            .await
            .unwrap();

        let response = router(&store)
            .oneshot(get(&format!("/api/resources/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["title"], "Stored");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn moved_resource_redirects_permanently() {
        let store = Arc::new(MemoryResourceStore::new());
        let id = store.save(ResourceMetadata::default()).await.unwrap();
        let old = EndpointId::new(format!("http://{HOST}/api/resources"), id);
        let new = EndpointId::new("https://archive.example/api/resources", id);
        store.mark_moved(old, new.clone());

        let response = router(&store)
            .oneshot(get(&format!("/api/resources/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[LOCATION], new.to_uri().as_str());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_resource_is_not_found() {
        let store = Arc::new(MemoryResourceStore::new());
        let response = router(&store)
            .oneshot(get(&format!("/api/resources/{}", Uuid::new_v4())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn non_uuid_path_is_rejected() {
        let store = Arc::new(MemoryResourceStore::new());
        let response = router(&store)
            .oneshot(get("/api/resources/latest"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
