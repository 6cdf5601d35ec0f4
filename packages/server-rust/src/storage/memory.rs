//! In-memory [`ResourceStorage`] and [`EndpointDirectory`].
//!
//! Backs development deployments and tests. Contents are lost on restart.

use async_trait::async_trait;
use connector_core::{EndpointId, ResourceMetadata, Resolved};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::traits::{EndpointDirectory, ResourceStorage};

/// Concurrent map of stored resources plus the table of moved endpoints.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    resources: DashMap<Uuid, ResourceMetadata>,
    moved: DashMap<EndpointId, EndpointId>,
}

impl MemoryResourceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the resource formerly served at `from` now lives at `to`.
    pub fn mark_moved(&self, from: EndpointId, to: EndpointId) {
        debug!(from = %from, to = %to, "endpoint marked as moved");
        self.moved.insert(from, to);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[async_trait]
impl ResourceStorage for MemoryResourceStore {
    async fn save(&self, metadata: ResourceMetadata) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        self.resources.insert(id, metadata);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ResourceMetadata>> {
        Ok(self.resources.get(&id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl EndpointDirectory for MemoryResourceStore {
    async fn resolve(&self, endpoint: &EndpointId) -> anyhow::Result<Option<Resolved<Uuid>>> {
        if let Some(target) = self.moved.get(endpoint) {
            return Ok(Some(Resolved::Moved(target.value().clone())));
        }
        let id = endpoint.resource_id();
        Ok(self
            .resources
            .contains_key(&id)
            .then_some(Resolved::Found(id)))
    }
}
