//! Resource-description exchange: asking peers for descriptions, answering
//! such requests, and importing returned descriptions into local storage.

use std::sync::Arc;

use anyhow::anyhow;
use connector_core::messages::{DescriptionRequestParams, DescriptionResponseParams};
use connector_core::{uuid_from_uri, BuildError, Message, MessageHeader, MetadataExtractor};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::error::ServiceError;
use super::message::MessageService;
use crate::traits::ResourceStorage;

pub struct DescriptionMessageService {
    messages: MessageService,
    extractor: MetadataExtractor,
    storage: Arc<dyn ResourceStorage>,
}

impl DescriptionMessageService {
    #[must_use]
    pub fn new(messages: MessageService, storage: Arc<dyn ResourceStorage>) -> Self {
        Self {
            messages,
            extractor: MetadataExtractor,
            storage,
        }
    }

    /// # Errors
    ///
    /// Returns [`BuildError`] if a required value is unavailable.
    pub async fn build_request_header(
        &self,
        params: &DescriptionRequestParams,
    ) -> Result<MessageHeader, BuildError> {
        self.messages
            .headers()
            .build_request_header(&params.clone().into())
            .await
    }

    /// # Errors
    ///
    /// Returns [`BuildError`] if a required value or the correlation id is
    /// unavailable.
    pub async fn build_response_header(
        &self,
        params: &DescriptionResponseParams,
    ) -> Result<MessageHeader, BuildError> {
        self.messages
            .headers()
            .build_response_header(&params.clone().into())
            .await
    }

    /// Sends a description request and returns the peer's response.
    ///
    /// # Errors
    ///
    /// See [`MessageService::send`].
    pub async fn request(&self, params: DescriptionRequestParams) -> Result<Message, ServiceError> {
        self.messages.send(params, None).await
    }

    /// Answers a description request with a serialized self-description or
    /// resource document.
    ///
    /// # Errors
    ///
    /// See [`MessageService::respond`].
    pub async fn respond(
        &self,
        params: DescriptionResponseParams,
        payload: String,
    ) -> Result<Message, ServiceError> {
        self.messages.respond(params, payload).await
    }

    /// Extracts the metadata of `expected` from a peer payload and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidResource`] if the payload cannot be
    /// interpreted and [`ServiceError::Storage`] if the store rejects it.
    pub async fn save_metadata(&self, payload: &str, expected: Uuid) -> Result<Uuid, ServiceError> {
        let metadata = self.extractor.extract(payload, expected).inspect_err(|e| {
            warn!(%expected, error = %e, "peer payload rejected");
        })?;

        let id = self
            .storage
            .save(metadata)
            .await
            .map_err(ServiceError::Storage)?;
        info!(%expected, %id, "resource metadata imported");
        Ok(id)
    }

    /// Requests the description of `element` from `recipient` and imports the
    /// returned resource.
    ///
    /// # Errors
    ///
    /// Fails if `element` carries no UUID, the exchange fails, the response
    /// has no payload, or importing the payload fails.
    pub async fn fetch_resource(&self, recipient: Url, element: Url) -> Result<Uuid, ServiceError> {
        let expected = uuid_from_uri(element.as_str())?;
        let response = self
            .request(DescriptionRequestParams::new(recipient, Some(element)))
            .await?;
        let payload = response.payload.ok_or_else(|| {
            ServiceError::Transport(anyhow!("description response carried no payload"))
        })?;
        self.save_metadata(&payload, expected).await
    }
}
