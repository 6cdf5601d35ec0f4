//! Artifact retrieval exchange.

use connector_core::messages::{ArtifactRequestParams, ArtifactResponseParams};
use connector_core::{BuildError, Message, MessageHeader};

use super::error::ServiceError;
use super::message::MessageService;

pub struct ArtifactMessageService {
    messages: MessageService,
}

impl ArtifactMessageService {
    #[must_use]
    pub fn new(messages: MessageService) -> Self {
        Self { messages }
    }

    /// # Errors
    ///
    /// Returns [`BuildError::MissingParameter`] if the artifact or transfer
    /// contract is unset, or another [`BuildError`] if identity or token are
    /// unavailable.
    pub async fn build_request_header(
        &self,
        params: &ArtifactRequestParams,
    ) -> Result<MessageHeader, BuildError> {
        self.messages
            .headers()
            .build_request_header(&params.clone().into())
            .await
    }

    /// # Errors
    ///
    /// Returns [`BuildError`] if the correlation id, identity, or token is
    /// unavailable.
    pub async fn build_response_header(
        &self,
        params: &ArtifactResponseParams,
    ) -> Result<MessageHeader, BuildError> {
        self.messages
            .headers()
            .build_response_header(&params.clone().into())
            .await
    }

    /// Requests an artifact under a transfer contract. The returned message
    /// carries the artifact content as payload.
    ///
    /// # Errors
    ///
    /// See [`MessageService::send`].
    pub async fn request(&self, params: ArtifactRequestParams) -> Result<Message, ServiceError> {
        self.messages.send(params, None).await
    }

    /// Answers an artifact request with the artifact content.
    ///
    /// # Errors
    ///
    /// See [`MessageService::respond`].
    pub async fn respond(
        &self,
        params: ArtifactResponseParams,
        payload: String,
    ) -> Result<Message, ServiceError> {
        self.messages.respond(params, payload).await
    }
}
