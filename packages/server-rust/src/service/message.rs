//! Header building plus hand-off to the transport.

use std::sync::Arc;

use anyhow::anyhow;
use connector_core::messages::{RequestParams, ResponseParams};
use connector_core::{HeaderBuilder, Message};
use tracing::{debug, info};
use url::Url;

use super::error::ServiceError;
use crate::traits::MessageTransport;

/// Composes the [`HeaderBuilder`] with an optional [`MessageTransport`].
///
/// Without a transport, responses can still be composed but `send` fails.
#[derive(Clone)]
pub struct MessageService {
    headers: HeaderBuilder,
    transport: Option<Arc<dyn MessageTransport>>,
}

impl MessageService {
    #[must_use]
    pub fn new(headers: HeaderBuilder) -> Self {
        Self {
            headers,
            transport: None,
        }
    }

    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn MessageTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderBuilder {
        &self.headers
    }

    /// Builds a request, attaches `payload`, and sends it to the recipient.
    /// The peer's response is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Build`] if the header cannot be built and
    /// [`ServiceError::Transport`] if no transport is configured or the
    /// exchange fails.
    pub async fn send(
        &self,
        params: impl Into<RequestParams>,
        payload: Option<String>,
    ) -> Result<Message, ServiceError> {
        let params = params.into();
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| ServiceError::Transport(anyhow!("no message transport configured")))?;

        let header = self.headers.build_request_header(&params).await?;
        let mut message = Message::new(header);
        if let Some(payload) = payload {
            message = message.with_payload(payload);
        }

        info!(
            kind = message.header.kind().type_tag(),
            id = %message.header.id(),
            recipient = params.recipient().map_or("", Url::as_str),
            "sending message"
        );
        let response = transport.send(message).await.map_err(ServiceError::Transport)?;
        debug!(
            kind = response.header.kind().type_tag(),
            correlation = response.header.correlation_message().map_or("", Url::as_str),
            "received response"
        );
        Ok(response)
    }

    /// Builds a response carrying `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Build`] if the header cannot be built.
    pub async fn respond(
        &self,
        params: impl Into<ResponseParams>,
        payload: String,
    ) -> Result<Message, ServiceError> {
        let header = self.headers.build_response_header(&params.into()).await?;
        Ok(Message::new(header).with_payload(payload))
    }
}
