//! Outbound header construction.
//!
//! Parameters for each message kind are gathered into an immutable struct up
//! front and passed to a pure build call, so there is no "set, then build"
//! ordering to get wrong. Fields are `Option` because they are often lifted
//! from inbound messages; a missing required value is reported as
//! [`BuildError::MissingParameter`] instead of producing a header the peer
//! would reject.

use std::sync::Arc;

use url::Url;

use super::base::{autogen_id, IdRef, Issued, SecurityToken};
use super::header::{
    ArtifactRequestMessage, ArtifactResponseMessage, DescriptionRequestMessage,
    DescriptionResponseMessage, MessageHeader, MessageKind, RequestHeader, ResponseHeader,
};
use crate::clock::{ClockSource, SystemClock};
use crate::error::BuildError;
use crate::traits::{ConnectorIdentity, TokenProvider};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactRequestParams {
    pub recipient: Option<Url>,
    pub artifact: Option<Url>,
    pub transfer_contract: Option<Url>,
}

impl ArtifactRequestParams {
    #[must_use]
    pub fn new(recipient: Url, artifact: Url, transfer_contract: Url) -> Self {
        Self {
            recipient: Some(recipient),
            artifact: Some(artifact),
            transfer_contract: Some(transfer_contract),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactResponseParams {
    pub recipient: Option<Url>,
    pub transfer_contract: Option<Url>,
    pub correlation_message: Option<Url>,
}

impl ArtifactResponseParams {
    #[must_use]
    pub fn new(recipient: Url, transfer_contract: Option<Url>, correlation_message: Url) -> Self {
        Self {
            recipient: Some(recipient),
            transfer_contract,
            correlation_message: Some(correlation_message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescriptionRequestParams {
    pub recipient: Option<Url>,
    /// `None` requests the peer's self-description.
    pub requested_element: Option<Url>,
}

impl DescriptionRequestParams {
    #[must_use]
    pub fn new(recipient: Url, requested_element: Option<Url>) -> Self {
        Self {
            recipient: Some(recipient),
            requested_element,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescriptionResponseParams {
    pub recipient: Option<Url>,
    pub correlation_message: Option<Url>,
}

impl DescriptionResponseParams {
    #[must_use]
    pub fn new(recipient: Url, correlation_message: Url) -> Self {
        Self {
            recipient: Some(recipient),
            correlation_message: Some(correlation_message),
        }
    }
}

/// Parameters of an outbound request, one variant per request kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestParams {
    Artifact(ArtifactRequestParams),
    Description(DescriptionRequestParams),
}

impl RequestParams {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Artifact(_) => MessageKind::ArtifactRequest,
            Self::Description(_) => MessageKind::DescriptionRequest,
        }
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&Url> {
        match self {
            Self::Artifact(p) => p.recipient.as_ref(),
            Self::Description(p) => p.recipient.as_ref(),
        }
    }
}

impl From<ArtifactRequestParams> for RequestParams {
    fn from(params: ArtifactRequestParams) -> Self {
        Self::Artifact(params)
    }
}

impl From<DescriptionRequestParams> for RequestParams {
    fn from(params: DescriptionRequestParams) -> Self {
        Self::Description(params)
    }
}

/// Parameters of an outbound response, one variant per response kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseParams {
    Artifact(ArtifactResponseParams),
    Description(DescriptionResponseParams),
}

impl ResponseParams {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Artifact(_) => MessageKind::ArtifactResponse,
            Self::Description(_) => MessageKind::DescriptionResponse,
        }
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&Url> {
        match self {
            Self::Artifact(p) => p.recipient.as_ref(),
            Self::Description(p) => p.recipient.as_ref(),
        }
    }

    fn correlation_message(&self) -> Option<&Url> {
        match self {
            Self::Artifact(p) => p.correlation_message.as_ref(),
            Self::Description(p) => p.correlation_message.as_ref(),
        }
    }
}

impl From<ArtifactResponseParams> for ResponseParams {
    fn from(params: ArtifactResponseParams) -> Self {
        Self::Artifact(params)
    }
}

impl From<DescriptionResponseParams> for ResponseParams {
    fn from(params: DescriptionResponseParams) -> Self {
        Self::Description(params)
    }
}

fn require<'a>(value: Option<&'a Url>, field: &'static str) -> Result<&'a Url, BuildError> {
    value.ok_or(BuildError::MissingParameter { field })
}

// ---------------------------------------------------------------------------
// HeaderBuilder
// ---------------------------------------------------------------------------

/// Builds request and response headers for every message kind.
///
/// Reads the connector identity and obtains a fresh security token per
/// header. Token failures are returned to the caller, never retried.
#[derive(Clone)]
pub struct HeaderBuilder {
    identity: Arc<dyn ConnectorIdentity>,
    tokens: Arc<dyn TokenProvider>,
    clock: Arc<dyn ClockSource>,
}

impl HeaderBuilder {
    #[must_use]
    pub fn new(identity: Arc<dyn ConnectorIdentity>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            identity,
            tokens,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for `ids:issued`.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the header of an outbound request.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if a required parameter is missing, the
    /// connector identity is unavailable, or no token could be obtained.
    pub async fn build_request_header(
        &self,
        params: &RequestParams,
    ) -> Result<MessageHeader, BuildError> {
        let recipient = require(params.recipient(), "recipientConnector")?;

        match params {
            RequestParams::Artifact(p) => {
                let artifact = require(p.artifact.as_ref(), "requestedArtifact")?;
                let contract = require(p.transfer_contract.as_ref(), "transferContract")?;
                let header = self
                    .request_header(MessageKind::ArtifactRequest, recipient)
                    .await?;
                Ok(MessageHeader::ArtifactRequest(ArtifactRequestMessage {
                    header,
                    requested_artifact: IdRef::new(artifact.clone()),
                    transfer_contract: IdRef::new(contract.clone()),
                }))
            }
            RequestParams::Description(p) => {
                let header = self
                    .request_header(MessageKind::DescriptionRequest, recipient)
                    .await?;
                Ok(MessageHeader::DescriptionRequest(DescriptionRequestMessage {
                    header,
                    requested_element: p.requested_element.clone().map(IdRef::new),
                }))
            }
        }
    }

    /// Builds the header of an outbound response.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the recipient or correlation id is missing,
    /// the connector identity is unavailable, or no token could be obtained.
    pub async fn build_response_header(
        &self,
        params: &ResponseParams,
    ) -> Result<MessageHeader, BuildError> {
        let recipient = require(params.recipient(), "recipientConnector")?;
        let correlation = require(params.correlation_message(), "correlationMessage")?;
        let header = self
            .response_header(params.kind(), recipient, correlation)
            .await?;

        Ok(match params {
            ResponseParams::Artifact(p) => {
                MessageHeader::ArtifactResponse(ArtifactResponseMessage {
                    header,
                    transfer_contract: p.transfer_contract.clone().map(IdRef::new),
                })
            }
            ResponseParams::Description(_) => {
                MessageHeader::DescriptionResponse(DescriptionResponseMessage { header })
            }
        })
    }

    async fn request_header(
        &self,
        kind: MessageKind,
        recipient: &Url,
    ) -> Result<RequestHeader, BuildError> {
        let connector = self.identity.connector().ok_or(BuildError::MissingIdentity)?;
        let security_token = self.security_token().await?;

        Ok(RequestHeader {
            id: autogen_id(kind.autogen_segment()),
            issued: Issued::at(self.clock.now()),
            model_version: connector.outbound_model_version,
            issuer_connector: IdRef::new(connector.id.clone()),
            sender_agent: IdRef::new(connector.id),
            security_token,
            recipient_connector: vec![IdRef::new(recipient.clone())],
        })
    }

    async fn response_header(
        &self,
        kind: MessageKind,
        recipient: &Url,
        correlation: &Url,
    ) -> Result<ResponseHeader, BuildError> {
        let connector = self.identity.connector().ok_or(BuildError::MissingIdentity)?;
        let security_token = self.security_token().await?;

        Ok(ResponseHeader {
            id: autogen_id(kind.autogen_segment()),
            security_token,
            correlation_message: IdRef::new(correlation.clone()),
            issued: Issued::at(self.clock.now()),
            issuer_connector: IdRef::new(connector.id.clone()),
            model_version: connector.outbound_model_version,
            sender_agent: IdRef::new(connector.id),
            recipient_connector: vec![IdRef::new(recipient.clone())],
        })
    }

    async fn security_token(&self) -> Result<SecurityToken, BuildError> {
        let token = self
            .tokens
            .dynamic_attribute_token()
            .await
            .map_err(BuildError::Token)?;
        if token.is_empty() {
            return Err(BuildError::Token(anyhow::anyhow!(
                "token provider returned an empty token"
            )));
        }
        Ok(SecurityToken::jwt(token))
    }
}
