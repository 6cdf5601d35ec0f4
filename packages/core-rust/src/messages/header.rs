//! Request and response headers for the two message families this connector
//! exchanges: artifact retrieval and resource-description lookup.
//!
//! Headers serialize as JSON-LD objects tagged by `@type`. Common fields are
//! flattened into each message so the wire shape is a single flat object.

use serde::{Deserialize, Serialize};
use url::Url;

use super::base::{IdRef, Issued, SecurityToken};

/// The four message kinds of the exchange protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    ArtifactRequest,
    ArtifactResponse,
    DescriptionRequest,
    DescriptionResponse,
}

impl MessageKind {
    /// The `@type` tag written on the wire.
    #[must_use]
    pub fn type_tag(self) -> &'static str {
        match self {
            Self::ArtifactRequest => "ids:ArtifactRequestMessage",
            Self::ArtifactResponse => "ids:ArtifactResponseMessage",
            Self::DescriptionRequest => "ids:DescriptionRequestMessage",
            Self::DescriptionResponse => "ids:DescriptionResponseMessage",
        }
    }

    /// Path segment under which message ids of this kind are minted.
    #[must_use]
    pub fn autogen_segment(self) -> &'static str {
        match self {
            Self::ArtifactRequest => "artifactRequestMessage",
            Self::ArtifactResponse => "artifactResponseMessage",
            Self::DescriptionRequest => "descriptionRequestMessage",
            Self::DescriptionResponse => "descriptionResponseMessage",
        }
    }
}

// ---------------------------------------------------------------------------
// Common header fields
// ---------------------------------------------------------------------------

/// Fields stamped on every request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(rename = "ids:issued")]
    pub issued: Issued,
    #[serde(rename = "ids:modelVersion")]
    pub model_version: String,
    #[serde(rename = "ids:issuerConnector")]
    pub issuer_connector: IdRef,
    #[serde(rename = "ids:senderAgent")]
    pub sender_agent: IdRef,
    #[serde(rename = "ids:securityToken")]
    pub security_token: SecurityToken,
    /// Always a singleton: exchanges are point-to-point.
    #[serde(rename = "ids:recipientConnector")]
    pub recipient_connector: Vec<IdRef>,
}

/// Fields stamped on every response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(rename = "ids:securityToken")]
    pub security_token: SecurityToken,
    /// Id of the message this response answers.
    #[serde(rename = "ids:correlationMessage")]
    pub correlation_message: IdRef,
    #[serde(rename = "ids:issued")]
    pub issued: Issued,
    #[serde(rename = "ids:issuerConnector")]
    pub issuer_connector: IdRef,
    #[serde(rename = "ids:modelVersion")]
    pub model_version: String,
    #[serde(rename = "ids:senderAgent")]
    pub sender_agent: IdRef,
    #[serde(rename = "ids:recipientConnector")]
    pub recipient_connector: Vec<IdRef>,
}

// ---------------------------------------------------------------------------
// Kind-specific messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRequestMessage {
    #[serde(flatten)]
    pub header: RequestHeader,
    #[serde(rename = "ids:requestedArtifact")]
    pub requested_artifact: IdRef,
    #[serde(rename = "ids:transferContract")]
    pub transfer_contract: IdRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactResponseMessage {
    #[serde(flatten)]
    pub header: ResponseHeader,
    #[serde(
        rename = "ids:transferContract",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub transfer_contract: Option<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionRequestMessage {
    #[serde(flatten)]
    pub header: RequestHeader,
    /// Absent means "describe yourself".
    #[serde(
        rename = "ids:requestedElement",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub requested_element: Option<IdRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionResponseMessage {
    #[serde(flatten)]
    pub header: ResponseHeader,
}

/// A header of any supported kind, tagged by `@type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@type")]
pub enum MessageHeader {
    #[serde(rename = "ids:ArtifactRequestMessage")]
    ArtifactRequest(ArtifactRequestMessage),
    #[serde(rename = "ids:ArtifactResponseMessage")]
    ArtifactResponse(ArtifactResponseMessage),
    #[serde(rename = "ids:DescriptionRequestMessage")]
    DescriptionRequest(DescriptionRequestMessage),
    #[serde(rename = "ids:DescriptionResponseMessage")]
    DescriptionResponse(DescriptionResponseMessage),
}

impl MessageHeader {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::ArtifactRequest(_) => MessageKind::ArtifactRequest,
            Self::ArtifactResponse(_) => MessageKind::ArtifactResponse,
            Self::DescriptionRequest(_) => MessageKind::DescriptionRequest,
            Self::DescriptionResponse(_) => MessageKind::DescriptionResponse,
        }
    }

    /// The message's own `@id`, used as correlation id by the answering side.
    #[must_use]
    pub fn id(&self) -> &Url {
        match self {
            Self::ArtifactRequest(m) => &m.header.id,
            Self::DescriptionRequest(m) => &m.header.id,
            Self::ArtifactResponse(m) => &m.header.id,
            Self::DescriptionResponse(m) => &m.header.id,
        }
    }

    #[must_use]
    pub fn issuer_connector(&self) -> &Url {
        match self {
            Self::ArtifactRequest(m) => &m.header.issuer_connector.id,
            Self::DescriptionRequest(m) => &m.header.issuer_connector.id,
            Self::ArtifactResponse(m) => &m.header.issuer_connector.id,
            Self::DescriptionResponse(m) => &m.header.issuer_connector.id,
        }
    }

    #[must_use]
    pub fn recipients(&self) -> &[IdRef] {
        match self {
            Self::ArtifactRequest(m) => &m.header.recipient_connector,
            Self::DescriptionRequest(m) => &m.header.recipient_connector,
            Self::ArtifactResponse(m) => &m.header.recipient_connector,
            Self::DescriptionResponse(m) => &m.header.recipient_connector,
        }
    }

    #[must_use]
    pub fn security_token(&self) -> &SecurityToken {
        match self {
            Self::ArtifactRequest(m) => &m.header.security_token,
            Self::DescriptionRequest(m) => &m.header.security_token,
            Self::ArtifactResponse(m) => &m.header.security_token,
            Self::DescriptionResponse(m) => &m.header.security_token,
        }
    }

    /// Correlation id for responses, `None` for requests.
    #[must_use]
    pub fn correlation_message(&self) -> Option<&Url> {
        match self {
            Self::ArtifactResponse(m) => Some(&m.header.correlation_message.id),
            Self::DescriptionResponse(m) => Some(&m.header.correlation_message.id),
            Self::ArtifactRequest(_) | Self::DescriptionRequest(_) => None,
        }
    }
}

/// A header plus its (later attached) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub payload: Option<String>,
}

impl Message {
    #[must_use]
    pub fn new(header: MessageHeader) -> Self {
        Self {
            header,
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }
}
