//! Message schemas of the connector exchange protocol.
//!
//! Headers and payload documents use JSON-LD with `ids:`-prefixed field names
//! to match the information-model wire format peers expect.

pub mod base;
pub mod builder;
pub mod header;
pub mod infomodel;

pub use base::{autogen_id, IdRef, Issued, SecurityToken, TypedLiteral};

pub use builder::{
    ArtifactRequestParams, ArtifactResponseParams, DescriptionRequestParams,
    DescriptionResponseParams, HeaderBuilder, RequestParams, ResponseParams,
};

pub use header::{
    ArtifactRequestMessage, ArtifactResponseMessage, DescriptionRequestMessage,
    DescriptionResponseMessage, Message, MessageHeader, MessageKind, RequestHeader,
    ResponseHeader,
};

pub use infomodel::{Artifact, Connector, MediaType, Representation, Resource, ResourceCatalog};
