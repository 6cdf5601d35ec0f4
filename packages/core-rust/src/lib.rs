//! Connector core: message headers, peer payload extraction, endpoint ids,
//! and request-body buffering.

pub mod body;
pub mod clock;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod messages;
pub mod traits;
pub mod types;

pub use body::{BodyStream, RequestBody};
pub use clock::{ClockSource, FixedClock, SystemClock};
pub use endpoint::{uuid_from_uri, EndpointId, Resolved};
pub use error::{BodyError, BuildError, EndpointError, InvalidResource};
pub use extract::MetadataExtractor;
pub use messages::{HeaderBuilder, Message, MessageHeader, MessageKind};
pub use traits::{ConnectorIdentity, TokenProvider};
pub use types::{BackendSource, BackendType, ConnectorInfo, ResourceMetadata, ResourceRepresentation};
