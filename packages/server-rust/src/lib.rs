//! Connector server: message services, resource import and lookup, and the
//! HTTP server they run behind.

pub mod config;
pub mod identity;
pub mod network;
pub mod service;
pub mod storage;
pub mod traits;

pub use config::Cli;
pub use identity::{StaticIdentity, StaticTokenProvider};
pub use network::{ConnectorServices, NetworkModule};
pub use service::{ArtifactMessageService, DescriptionMessageService, MessageService, ServiceError};
pub use storage::MemoryResourceStore;
pub use traits::{EndpointDirectory, MessageTransport, ResourceStorage};
