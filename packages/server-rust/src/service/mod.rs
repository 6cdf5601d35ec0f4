//! Message services composing the protocol core with storage and transport.

pub mod artifact;
pub mod description;
pub mod error;
pub mod message;

pub use artifact::ArtifactMessageService;
pub use description::DescriptionMessageService;
pub use error::ServiceError;
pub use message::MessageService;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use anyhow::bail;
    use async_trait::async_trait;
    use connector_core::messages::{
        ArtifactResponseParams, DescriptionResponseParams, ResponseParams,
    };
    use connector_core::{HeaderBuilder, Message, MessageKind, ResourceMetadata};
    use url::Url;
    use uuid::Uuid;

    use crate::identity::{StaticIdentity, StaticTokenProvider};
    use crate::network::ConnectorConfig;
    use crate::traits::{MessageTransport, ResourceStorage};

    /// The peer every test exchange is addressed to.
    pub fn connector_url() -> Url {
        Url::parse("https://peer.example/connector").unwrap()
    }

    pub fn header_builder(token: &str) -> HeaderBuilder {
        let config = ConnectorConfig::default();
        HeaderBuilder::new(
            Arc::new(StaticIdentity::from(&config)),
            Arc::new(StaticTokenProvider::new(token)),
        )
    }

    /// Records outbound messages and answers each with a matching response.
    pub struct RecordingTransport {
        sent: Mutex<Vec<Message>>,
        payload: Option<String>,
        fail: bool,
    }

    impl RecordingTransport {
        pub fn answering(payload: Option<String>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                payload,
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::answering(None)
            }
        }

        pub fn sent(&self) -> Vec<Message> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageTransport for RecordingTransport {
        async fn send(&self, message: Message) -> anyhow::Result<Message> {
            if self.fail {
                bail!("peer unreachable");
            }
            let recipient = message.header.issuer_connector().clone();
            let correlation = message.header.id().clone();
            let params: ResponseParams = match message.header.kind() {
                MessageKind::ArtifactRequest => {
                    ArtifactResponseParams::new(recipient, None, correlation).into()
                }
                _ => DescriptionResponseParams::new(recipient, correlation).into(),
            };
            let header = header_builder("peer-token")
                .build_response_header(&params)
                .await?;

            self.sent.lock().unwrap().push(message);
            let response = Message::new(header);
            Ok(match &self.payload {
                Some(payload) => response.with_payload(payload.clone()),
                None => response,
            })
        }
    }

    struct FailingStorage;

    #[async_trait]
    impl ResourceStorage for FailingStorage {
        async fn save(&self, _metadata: ResourceMetadata) -> anyhow::Result<Uuid> {
            bail!("storage offline")
        }

        async fn get(&self, _id: Uuid) -> anyhow::Result<Option<ResourceMetadata>> {
            bail!("storage offline")
        }
    }

    pub fn failing_storage() -> Arc<dyn ResourceStorage> {
        Arc::new(FailingStorage)
    }
}
