//! Mapping of untrusted peer payloads into [`ResourceMetadata`].
//!
//! A peer answers a description request either with a bare resource or, for
//! self-description requests, with its whole connector document. The shape is
//! detected explicitly from the parsed JSON tree, so a corrupt payload is
//! rejected as such instead of being retried as the other shape.
//!
//! Extraction is all-or-nothing: any malformed nested structure rejects the
//! whole payload.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::endpoint::{find_uuids, uuid_from_uri};
use crate::error::InvalidResource;
use crate::messages::infomodel::{Connector, Representation, Resource};
use crate::types::{BackendSource, ResourceMetadata, ResourceRepresentation};

const RESOURCE_TYPES: &[&str] = &["Resource", "DataResource"];
const CONNECTOR_TYPES: &[&str] = &["BaseConnector", "TrustedConnector", "Connector"];
const TYPE_PREFIXES: &[&str] = &["ids:", "https://w3id.org/idsa/core/"];

/// Which document a payload turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Resource,
    Connector,
    Unknown,
}

impl Shape {
    fn of(document: &Value) -> Self {
        let Some(object) = document.as_object() else {
            return Self::Unknown;
        };

        let types: Vec<&str> = match object.get("@type") {
            Some(Value::String(t)) => vec![t.as_str()],
            Some(Value::Array(ts)) => ts.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        let local_names: Vec<&str> = types.iter().map(|t| local_name(t)).collect();

        if local_names.iter().any(|t| RESOURCE_TYPES.contains(t)) {
            Self::Resource
        } else if local_names.iter().any(|t| CONNECTOR_TYPES.contains(t)) {
            Self::Connector
        } else if types.is_empty() && object.contains_key("ids:resourceCatalog") {
            Self::Connector
        } else {
            Self::Unknown
        }
    }
}

fn local_name(type_iri: &str) -> &str {
    TYPE_PREFIXES
        .iter()
        .find_map(|prefix| type_iri.strip_prefix(prefix))
        .unwrap_or(type_iri)
}

/// Parses peer payloads into resource metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extracts the metadata of the resource `expected` from `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidResource`] if the payload is not JSON, is neither a
    /// resource nor a connector document, does not contain `expected`, or has
    /// a malformed nested structure.
    pub fn extract(
        &self,
        payload: &str,
        expected: Uuid,
    ) -> Result<ResourceMetadata, InvalidResource> {
        let document: Value =
            serde_json::from_str(payload).map_err(|source| InvalidResource::Unparseable {
                payload: payload.to_string(),
                source,
            })?;

        let resource = match Shape::of(&document) {
            Shape::Resource => document,
            Shape::Connector => {
                debug!(%expected, "payload is a connector document, scanning its catalog");
                find_in_catalog(document, expected, payload)?
            }
            Shape::Unknown => {
                return Err(InvalidResource::UnknownShape {
                    payload: payload.to_string(),
                })
            }
        };

        let resource: Resource =
            serde_json::from_value(resource).map_err(|e| malformed(payload, e.to_string()))?;
        to_metadata(&resource).map_err(|reason| malformed(payload, reason))
    }
}

fn malformed(payload: &str, reason: String) -> InvalidResource {
    InvalidResource::Malformed {
        payload: payload.to_string(),
        reason,
    }
}

/// Linear scan of the first catalog's offered resources for `expected`.
fn find_in_catalog(
    document: Value,
    expected: Uuid,
    payload: &str,
) -> Result<Value, InvalidResource> {
    let connector: Connector =
        serde_json::from_value(document).map_err(|e| malformed(payload, e.to_string()))?;

    connector
        .resource_catalog
        .and_then(|catalogs| catalogs.into_iter().next())
        .and_then(|catalog| catalog.offered_resource)
        .and_then(|offered| offered.into_iter().find(|r| resource_id(r) == Some(expected)))
        .ok_or_else(|| InvalidResource::NotInCatalog {
            payload: payload.to_string(),
            expected: expected.to_string(),
        })
}

/// The resource UUID addressed by an offered resource's `@id`: the last one
/// embedded, so nested ids like `.../catalogs/{c}/resources/{r}` yield `r`.
fn resource_id(resource: &Value) -> Option<Uuid> {
    let id = resource.get("@id")?.as_str()?;
    find_uuids(id).pop()
}

fn to_metadata(resource: &Resource) -> Result<ResourceMetadata, String> {
    let mut metadata = ResourceMetadata::default();

    if let Some(keywords) = &resource.keyword {
        metadata.keywords = Some(keywords.iter().map(|k| k.value.clone()).collect());
    }

    if let Some(representations) = &resource.representation {
        let mut mapped = HashMap::with_capacity(representations.len());
        for representation in representations {
            let mapped_representation = to_representation(representation)?;
            mapped.insert(mapped_representation.id, mapped_representation);
        }
        metadata.representations = Some(mapped);
    }

    metadata.title = resource
        .title
        .as_ref()
        .and_then(|t| t.first())
        .map(|t| t.value.clone());
    metadata.description = resource
        .description
        .as_ref()
        .and_then(|d| d.first())
        .map(|d| d.value.clone());

    if let Some(offer) = resource.contract_offer.as_ref().and_then(|o| o.first()) {
        metadata.policy = Some(serde_json::to_string(offer).map_err(|e| e.to_string())?);
    }

    metadata.owner = resource.publisher.as_ref().map(|p| p.id.clone());
    metadata.license = resource.standard_license.as_ref().map(|l| l.id.clone());
    metadata.version.clone_from(&resource.version);
    metadata.remote_id.clone_from(&resource.id);

    Ok(metadata)
}

/// Only the first artifact instance is inspected for size, name, and type.
fn to_representation(representation: &Representation) -> Result<ResourceRepresentation, String> {
    let id = uuid_from_uri(representation.id.as_str()).map_err(|e| e.to_string())?;

    let mut mapped = ResourceRepresentation {
        id,
        media_type: None,
        byte_size: 0,
        file_name: None,
        source: BackendSource::local(),
    };

    if let Some(artifact) = representation.instance.as_ref().and_then(|i| i.first()) {
        mapped.byte_size = artifact.byte_size.unwrap_or(0);
        mapped.file_name.clone_from(&artifact.file_name);
        mapped.media_type = representation
            .media_type
            .as_ref()
            .and_then(|m| m.filename_extension.clone());
    }

    Ok(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RESOURCE_A: &str = "11111111-1111-4111-8111-111111111111";
    const RESOURCE_B: &str = "22222222-2222-4222-8222-222222222222";
    const REPRESENTATION: &str = "33333333-3333-4333-8333-333333333333";

    fn uuid(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    fn resource(id: &str, title: &str) -> Value {
        json!({
            "@type": "ids:Resource",
            "@id": format!("https://peer.example/api/offers/{id}"),
            "ids:title": [{"@value": title, "@language": "en"}, {"@value": "ignored"}],
            "ids:description": [{"@value": "hourly readings", "@language": "en"}],
            "ids:keyword": [{"@value": "weather"}, {"@value": "temperature"}],
            "ids:publisher": {"@id": "https://publisher.example"},
            "ids:standardLicense": {"@id": "https://www.apache.org/licenses/LICENSE-2.0"},
            "ids:version": "1.2",
            "ids:contractOffer": [{
                "@type": "ids:ContractOffer",
                "@id": "https://peer.example/api/contracts/1",
                "ids:permission": [{"@type": "ids:Permission"}]
            }],
            "ids:representation": [{
                "@type": "ids:Representation",
                "@id": format!("https://peer.example/api/representations/{REPRESENTATION}"),
                "ids:mediaType": {"@type": "ids:IANAMediaType", "ids:filenameExtension": "json"},
                "ids:instance": [
                    {"@type": "ids:Artifact", "ids:byteSize": 2048, "ids:fileName": "readings.json"},
                    {"@type": "ids:Artifact", "ids:byteSize": 1, "ids:fileName": "second.json"}
                ]
            }]
        })
    }

    fn connector(resources: Vec<Value>) -> Value {
        json!({
            "@type": "ids:BaseConnector",
            "@id": "https://peer.example/connector",
            "ids:resourceCatalog": [
                {"@type": "ids:ResourceCatalog", "ids:offeredResource": resources},
                {"@type": "ids:ResourceCatalog", "ids:offeredResource": []}
            ]
        })
    }

    fn extract(payload: &Value, expected: &str) -> Result<ResourceMetadata, InvalidResource> {
        MetadataExtractor.extract(&payload.to_string(), uuid(expected))
    }

    #[test]
    fn bare_resource_maps_every_field() {
        let metadata = extract(&resource(RESOURCE_A, "Weather"), RESOURCE_A).unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Weather"));
        assert_eq!(metadata.description.as_deref(), Some("hourly readings"));
        assert_eq!(
            metadata.keywords,
            Some(vec!["weather".to_string(), "temperature".to_string()])
        );
        assert_eq!(
            metadata.owner.as_ref().map(url::Url::as_str),
            Some("https://publisher.example/")
        );
        assert_eq!(
            metadata.license.as_ref().map(url::Url::as_str),
            Some("https://www.apache.org/licenses/LICENSE-2.0")
        );
        assert_eq!(metadata.version.as_deref(), Some("1.2"));

        let policy: Value = serde_json::from_str(metadata.policy.as_deref().unwrap()).unwrap();
        assert_eq!(policy["@type"], "ids:ContractOffer");

        let representations = metadata.representations.unwrap();
        let representation = &representations[&uuid(REPRESENTATION)];
        assert_eq!(representation.byte_size, 2048);
        assert_eq!(representation.file_name.as_deref(), Some("readings.json"));
        assert_eq!(representation.media_type.as_deref(), Some("json"));
        assert_eq!(representation.source, BackendSource::local());
    }

    #[test]
    fn connector_document_yields_same_metadata_as_bare_resource() {
        let bare = extract(&resource(RESOURCE_A, "Weather"), RESOURCE_A).unwrap();
        let wrapped = extract(&connector(vec![resource(RESOURCE_A, "Weather")]), RESOURCE_A).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn connector_scan_selects_matching_resource() {
        let payload = connector(vec![resource(RESOURCE_A, "First"), resource(RESOURCE_B, "Second")]);
        let metadata = extract(&payload, RESOURCE_B).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Second"));
    }

    #[test]
    fn connector_without_expected_resource_is_rejected() {
        let payload = connector(vec![resource(RESOURCE_A, "First")]);
        let err = extract(&payload, RESOURCE_B).unwrap_err();
        assert!(matches!(err, InvalidResource::NotInCatalog { .. }));
        assert_eq!(err.payload(), payload.to_string());
    }

    fn offered_at(id: String, title: &str) -> Value {
        let mut offered = resource(RESOURCE_A, title);
        offered["@id"] = Value::String(id);
        offered
    }

    #[test]
    fn nested_resource_id_matches_on_final_uuid() {
        let catalog = "99999999-9999-4999-8999-999999999999";
        let payload = connector(vec![offered_at(
            format!("https://peer.example/api/catalogs/{catalog}/resources/{RESOURCE_B}"),
            "Nested",
        )]);
        let metadata = extract(&payload, RESOURCE_B).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Nested"));
        assert!(matches!(
            extract(&payload, catalog),
            Err(InvalidResource::NotInCatalog { .. })
        ));
    }

    #[test]
    fn non_ascii_character_before_resource_uuid_is_accepted() {
        let payload = connector(vec![offered_at(
            format!("https://peer.example/\u{e9}{RESOURCE_B}"),
            "Accented",
        )]);
        let metadata = extract(&payload, RESOURCE_B).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Accented"));
    }

    #[test]
    fn only_first_catalog_is_scanned() {
        let payload = json!({
            "@type": "ids:BaseConnector",
            "ids:resourceCatalog": [
                {"ids:offeredResource": []},
                {"ids:offeredResource": [resource(RESOURCE_A, "Hidden")]}
            ]
        });
        assert!(matches!(
            extract(&payload, RESOURCE_A),
            Err(InvalidResource::NotInCatalog { .. })
        ));
    }

    #[test]
    fn untyped_document_with_catalog_is_a_connector() {
        let payload = json!({
            "ids:resourceCatalog": [{"ids:offeredResource": [resource(RESOURCE_A, "Untyped")]}]
        });
        let metadata = extract(&payload, RESOURCE_A).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Untyped"));
    }

    #[test]
    fn representation_without_instances_gets_defaults() {
        let payload = json!({
            "@type": "ids:DataResource",
            "ids:representation": [{
                "@id": format!("https://peer.example/api/representations/{REPRESENTATION}"),
                "ids:mediaType": {"ids:filenameExtension": "csv"}
            }]
        });
        let metadata = extract(&payload, RESOURCE_A).unwrap();
        let representation = &metadata.representations.unwrap()[&uuid(REPRESENTATION)];
        assert_eq!(representation.byte_size, 0);
        assert_eq!(representation.file_name, None);
        assert_eq!(representation.media_type, None);
        assert_eq!(representation.source, BackendSource::local());
    }

    #[test]
    fn absent_fields_stay_unset() {
        let payload = json!({"@type": "ids:Resource"});
        assert_eq!(extract(&payload, RESOURCE_A).unwrap(), ResourceMetadata::default());
    }

    #[test]
    fn empty_title_list_leaves_title_unset() {
        let payload = json!({"@type": "ids:Resource", "ids:title": [], "ids:keyword": []});
        let metadata = extract(&payload, RESOURCE_A).unwrap();
        assert_eq!(metadata.title, None);
        assert_eq!(metadata.keywords, Some(Vec::new()));
    }

    #[test]
    fn malformed_nested_structure_rejects_whole_payload() {
        let mut payload = resource(RESOURCE_A, "Weather");
        payload["ids:representation"][0]["ids:instance"][0]["ids:byteSize"] = json!(-5);
        let err = extract(&payload, RESOURCE_A).unwrap_err();
        assert!(matches!(err, InvalidResource::Malformed { .. }));
    }

    #[test]
    fn representation_without_uuid_rejects_whole_payload() {
        let mut payload = resource(RESOURCE_A, "Weather");
        payload["ids:representation"][0]["@id"] = json!("https://peer.example/representations/latest");
        assert!(matches!(
            extract(&payload, RESOURCE_A),
            Err(InvalidResource::Malformed { .. })
        ));
    }

    #[test]
    fn non_json_payload_is_unparseable_not_retried() {
        let err = MetadataExtractor
            .extract("<rdf:RDF>not json</rdf:RDF>", uuid(RESOURCE_A))
            .unwrap_err();
        assert!(matches!(err, InvalidResource::Unparseable { .. }));
        assert_eq!(err.payload(), "<rdf:RDF>not json</rdf:RDF>");
    }

    #[test]
    fn unrelated_document_is_unknown_shape() {
        let payload = json!({"@type": "ids:ContractAgreement", "@id": "https://x.example/1"});
        assert!(matches!(
            extract(&payload, RESOURCE_A),
            Err(InvalidResource::UnknownShape { .. })
        ));
        assert!(matches!(
            extract(&json!([1, 2, 3]), RESOURCE_A),
            Err(InvalidResource::UnknownShape { .. })
        ));
    }

    #[test]
    fn full_iri_types_are_recognized() {
        let payload = json!({
            "@type": ["https://w3id.org/idsa/core/Resource"],
            "ids:version": "3"
        });
        assert_eq!(extract(&payload, RESOURCE_A).unwrap().version.as_deref(), Some("3"));
    }

    #[test]
    fn remote_id_is_recorded() {
        let metadata = extract(&resource(RESOURCE_A, "Weather"), RESOURCE_A).unwrap();
        assert_eq!(
            metadata.remote_id.unwrap().as_str(),
            format!("https://peer.example/api/offers/{RESOURCE_A}")
        );
    }
}
