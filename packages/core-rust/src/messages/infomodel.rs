//! The subset of the information model read from peer payloads.
//!
//! Only the fields the connector maps into [`ResourceMetadata`](crate::ResourceMetadata)
//! are modeled; everything else in a peer document is ignored. Contract offers
//! are kept as raw JSON-LD since policies are stored in serialized form.

use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use super::base::{IdRef, TypedLiteral};

/// A resource offered by a peer connector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Url>,
    #[serde(rename = "ids:title", skip_serializing_if = "Option::is_none", default)]
    pub title: Option<Vec<TypedLiteral>>,
    #[serde(
        rename = "ids:description",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub description: Option<Vec<TypedLiteral>>,
    #[serde(rename = "ids:keyword", skip_serializing_if = "Option::is_none", default)]
    pub keyword: Option<Vec<TypedLiteral>>,
    #[serde(
        rename = "ids:representation",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub representation: Option<Vec<Representation>>,
    #[serde(
        rename = "ids:contractOffer",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub contract_offer: Option<Vec<serde_json::Value>>,
    #[serde(rename = "ids:publisher", skip_serializing_if = "Option::is_none", default)]
    pub publisher: Option<IdRef>,
    #[serde(
        rename = "ids:standardLicense",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub standard_license: Option<IdRef>,
    #[serde(rename = "ids:version", skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
}

/// A concrete rendering of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(rename = "ids:mediaType", skip_serializing_if = "Option::is_none", default)]
    pub media_type: Option<MediaType>,
    #[serde(rename = "ids:instance", skip_serializing_if = "Option::is_none", default)]
    pub instance: Option<Vec<Artifact>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(
        rename = "ids:filenameExtension",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub filename_extension: Option<String>,
}

/// A file-like instance of a representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(
        rename = "ids:byteSize",
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "deserialize_byte_size"
    )]
    pub byte_size: Option<u64>,
    #[serde(rename = "ids:fileName", skip_serializing_if = "Option::is_none", default)]
    pub file_name: Option<String>,
}

/// A connector self-description. Offered resources stay raw until one of them
/// is selected, so unrelated entries cannot fail extraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Connector {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<Url>,
    #[serde(
        rename = "ids:resourceCatalog",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub resource_catalog: Option<Vec<ResourceCatalog>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceCatalog {
    #[serde(
        rename = "ids:offeredResource",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub offered_resource: Option<Vec<serde_json::Value>>,
}

/// Accepts `ids:byteSize` as an integer, a numeric string, or a typed literal.
fn deserialize_byte_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(u64),
        Text(String),
        Literal {
            #[serde(rename = "@value")]
            value: String,
        },
    }

    let text = match Option::<Wire>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Wire::Number(n)) => return Ok(Some(n)),
        Some(Wire::Text(text) | Wire::Literal { value: text }) => text,
    };
    text.trim().parse::<u64>().map(Some).map_err(|e| {
        <D::Error as serde::de::Error>::custom(format!("invalid ids:byteSize {text:?}: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn artifact_byte_size_shapes() {
        let n: Artifact = serde_json::from_value(json!({"ids:byteSize": 42})).unwrap();
        assert_eq!(n.byte_size, Some(42));
        let s: Artifact = serde_json::from_value(json!({"ids:byteSize": "43"})).unwrap();
        assert_eq!(s.byte_size, Some(43));
        let l: Artifact =
            serde_json::from_value(json!({"ids:byteSize": {"@value": "44", "@type": "xsd:integer"}}))
                .unwrap();
        assert_eq!(l.byte_size, Some(44));
        let none: Artifact = serde_json::from_value(json!({})).unwrap();
        assert_eq!(none.byte_size, None);
    }

    #[test]
    fn negative_byte_size_is_rejected() {
        assert!(serde_json::from_value::<Artifact>(json!({"ids:byteSize": -1})).is_err());
        assert!(serde_json::from_value::<Artifact>(json!({"ids:byteSize": "lots"})).is_err());
    }

    #[test]
    fn representation_requires_id() {
        assert!(serde_json::from_value::<Representation>(json!({"ids:instance": []})).is_err());
    }

    #[test]
    fn resource_ignores_unknown_fields() {
        let resource: Resource = serde_json::from_value(json!({
            "@type": "ids:Resource",
            "@id": "https://peer.example/api/resources/1",
            "ids:language": [{"@id": "idsc:EN"}],
            "ids:version": "2"
        }))
        .unwrap();
        assert_eq!(resource.version.as_deref(), Some("2"));
        assert!(resource.title.is_none());
    }
}
