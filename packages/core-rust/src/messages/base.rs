//! JSON-LD building blocks shared by message headers and resource payloads.
//!
//! Outbound values are always serialized in the canonical JSON-LD form the
//! peer protocol expects (`{"@id": ...}` references, `{"@value": ...}`
//! literals). Inbound values are accepted leniently: peers in the wild emit
//! plain strings for references and literals as well.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;
use uuid::Uuid;

/// Base under which fresh message and token ids are minted.
pub const AUTOGEN_BASE: &str = "https://w3id.org/idsa/autogen/";

/// XML Schema datatype of the `ids:issued` literal.
pub const XSD_DATE_TIME_STAMP: &str = "http://www.w3.org/2001/XMLSchema#dateTimeStamp";

/// Token format code for JWT-encoded dynamic attribute tokens.
pub static JWT_TOKEN_FORMAT: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://w3id.org/idsa/code/JWT").expect("token format is a valid URL")
});

/// Mints `https://w3id.org/idsa/autogen/<segment>/<uuid-v4>`.
#[must_use]
pub fn autogen_id(segment: &str) -> Url {
    Url::parse(&format!("{AUTOGEN_BASE}{segment}/{}", Uuid::new_v4()))
        .expect("autogen base joined with a uuid is a valid URL")
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// A reference to another node, serialized as `{"@id": "<uri>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct IdRef {
    #[serde(rename = "@id")]
    pub id: Url,
}

impl IdRef {
    #[must_use]
    pub fn new(id: Url) -> Self {
        Self { id }
    }
}

impl From<Url> for IdRef {
    fn from(id: Url) -> Self {
        Self { id }
    }
}

impl<'de> Deserialize<'de> for IdRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Object {
                #[serde(rename = "@id")]
                id: Url,
            },
            Bare(Url),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Object { id } | Wire::Bare(id) => Self { id },
        })
    }
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// A (possibly language-tagged) string literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedLiteral {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@language", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl<'de> Deserialize<'de> for TypedLiteral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Object {
                #[serde(rename = "@value")]
                value: String,
                #[serde(rename = "@language", default)]
                language: Option<String>,
            },
            Bare(String),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Object { value, language } => Self { value, language },
            Wire::Bare(value) => Self {
                value,
                language: None,
            },
        })
    }
}

/// The `ids:issued` literal: an xsd:dateTimeStamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issued {
    #[serde(rename = "@value")]
    pub value: DateTime<Utc>,
    #[serde(rename = "@type")]
    pub datatype: String,
}

impl Issued {
    #[must_use]
    pub fn at(value: DateTime<Utc>) -> Self {
        Self {
            value,
            datatype: XSD_DATE_TIME_STAMP.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Security token
// ---------------------------------------------------------------------------

/// Dynamic attribute token attached to every outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityToken {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: Url,
    #[serde(rename = "ids:tokenFormat")]
    pub token_format: IdRef,
    #[serde(rename = "ids:tokenValue")]
    pub token_value: String,
}

impl SecurityToken {
    /// Wraps an opaque JWT under a freshly minted token id.
    #[must_use]
    pub fn jwt(token_value: String) -> Self {
        Self {
            kind: "ids:DynamicAttributeToken".to_string(),
            id: autogen_id("dynamicAttributeToken"),
            token_format: IdRef::new(JWT_TOKEN_FORMAT.clone()),
            token_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_ref_serializes_as_object() {
        let r = IdRef::new(Url::parse("https://peer.example/connector").unwrap());
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({"@id": "https://peer.example/connector"})
        );
    }

    #[test]
    fn id_ref_accepts_bare_string() {
        let r: IdRef = serde_json::from_value(json!("https://peer.example/x")).unwrap();
        assert_eq!(r.id.as_str(), "https://peer.example/x");
    }

    #[test]
    fn id_ref_rejects_non_uri() {
        assert!(serde_json::from_value::<IdRef>(json!({"@id": "not a uri"})).is_err());
    }

    #[test]
    fn typed_literal_accepts_both_shapes() {
        let tagged: TypedLiteral =
            serde_json::from_value(json!({"@value": "Wetter", "@language": "de"})).unwrap();
        assert_eq!(tagged.value, "Wetter");
        assert_eq!(tagged.language.as_deref(), Some("de"));

        let bare: TypedLiteral = serde_json::from_value(json!("Weather")).unwrap();
        assert_eq!(bare.value, "Weather");
        assert!(bare.language.is_none());
    }

    #[test]
    fn issued_carries_xsd_datatype() {
        let at = DateTime::parse_from_rfc3339("2021-05-04T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serde_json::to_value(Issued::at(at)).unwrap();
        assert_eq!(json["@type"], XSD_DATE_TIME_STAMP);
        assert_eq!(json["@value"], "2021-05-04T10:00:00Z");
    }

    #[test]
    fn autogen_ids_are_unique_and_scoped() {
        let a = autogen_id("artifactRequestMessage");
        let b = autogen_id("artifactRequestMessage");
        assert_ne!(a, b);
        assert!(a
            .as_str()
            .starts_with("https://w3id.org/idsa/autogen/artifactRequestMessage/"));
    }

    #[test]
    fn security_token_wire_shape() {
        let token = SecurityToken::jwt("eyJ.abc.def".to_string());
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["@type"], "ids:DynamicAttributeToken");
        assert_eq!(json["ids:tokenValue"], "eyJ.abc.def");
        assert_eq!(json["ids:tokenFormat"]["@id"], "https://w3id.org/idsa/code/JWT");
    }
}
