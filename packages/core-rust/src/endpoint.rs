//! Endpoint identifiers: the split of a resource address into a stable base
//! path and the terminal resource UUID.
//!
//! Every addressable endpoint embeds exactly one UUID as its final identifying
//! segment. When the same UUID text also appears earlier in the path, the
//! **last** occurrence is the one that was appended and is the one stripped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EndpointError;

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .expect("uuid pattern is a valid regex")
});

/// Internal address of a resource.
///
/// `base_path + "/" + resource_id` reconstructs the full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointId {
    base_path: String,
    resource_id: Uuid,
}

impl EndpointId {
    #[must_use]
    pub fn new(base_path: impl Into<String>, resource_id: Uuid) -> Self {
        Self {
            base_path: base_path.into(),
            resource_id,
        }
    }

    /// Splits the current request URL at the last occurrence of `resource_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NoUuid`] if `resource_id` does not occur in `request_url`.
    pub fn for_current(request_url: &str, resource_id: Uuid) -> Result<Self, EndpointError> {
        let index = last_index_of(request_url, resource_id).ok_or_else(|| {
            EndpointError::NoUuid {
                path: request_url.to_string(),
            }
        })?;
        Ok(Self::new(strip_separator(request_url, index), resource_id))
    }

    /// Derives the endpoint from an arbitrary URI: the first UUID found in the
    /// path is the resource id, and the base path ends right before its last
    /// occurrence (the preceding separator is removed too).
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::NoUuid`] if the URI contains no UUID.
    pub fn from_uri(uri: &str) -> Result<Self, EndpointError> {
        let resource_id = find_uuids(uri)
            .into_iter()
            .next()
            .ok_or_else(|| EndpointError::NoUuid {
                path: uri.to_string(),
            })?;
        Self::for_current(uri, resource_id)
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    #[must_use]
    pub fn resource_id(&self) -> Uuid {
        self.resource_id
    }

    /// The full path this endpoint was split from.
    #[must_use]
    pub fn to_uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_path, self.resource_id)
    }
}

/// Outcome of looking up an endpoint: either the addressed value, or the
/// endpoint the resource now lives at.
///
/// `Moved` is a control-flow signal, not an error. Controllers turn it into a
/// redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Found(T),
    Moved(EndpointId),
}

impl<T> Resolved<T> {
    /// Maps the found value, leaving a `Moved` signal untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Self::Found(value) => Resolved::Found(f(value)),
            Self::Moved(endpoint) => Resolved::Moved(endpoint),
        }
    }
}

/// Returns every UUID embedded in `text`, in order of appearance.
#[must_use]
pub fn find_uuids(text: &str) -> Vec<Uuid> {
    UUID_PATTERN
        .find_iter(text)
        .filter_map(|m| Uuid::parse_str(m.as_str()).ok())
        .collect()
}

/// Returns the first UUID embedded in a URI, e.g. the key of a representation.
///
/// # Errors
///
/// Returns [`EndpointError::NoUuid`] if the URI contains no UUID.
pub fn uuid_from_uri(uri: &str) -> Result<Uuid, EndpointError> {
    find_uuids(uri)
        .into_iter()
        .next()
        .ok_or_else(|| EndpointError::NoUuid {
            path: uri.to_string(),
        })
}

/// Byte index of the last occurrence of `id` in `path`, ignoring ASCII case.
fn last_index_of(path: &str, id: Uuid) -> Option<usize> {
    path.to_ascii_lowercase().rfind(&id.to_string())
}

/// Everything before `index`, minus the character right in front of it.
fn strip_separator(path: &str, index: usize) -> &str {
    path[..index]
        .char_indices()
        .next_back()
        .map_or("", |(start, _)| &path[..start])
}
