//! Response envelopes returned by record operations.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use super::ResourceKind;

/// Operation outcome: a fixed message plus the affected entity (or entities)
/// under a kind-specific key.
///
/// # Examples
/// ```
/// use vetclinic::domain::{Envelope, ResourceKind};
///
/// let envelope = Envelope::listed(ResourceKind::Pet, Vec::<u8>::new());
/// let json = serde_json::to_value(&envelope).unwrap();
/// assert_eq!(json["message"], "pets found");
/// assert!(json["pets"].as_array().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    message: String,
    key: &'static str,
    payload: T,
}

impl<T> Envelope<T> {
    fn single(kind: ResourceKind, verb: &str, payload: T) -> Self {
        Self {
            message: format!("{} {verb}", kind.label()),
            key: kind.singular_key(),
            payload,
        }
    }

    pub fn created(kind: ResourceKind, payload: T) -> Self {
        Self::single(kind, "created", payload)
    }

    pub fn found(kind: ResourceKind, payload: T) -> Self {
        Self::single(kind, "found", payload)
    }

    pub fn updated(kind: ResourceKind, payload: T) -> Self {
        Self::single(kind, "updated", payload)
    }

    pub fn deleted(kind: ResourceKind, payload: T) -> Self {
        Self::single(kind, "deleted", payload)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn listed(kind: ResourceKind, payload: Vec<T>) -> Self {
        Self {
            message: format!("{} found", kind.plural_label()),
            key: kind.plural_key(),
            payload,
        }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry(self.key, &self.payload)?;
        map.end()
    }
}
