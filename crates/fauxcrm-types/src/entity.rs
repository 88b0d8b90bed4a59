//! Record type: a schema-typed, case-insensitive attribute bag.

use crate::value::{AttributeValue, EntityReference};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entity instance (a record).
///
/// Attribute names are case-insensitive; keys are normalized to lowercase
/// on every write. An attribute holding null is never stored: setting
/// `None` removes the key. Cloning a record is a deep copy, since the value
/// tree is acyclic by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Logical type name
    pub logical_name: String,
    /// Record id
    pub id: Uuid,
    /// Typed attributes, keyed by lowercase logical name
    attributes: IndexMap<String, AttributeValue>,
    /// Display-string counterparts, keyed like `attributes`
    formatted_values: IndexMap<String, String>,
    /// Alternate-key attributes
    pub key_attributes: IndexMap<String, AttributeValue>,
    /// Monotonic version counter, assigned by the record store
    pub row_version: u64,
}

impl Entity {
    /// Create an empty record with a fresh id.
    pub fn new(logical_name: impl Into<String>) -> Self {
        Self::with_id(logical_name, Uuid::new_v4())
    }

    /// Create an empty record with a caller-chosen id.
    pub fn with_id(logical_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            logical_name: logical_name.into(),
            id,
            attributes: IndexMap::new(),
            formatted_values: IndexMap::new(),
            key_attributes: IndexMap::new(),
            row_version: 0,
        }
    }

    /// Set or clear an attribute. `None` removes the key entirely.
    pub fn set(&mut self, name: &str, value: Option<AttributeValue>) {
        let key = name.to_lowercase();
        match value {
            Some(value) => {
                self.attributes.insert(key, value);
            }
            None => {
                self.attributes.shift_remove(&key);
                self.formatted_values.shift_remove(&key);
            }
        }
    }

    /// Builder-style [`Entity::set`].
    pub fn with(mut self, name: &str, value: AttributeValue) -> Self {
        self.set(name, Some(value));
        self
    }

    /// Case-insensitive attribute lookup.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(&name.to_lowercase())
    }

    /// Whether the record holds a (non-null) value for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_lowercase())
    }

    /// Iterate attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of attributes present.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the record holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Set the display string for an attribute.
    pub fn set_formatted(&mut self, name: &str, formatted: impl Into<String>) {
        self.formatted_values.insert(name.to_lowercase(), formatted.into());
    }

    /// Display string for an attribute, when one was attached.
    pub fn formatted(&self, name: &str) -> Option<&str> {
        self.formatted_values.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Iterate formatted values in insertion order.
    pub fn formatted_values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.formatted_values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge the other record's attributes into this one.
    ///
    /// Used by the write path: update semantics are a partial overlay, not
    /// a replacement.
    pub fn merge_attributes(&mut self, other: &Entity) {
        for (name, value) in other.attributes() {
            self.set(name, Some(value.clone()));
        }
        for (name, formatted) in other.formatted_values() {
            self.set_formatted(name, formatted);
        }
    }

    /// Whether two records hold the same attributes, ignoring identity and
    /// version. This is what `distinct` de-duplicates on.
    pub fn same_attributes(&self, other: &Entity) -> bool {
        self.attributes == other.attributes
    }

    /// Reference to this record.
    pub fn to_reference(&self) -> EntityReference {
        EntityReference::new(self.logical_name.clone(), self.id)
    }
}

/// Ordered query output: projected records plus an optional total count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCollection {
    /// Logical name of the root entity queried
    pub entity_name: String,
    /// Projected records, in result order
    pub entities: Vec<Entity>,
    /// Pre-paging row count, when the query asked for it
    pub total_record_count: Option<usize>,
}

impl EntityCollection {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            entities: Vec::new(),
            total_record_count: None,
        }
    }
}
