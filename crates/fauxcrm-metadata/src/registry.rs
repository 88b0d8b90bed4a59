//! Thread-safe metadata registry.

use crate::schema::{
    EntityMetadata, ManyToManyRelationship, MetadataError, OneToManyRelationship,
};
use fauxcrm_types::AttributeTypeCode;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Registry of entity schemas, shared across the store and the engine.
///
/// Cloning is cheap and shares the underlying tables. Lookups clone the
/// schema out so callers never hold the lock across query evaluation.
#[derive(Clone, Default)]
pub struct MetadataRegistry {
    entities: Arc<RwLock<IndexMap<String, EntityMetadata>>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an entity schema.
    pub fn register(&self, metadata: EntityMetadata) {
        self.entities
            .write()
            .insert(metadata.logical_name.clone(), metadata);
    }

    /// Remove an entity schema.
    pub fn unregister(&self, logical_name: &str) -> bool {
        self.entities
            .write()
            .shift_remove(&logical_name.to_lowercase())
            .is_some()
    }

    pub fn contains_entity(&self, logical_name: &str) -> bool {
        self.entities
            .read()
            .contains_key(&logical_name.to_lowercase())
    }

    /// Snapshot of one entity's schema.
    pub fn entity(&self, logical_name: &str) -> Option<EntityMetadata> {
        self.entities
            .read()
            .get(&logical_name.to_lowercase())
            .cloned()
    }

    pub fn attribute_type(
        &self,
        logical_name: &str,
        attribute: &str,
    ) -> Option<AttributeTypeCode> {
        self.entities
            .read()
            .get(&logical_name.to_lowercase())
            .and_then(|e| e.attribute_type(attribute))
    }

    pub fn has_attribute(&self, logical_name: &str, attribute: &str) -> bool {
        self.entities
            .read()
            .get(&logical_name.to_lowercase())
            .is_some_and(|e| e.has_attribute(attribute))
    }

    pub fn option_label(&self, logical_name: &str, attribute: &str, code: i32) -> Option<String> {
        self.entities
            .read()
            .get(&logical_name.to_lowercase())
            .and_then(|e| e.option_label(attribute, code).map(str::to_string))
    }

    /// Amend a registered entity: add an attribute.
    pub fn add_attribute(
        &self,
        logical_name: &str,
        attribute: &str,
        attribute_type: AttributeTypeCode,
    ) -> Result<(), MetadataError> {
        let mut entities = self.entities.write();
        let entity = entities
            .get_mut(&logical_name.to_lowercase())
            .ok_or_else(|| MetadataError::UnknownEntity {
                name: logical_name.to_string(),
            })?;
        entity.add_attribute(attribute, attribute_type)
    }

    /// Amend a registered entity: remove an attribute.
    pub fn remove_attribute(&self, logical_name: &str, attribute: &str) -> bool {
        self.entities
            .write()
            .get_mut(&logical_name.to_lowercase())
            .is_some_and(|e| e.remove_attribute(attribute))
    }

    /// Amend a registered entity: add a one-to-many relationship.
    pub fn add_one_to_many(
        &self,
        logical_name: &str,
        relationship: OneToManyRelationship,
    ) -> Result<(), MetadataError> {
        let mut entities = self.entities.write();
        let entity = entities
            .get_mut(&logical_name.to_lowercase())
            .ok_or_else(|| MetadataError::UnknownEntity {
                name: logical_name.to_string(),
            })?;
        entity.add_one_to_many(relationship)
    }

    /// Amend a registered entity: add a many-to-many relationship.
    pub fn add_many_to_many(
        &self,
        logical_name: &str,
        relationship: ManyToManyRelationship,
    ) -> Result<(), MetadataError> {
        let mut entities = self.entities.write();
        let entity = entities
            .get_mut(&logical_name.to_lowercase())
            .ok_or_else(|| MetadataError::UnknownEntity {
                name: logical_name.to_string(),
            })?;
        entity.add_many_to_many(relationship)
    }

    /// Amend a registered entity: remove a relationship by schema name.
    pub fn remove_relationship(&self, logical_name: &str, schema_name: &str) -> bool {
        self.entities
            .write()
            .get_mut(&logical_name.to_lowercase())
            .is_some_and(|e| e.remove_relationship(schema_name))
    }
}
