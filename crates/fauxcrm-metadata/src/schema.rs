//! Schema types: entities, attributes, relationships, option-set labels.

use fauxcrm_types::AttributeTypeCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Schema errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// Attribute or relationship schema name already defined on the entity
    #[error("duplicate schema name '{name}' on entity '{entity}'")]
    DuplicateSchemaName { entity: String, name: String },

    /// Entity type not registered
    #[error("entity '{name}' is not registered")]
    UnknownEntity { name: String },
}

/// One attribute's schema: logical name plus declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMetadata {
    pub logical_name: String,
    pub attribute_type: AttributeTypeCode,
}

impl AttributeMetadata {
    pub fn new(logical_name: impl Into<String>, attribute_type: AttributeTypeCode) -> Self {
        Self {
            logical_name: logical_name.into().to_lowercase(),
            attribute_type,
        }
    }
}

/// One-to-many (and, read from the other side, many-to-one) relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToManyRelationship {
    pub schema_name: String,
    /// The "one" side
    pub referenced_entity: String,
    pub referenced_attribute: String,
    /// The "many" side
    pub referencing_entity: String,
    pub referencing_attribute: String,
}

/// Many-to-many relationship through an intersect entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManyRelationship {
    pub schema_name: String,
    pub intersect_entity: String,
    pub entity1_logical_name: String,
    pub entity1_intersect_attribute: String,
    pub entity2_logical_name: String,
    pub entity2_intersect_attribute: String,
}

/// Schema for one entity type.
///
/// Attribute order is preserved; attribute and relationship schema names
/// must be unique within the entity, enforced on every add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub logical_name: String,
    pub primary_id_attribute: String,
    pub primary_name_attribute: String,
    attributes: IndexMap<String, AttributeMetadata>,
    one_to_many: IndexMap<String, OneToManyRelationship>,
    many_to_many: IndexMap<String, ManyToManyRelationship>,
    /// Option-set labels, keyed by attribute then by option code
    option_sets: IndexMap<String, IndexMap<i32, String>>,
}

impl EntityMetadata {
    /// New schema with conventional `<name>id` / `name` primary attributes.
    pub fn new(logical_name: impl Into<String>) -> Self {
        let logical_name = logical_name.into().to_lowercase();
        let primary_id_attribute = format!("{logical_name}id");
        let mut meta = Self {
            logical_name,
            primary_id_attribute: primary_id_attribute.clone(),
            primary_name_attribute: "name".to_string(),
            attributes: IndexMap::new(),
            one_to_many: IndexMap::new(),
            many_to_many: IndexMap::new(),
            option_sets: IndexMap::new(),
        };
        meta.attributes.insert(
            primary_id_attribute.clone(),
            AttributeMetadata::new(primary_id_attribute, AttributeTypeCode::Uniqueidentifier),
        );
        meta
    }

    pub fn with_primary_name(mut self, attribute: impl Into<String>) -> Self {
        self.primary_name_attribute = attribute.into().to_lowercase();
        self
    }

    /// Add an attribute, rejecting duplicates.
    pub fn add_attribute(
        &mut self,
        logical_name: impl Into<String>,
        attribute_type: AttributeTypeCode,
    ) -> Result<(), MetadataError> {
        let meta = AttributeMetadata::new(logical_name, attribute_type);
        if self.attributes.contains_key(&meta.logical_name) {
            return Err(MetadataError::DuplicateSchemaName {
                entity: self.logical_name.clone(),
                name: meta.logical_name,
            });
        }
        self.attributes.insert(meta.logical_name.clone(), meta);
        Ok(())
    }

    /// Builder-style [`EntityMetadata::add_attribute`]; duplicate names are
    /// a caller defect during programmatic schema construction.
    pub fn attribute(
        mut self,
        logical_name: impl Into<String>,
        attribute_type: AttributeTypeCode,
    ) -> Result<Self, MetadataError> {
        self.add_attribute(logical_name, attribute_type)?;
        Ok(self)
    }

    /// Remove an attribute. Stored rows may still hold stray data for it;
    /// the projection layer is what enforces strictness.
    pub fn remove_attribute(&mut self, logical_name: &str) -> bool {
        self.attributes
            .shift_remove(&logical_name.to_lowercase())
            .is_some()
    }

    pub fn attribute_meta(&self, logical_name: &str) -> Option<&AttributeMetadata> {
        self.attributes.get(&logical_name.to_lowercase())
    }

    pub fn attribute_type(&self, logical_name: &str) -> Option<AttributeTypeCode> {
        self.attribute_meta(logical_name).map(|a| a.attribute_type)
    }

    pub fn has_attribute(&self, logical_name: &str) -> bool {
        self.attributes.contains_key(&logical_name.to_lowercase())
    }

    pub fn attributes(&self) -> impl Iterator<Item = &AttributeMetadata> {
        self.attributes.values()
    }

    /// Add a one-to-many relationship, rejecting duplicate schema names.
    pub fn add_one_to_many(
        &mut self,
        relationship: OneToManyRelationship,
    ) -> Result<(), MetadataError> {
        if self.one_to_many.contains_key(&relationship.schema_name)
            || self.many_to_many.contains_key(&relationship.schema_name)
        {
            return Err(MetadataError::DuplicateSchemaName {
                entity: self.logical_name.clone(),
                name: relationship.schema_name,
            });
        }
        self.one_to_many
            .insert(relationship.schema_name.clone(), relationship);
        Ok(())
    }

    /// Add a many-to-many relationship, rejecting duplicate schema names.
    pub fn add_many_to_many(
        &mut self,
        relationship: ManyToManyRelationship,
    ) -> Result<(), MetadataError> {
        if self.many_to_many.contains_key(&relationship.schema_name)
            || self.one_to_many.contains_key(&relationship.schema_name)
        {
            return Err(MetadataError::DuplicateSchemaName {
                entity: self.logical_name.clone(),
                name: relationship.schema_name,
            });
        }
        self.many_to_many
            .insert(relationship.schema_name.clone(), relationship);
        Ok(())
    }

    pub fn remove_relationship(&mut self, schema_name: &str) -> bool {
        self.one_to_many.shift_remove(schema_name).is_some()
            || self.many_to_many.shift_remove(schema_name).is_some()
    }

    pub fn one_to_many(&self, schema_name: &str) -> Option<&OneToManyRelationship> {
        self.one_to_many.get(schema_name)
    }

    pub fn many_to_many(&self, schema_name: &str) -> Option<&ManyToManyRelationship> {
        self.many_to_many.get(schema_name)
    }

    pub fn one_to_many_relationships(&self) -> impl Iterator<Item = &OneToManyRelationship> {
        self.one_to_many.values()
    }

    /// Define (or replace) the label table for an option-set attribute.
    pub fn set_option_labels<I>(&mut self, attribute: &str, labels: I)
    where
        I: IntoIterator<Item = (i32, String)>,
    {
        self.option_sets
            .insert(attribute.to_lowercase(), labels.into_iter().collect());
    }

    pub fn option_label(&self, attribute: &str, code: i32) -> Option<&str> {
        self.option_sets
            .get(&attribute.to_lowercase())
            .and_then(|labels| labels.get(&code))
            .map(String::as_str)
    }
}
