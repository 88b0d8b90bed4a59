//! Metadata registry: per-entity-type schema read by every other component.
//!
//! Schema is built programmatically with plain mutable builder structs
//! (there is no reflection step), registered once before queries rely on
//! it, and may be amended afterwards; lookups always reflect the latest
//! state.

mod registry;
mod schema;

pub use registry::MetadataRegistry;
pub use schema::{
    AttributeMetadata, EntityMetadata, ManyToManyRelationship, MetadataError,
    OneToManyRelationship,
};
