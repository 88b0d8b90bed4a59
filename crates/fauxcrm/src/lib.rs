//! In-memory CRM data service emulation for offline unit testing.
//!
//! This crate bundles the pieces: a schema-typed record store, a metadata
//! registry, a FetchXML parser and a query engine with CRM-faithful
//! semantics for filtering, joins, aggregation, ordering, projection and
//! type coercion.
//!
//! # Example
//!
//! ```
//! use fauxcrm::metadata::{EntityMetadata, MetadataRegistry};
//! use fauxcrm::store::RecordStore;
//! use fauxcrm::types::{AttributeTypeCode, AttributeValue, Entity};
//! use fauxcrm::QueryEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = MetadataRegistry::new();
//! metadata.register(
//!     EntityMetadata::new("person")
//!         .attribute("firstname", AttributeTypeCode::String)?
//!         .attribute("age", AttributeTypeCode::Integer)?,
//! );
//!
//! let store = RecordStore::new();
//! store.create(
//!     Entity::new("person")
//!         .with("firstname", AttributeValue::String("Ann".into()))
//!         .with("age", AttributeValue::Integer(34)),
//! )?;
//!
//! let engine = QueryEngine::new(store, metadata);
//! let results = engine.execute_fetch(
//!     r#"<fetch><entity name="person">
//!          <attribute name="firstname" />
//!          <filter><condition attribute="age" operator="gt" value="30" /></filter>
//!        </entity></fetch>"#,
//! )?;
//! assert_eq!(results.entities.len(), 1);
//! # Ok(())
//! # }
//! ```

// Re-export all public APIs from internal crates
pub use fauxcrm_eval as eval;
pub use fauxcrm_fetchxml as fetchxml;
pub use fauxcrm_metadata as metadata;
pub use fauxcrm_query as query;
pub use fauxcrm_store as store;
pub use fauxcrm_types as types;

// Convenience re-exports
pub use fauxcrm_eval::{QueryEngine, QueryError, QueryResult};
pub use fauxcrm_fetchxml::parse_fetch;
pub use fauxcrm_types::{AttributeValue, Entity, EntityCollection};
