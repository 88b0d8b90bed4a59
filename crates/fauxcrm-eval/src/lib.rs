//! Query evaluation engine.
//!
//! Orchestrates parse → join → filter → aggregate/project → order →
//! paginate over the record store, with CRM-faithful semantics for
//! nested-filter null handling, aggregate-over-outer-join counting, alias
//! resolution and operator-specific literal coercion.

mod aggregate;
mod alias;
mod engine;
mod error;
mod filter;
mod join;
mod order;
mod project;

pub use alias::resolve_entity_name;
pub use engine::QueryEngine;
pub use error::{QueryError, QueryResult};
