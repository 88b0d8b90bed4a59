//! Typed attribute values, records and literal coercion.
//!
//! This crate holds the runtime value model shared by every other fauxcrm
//! crate: the [`AttributeValue`] tagged union, the [`Entity`] record type,
//! type-aware value comparison, and the literal-to-typed-value coercion
//! layer used when conditions arrive as raw strings (FetchXML).

pub mod coercion;
pub mod compare;
pub mod entity;
pub mod type_code;
pub mod value;

pub use coercion::{CoercionError, coerce_literal, parse_loose};
pub use compare::{compare_values, values_match};
pub use entity::{Entity, EntityCollection};
pub use type_code::AttributeTypeCode;
pub use value::{AliasedValue, AttributeValue, EntityReference, Money, OptionSetValue};
