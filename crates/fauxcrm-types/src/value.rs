//! Attribute value types - runtime representation of every CRM attribute value
//!
//! This module defines the AttributeValue enum and its supporting types.
//! Null is deliberately not a variant: an attribute holding null is stored
//! as *absence* of the key in the record map, so exhaustive matches never
//! have to consider a null-tagged value.

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The primary value type for record attributes and condition literals.
///
/// Every attribute a record can hold is one of these variants. Joined
/// attributes are wrapped in [`AttributeValue::Aliased`] so that a value
/// produced by a link-entity can be told apart from a same-named root
/// attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AttributeValue {
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer (BigInt)
    Long(i64),
    /// Arbitrary precision decimal
    Decimal(Decimal),
    /// Double-precision float
    Double(f64),
    /// String value
    String(String),
    /// UTC date-time
    DateTime(DateTime<Utc>),
    /// Unique identifier
    Guid(Uuid),
    /// Opaque binary payload
    Binary(Vec<u8>),
    /// Reference to another record (lookup)
    Reference(EntityReference),
    /// Single option-set choice (integer code)
    OptionSet(OptionSetValue),
    /// Multi-select option-set choices
    MultiOptionSet(Vec<OptionSetValue>),
    /// Money amount
    Money(Money),
    /// A value produced by a join, tagged with its source alias
    Aliased(Box<AliasedValue>),
}

impl AttributeValue {
    /// Unwrap alias layers, returning the innermost plain value.
    pub fn unaliased(&self) -> &AttributeValue {
        match self {
            Self::Aliased(aliased) => aliased.value.unaliased(),
            other => other,
        }
    }

    /// Short tag name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::Integer(_) => "Integer",
            Self::Long(_) => "Long",
            Self::Decimal(_) => "Decimal",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::Binary(_) => "Binary",
            Self::Reference(_) => "Reference",
            Self::OptionSet(_) => "OptionSet",
            Self::MultiOptionSet(_) => "MultiOptionSet",
            Self::Money(_) => "Money",
            Self::Aliased(_) => "Aliased",
        }
    }

    /// Try to get as Boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self.unaliased() {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a string slice
    pub fn as_str(&self) -> Option<&str> {
        match self.unaliased() {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a date-time
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self.unaliased() {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Try to view the value as a decimal number.
    ///
    /// Integer, Long, Decimal, Money and OptionSet values all have a
    /// numeric reading; Double is converted through its string form so
    /// that exact decimals survive.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self.unaliased() {
            Self::Integer(i) => Some(Decimal::from(*i)),
            Self::Long(l) => Some(Decimal::from(*l)),
            Self::Decimal(d) => Some(*d),
            Self::Double(f) => Decimal::from_f64_retain(*f),
            Self::Money(m) => Some(m.0),
            Self::OptionSet(o) => Some(Decimal::from(o.0)),
            _ => None,
        }
    }

    /// The record id this value points at, when it is a Guid or Reference.
    pub fn as_record_id(&self) -> Option<Uuid> {
        match self.unaliased() {
            Self::Guid(g) => Some(*g),
            Self::Reference(r) => Some(r.id),
            _ => None,
        }
    }

    /// Best-effort display string, used when no metadata label applies.
    pub fn display_string(&self) -> String {
        match self.unaliased() {
            Self::Boolean(b) => b.to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Long(l) => l.to_string(),
            Self::Decimal(d) => d.to_string(),
            Self::Double(f) => f.to_string(),
            Self::String(s) => s.clone(),
            Self::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::Guid(g) => g.to_string(),
            Self::Binary(b) => format!("<{} bytes>", b.len()),
            Self::Reference(r) => r.name.clone().unwrap_or_else(|| r.id.to_string()),
            Self::OptionSet(o) => o.0.to_string(),
            Self::MultiOptionSet(list) => list
                .iter()
                .map(|o| o.0.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            Self::Money(m) => m.0.to_string(),
            Self::Aliased(_) => unreachable!("unaliased() strips alias layers"),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

/// Reference to a record of another (or the same) entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityReference {
    /// Logical name of the target entity type
    pub logical_name: String,
    /// Target record id
    pub id: Uuid,
    /// Cached display name, if known
    pub name: Option<String>,
    /// Alternate-key payload, if the reference was built from keys
    pub key_attributes: IndexMap<String, AttributeValue>,
}

impl EntityReference {
    /// Create a reference by logical name and id.
    pub fn new(logical_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            logical_name: logical_name.into(),
            id,
            name: None,
            key_attributes: IndexMap::new(),
        }
    }

    /// Attach a cached display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Integer-coded option-set choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionSetValue(pub i32);

/// Money amount, stored as an exact decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money(pub Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// A value attached to a row by a join.
///
/// `alias` is the full dotted alias path for nested links (`"emp.comp"` for
/// a link nested under a link aliased `emp`), `entity_logical_name` the type
/// the value came from, and `attribute` its original attribute name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasedValue {
    pub alias: String,
    pub entity_logical_name: String,
    pub attribute: String,
    pub value: AttributeValue,
}

impl AliasedValue {
    pub fn new(
        alias: impl Into<String>,
        entity_logical_name: impl Into<String>,
        attribute: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        Self {
            alias: alias.into(),
            entity_logical_name: entity_logical_name.into(),
            attribute: attribute.into(),
            value,
        }
    }

    /// Box and wrap into an [`AttributeValue`].
    pub fn into_value(self) -> AttributeValue {
        AttributeValue::Aliased(Box::new(self))
    }
}
