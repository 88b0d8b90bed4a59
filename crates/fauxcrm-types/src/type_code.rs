//! Attribute type tags used by entity metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an attribute in entity metadata.
///
/// The tag drives literal coercion: a raw string condition value is parsed
/// into the variant a condition's target attribute declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeTypeCode {
    Boolean,
    DateTime,
    Decimal,
    Double,
    Integer,
    BigInt,
    Money,
    String,
    Memo,
    Uniqueidentifier,
    /// Lookup to another entity
    Lookup,
    /// Lookup restricted to customer entity types
    Customer,
    /// Lookup to the owning user/team
    Owner,
    /// Single-choice option set
    Picklist,
    /// State option set (active/inactive)
    State,
    /// Status-reason option set
    Status,
    /// Multi-choice option set
    MultiSelectPicklist,
    Binary,
}

impl AttributeTypeCode {
    /// Whether the attribute holds a record reference.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup | Self::Customer | Self::Owner)
    }

    /// Whether the attribute holds an integer-coded option value.
    pub fn is_option_set(&self) -> bool {
        matches!(
            self,
            Self::Picklist | Self::State | Self::Status | Self::MultiSelectPicklist
        )
    }
}

impl fmt::Display for AttributeTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
