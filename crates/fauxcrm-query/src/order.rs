//! Ordering keys.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Ascending,
    Descending,
}

/// One sort key. `attribute` is a root attribute name, a dotted
/// `alias.attribute` path, or — for aggregate queries — an output alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderExpression {
    pub attribute: String,
    pub order_type: OrderType,
}

impl OrderExpression {
    pub fn ascending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            order_type: OrderType::Ascending,
        }
    }

    pub fn descending(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            order_type: OrderType::Descending,
        }
    }
}
