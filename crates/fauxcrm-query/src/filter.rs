//! Filter and condition expressions.

use crate::operator::ConditionOperator;
use fauxcrm_types::AttributeValue;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Logical combinator for a filter node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

/// A filter node: direct conditions plus nested child filters, combined
/// with the node's logical operator. Recursion is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub filter_operator: LogicalOperator,
    pub conditions: Vec<ConditionExpression>,
    pub filters: Vec<FilterExpression>,
}

impl Default for FilterExpression {
    fn default() -> Self {
        Self::new(LogicalOperator::And)
    }
}

impl FilterExpression {
    pub fn new(filter_operator: LogicalOperator) -> Self {
        Self {
            filter_operator,
            conditions: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Whether the filter constrains anything at all.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.filters.is_empty()
    }

    pub fn add_condition(&mut self, condition: ConditionExpression) -> &mut Self {
        self.conditions.push(condition);
        self
    }

    pub fn add_filter(&mut self, filter: FilterExpression) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Builder-style [`FilterExpression::add_condition`].
    pub fn with_condition(mut self, condition: ConditionExpression) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Builder-style [`FilterExpression::add_filter`].
    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filters.push(filter);
        self
    }
}

/// A condition value.
///
/// FetchXML supplies raw strings which are coerced at evaluation time once
/// the owning attribute's metadata type is known; programmatic query trees
/// supply typed values directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConditionValue {
    /// Uncoerced literal from a query document
    Raw(String),
    /// Already-typed value from programmatic construction
    Typed(AttributeValue),
}

impl From<&str> for ConditionValue {
    fn from(s: &str) -> Self {
        Self::Raw(s.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(s: String) -> Self {
        Self::Raw(s)
    }
}

impl From<AttributeValue> for ConditionValue {
    fn from(v: AttributeValue) -> Self {
        Self::Typed(v)
    }
}

/// A single condition: attribute, operator, and zero or more values — or a
/// column reference for column-to-column comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionExpression {
    /// Alias or entity qualifier, when the condition targets a linked
    /// entity's attribute rather than the enclosing one
    pub entity_name: Option<String>,
    pub attribute_name: String,
    pub operator: ConditionOperator,
    pub values: SmallVec<[ConditionValue; 2]>,
    /// Column-to-column comparison: the other attribute's name. When set,
    /// it wins over any literal values also present.
    pub compare_column: Option<String>,
}

impl ConditionExpression {
    pub fn new(attribute_name: impl Into<String>, operator: ConditionOperator) -> Self {
        Self {
            entity_name: None,
            attribute_name: attribute_name.into(),
            operator,
            values: SmallVec::new(),
            compare_column: None,
        }
    }

    /// Condition with a single value.
    pub fn with_value(mut self, value: impl Into<ConditionValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Condition with a value list (In/NotIn, Between bounds).
    pub fn with_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ConditionValue>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Qualify the condition with a link-entity alias or logical name.
    pub fn for_entity(mut self, entity_name: impl Into<String>) -> Self {
        self.entity_name = Some(entity_name.into());
        self
    }

    /// Column-to-column comparison against `other`.
    pub fn comparing_column(mut self, other: impl Into<String>) -> Self {
        self.compare_column = Some(other.into());
        self
    }
}
