//! Link-entity join nodes.

use crate::column::ColumnSet;
use crate::filter::FilterExpression;
use serde::{Deserialize, Serialize};

/// Join kind for a link-entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    /// Drop parent rows without a matching child
    Inner,
    /// Retain parent rows, child-side attributes absent
    Outer,
}

/// A join node: joins `name` rows to the parent via
/// `child.from_attribute = parent.to_attribute`.
///
/// Links nest recursively; each level namespaces its child attributes under
/// the dotted alias path, so a three-level chain produces doubly-aliased
/// attribute keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntity {
    /// Child entity logical name
    pub name: String,
    /// Linking attribute on the child
    pub from_attribute: String,
    /// Linking attribute on the parent
    pub to_attribute: String,
    /// Alias under which child attributes are namespaced; defaults to the
    /// child's logical name when absent
    pub alias: Option<String>,
    pub join_type: JoinType,
    pub columns: ColumnSet,
    pub criteria: FilterExpression,
    pub links: Vec<LinkEntity>,
}

impl LinkEntity {
    pub fn new(
        name: impl Into<String>,
        from_attribute: impl Into<String>,
        to_attribute: impl Into<String>,
        join_type: JoinType,
    ) -> Self {
        Self {
            name: name.into(),
            from_attribute: from_attribute.into(),
            to_attribute: to_attribute.into(),
            alias: None,
            join_type,
            columns: ColumnSet::none(),
            criteria: FilterExpression::default(),
            links: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_criteria(mut self, criteria: FilterExpression) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_link(mut self, link: LinkEntity) -> Self {
        self.links.push(link);
        self
    }

    /// The alias child attributes are namespaced under.
    pub fn effective_alias(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
