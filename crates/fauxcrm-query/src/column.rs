//! Column projection.

use serde::{Deserialize, Serialize};

/// Aggregate function names accepted on a column in aggregate queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateType {
    /// Count of rows holding a value for the column
    Count,
    /// Alias of Count kept for FetchXML compatibility (`countcolumn`)
    CountColumn,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateType {
    pub fn from_fetch_token(token: &str) -> Option<Self> {
        match token {
            "count" => Some(Self::Count),
            "countcolumn" => Some(Self::CountColumn),
            "sum" => Some(Self::Sum),
            "avg" => Some(Self::Avg),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }
}

/// One requested column: its attribute name plus optional output alias,
/// aggregate function and group-by marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnExpression {
    pub name: String,
    pub alias: Option<String>,
    pub aggregate: Option<AggregateType>,
    /// Distinct-count marker, meaningful with `aggregate = Count`
    pub distinct: bool,
    pub group_by: bool,
}

impl ColumnExpression {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            aggregate: None,
            distinct: false,
            group_by: false,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn aggregated(mut self, aggregate: AggregateType) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn grouped(mut self) -> Self {
        self.group_by = true;
        self
    }

    /// The column's name in projected output: the alias when one is given.
    pub fn output_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// Requested projection: all present attributes, or an explicit ordered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub all_columns: bool,
    pub columns: Vec<ColumnExpression>,
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::none()
    }
}

impl ColumnSet {
    /// Projection of no columns (ids only).
    pub fn none() -> Self {
        Self {
            all_columns: false,
            columns: Vec::new(),
        }
    }

    /// Projection of every present attribute.
    pub fn all() -> Self {
        Self {
            all_columns: true,
            columns: Vec::new(),
        }
    }

    /// Explicit projection by attribute names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_columns: false,
            columns: names.into_iter().map(|n| ColumnExpression::new(n)).collect(),
        }
    }

    pub fn add(&mut self, column: ColumnExpression) -> &mut Self {
        self.columns.push(column);
        self
    }
}
