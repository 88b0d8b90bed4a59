//! Query tree types.
//!
//! The normalized, recursive in-memory representation of a query: entity,
//! column projection, filter tree, link-entity joins, ordering and paging.
//! A tree is built fresh per query (programmatically or by the FetchXML
//! parser) and discarded after evaluation; it owns no cross-query state.
//! `Clone` provides the deep-copy contract — the tree is acyclic.

pub mod column;
pub mod filter;
pub mod link;
pub mod operator;
pub mod order;
pub mod query;

pub use column::{AggregateType, ColumnExpression, ColumnSet};
pub use filter::{ConditionExpression, ConditionValue, FilterExpression, LogicalOperator};
pub use link::{JoinType, LinkEntity};
pub use operator::ConditionOperator;
pub use order::{OrderExpression, OrderType};
pub use query::{PagingInfo, QueryExpression};
