//! The root query expression.

use crate::column::ColumnSet;
use crate::filter::FilterExpression;
use crate::link::LinkEntity;
use crate::order::OrderExpression;
use serde::{Deserialize, Serialize};

/// Page selection: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub page_number: u32,
    pub count: u32,
}

/// A complete query over one root entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryExpression {
    pub entity_name: String,
    pub column_set: ColumnSet,
    pub criteria: FilterExpression,
    pub link_entities: Vec<LinkEntity>,
    pub orders: Vec<OrderExpression>,
    /// Row cap applied before paging
    pub top_count: Option<u32>,
    pub page_info: Option<PagingInfo>,
    pub aggregate: bool,
    pub distinct: bool,
    pub return_total_record_count: bool,
}

impl QueryExpression {
    pub fn new(entity_name: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            column_set: ColumnSet::none(),
            criteria: FilterExpression::default(),
            link_entities: Vec::new(),
            orders: Vec::new(),
            top_count: None,
            page_info: None,
            aggregate: false,
            distinct: false,
            return_total_record_count: false,
        }
    }

    pub fn with_columns(mut self, columns: ColumnSet) -> Self {
        self.column_set = columns;
        self
    }

    pub fn with_criteria(mut self, criteria: FilterExpression) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_link(mut self, link: LinkEntity) -> Self {
        self.link_entities.push(link);
        self
    }

    pub fn with_order(mut self, order: OrderExpression) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_top(mut self, top: u32) -> Self {
        self.top_count = Some(top);
        self
    }

    pub fn with_page(mut self, page_number: u32, count: u32) -> Self {
        self.page_info = Some(PagingInfo { page_number, count });
        self
    }

    pub fn aggregated(mut self) -> Self {
        self.aggregate = true;
        self
    }

    pub fn distinct_rows(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn counting_total_records(mut self) -> Self {
        self.return_total_record_count = true;
        self
    }
}
