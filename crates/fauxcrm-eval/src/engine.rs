//! The query engine entry point.

use crate::aggregate::aggregate_rows;
use crate::error::QueryResult;
use crate::filter::{EvalContext, check_condition_targets, evaluate_filter};
use crate::join::{expand_links, with_primary_id};
use crate::order::order_rows;
use crate::project::{collect_output_columns, project_rows};
use chrono::Utc;
use fauxcrm_fetchxml::parse_fetch;
use fauxcrm_metadata::MetadataRegistry;
use fauxcrm_query::QueryExpression;
use fauxcrm_store::RecordStore;
use fauxcrm_types::{Entity, EntityCollection};
use log::debug;
use uuid::Uuid;

/// Evaluates queries against a record store with the help of a metadata
/// registry.
///
/// A single evaluation is synchronous and single-threaded, runs over a
/// point-in-time snapshot of the rows it touches, and always runs to
/// completion. The engine itself is cheap to clone and safe to share.
#[derive(Clone)]
pub struct QueryEngine {
    store: RecordStore,
    metadata: MetadataRegistry,
    /// Identity used by the `eq-userid` / `ne-userid` operators
    caller_id: Uuid,
}

impl QueryEngine {
    pub fn new(store: RecordStore, metadata: MetadataRegistry) -> Self {
        Self {
            store,
            metadata,
            caller_id: Uuid::nil(),
        }
    }

    /// Set the identity the caller-relative operators compare against.
    pub fn with_caller_id(mut self, caller_id: Uuid) -> Self {
        self.caller_id = caller_id;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    /// Parse a FetchXML document and execute it.
    pub fn execute_fetch(&self, xml: &str) -> QueryResult<EntityCollection> {
        let query = parse_fetch(xml)?;
        self.execute(&query)
    }

    /// Execute a query tree: join → filter → aggregate/project → order →
    /// paginate.
    pub fn execute(&self, query: &QueryExpression) -> QueryResult<EntityCollection> {
        let ctx = EvalContext {
            query,
            metadata: &self.metadata,
            caller_id: self.caller_id,
            now: Utc::now(),
            like_patterns: Default::default(),
        };
        check_condition_targets(&ctx)?;

        let base = self.store.rows_of_type(&query.entity_name);
        debug!(
            "executing query on '{}': {} base rows, {} links",
            query.entity_name,
            base.len(),
            query.link_entities.len()
        );

        let base: Vec<Entity> = base
            .into_iter()
            .map(|row| with_primary_id(row, &ctx))
            .collect();
        let joined = expand_links(base, &query.link_entities, "", &self.store, &ctx)?;

        let mut matched = Vec::with_capacity(joined.len());
        for row in joined {
            if evaluate_filter(&query.criteria, &row, &query.entity_name, &ctx)? {
                matched.push(row);
            }
        }
        debug!("{} rows after join and filter", matched.len());

        let columns = collect_output_columns(&ctx)?;
        let mut results = if query.aggregate {
            let mut grouped = aggregate_rows(&matched, &columns, &ctx)?;
            order_rows(&mut grouped, &query.orders);
            grouped
        } else {
            order_rows(&mut matched, &query.orders);
            project_rows(matched, &columns, &ctx)?
        };

        if query.distinct {
            results = dedup_rows(results);
        }

        let total = query.return_total_record_count.then_some(results.len());

        if let Some(top) = query.top_count {
            results.truncate(top as usize);
        }
        if let Some(page) = query.page_info {
            let start = (page.page_number.saturating_sub(1) as usize) * page.count as usize;
            results = if start >= results.len() {
                Vec::new()
            } else {
                results
                    .drain(start..results.len().min(start + page.count as usize))
                    .collect()
            };
        }

        let mut collection = EntityCollection::new(&query.entity_name);
        collection.entities = results;
        collection.total_record_count = total;
        Ok(collection)
    }
}

/// Keep the first of every run of attribute-identical rows.
fn dedup_rows(rows: Vec<Entity>) -> Vec<Entity> {
    let mut out: Vec<Entity> = Vec::with_capacity(rows.len());
    for row in rows {
        if !out.iter().any(|kept| kept.same_attributes(&row)) {
            out.push(row);
        }
    }
    out
}
