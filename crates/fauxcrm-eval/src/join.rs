//! Link-entity resolution.
//!
//! Each link joins candidate rows of the child type to the parent rows by
//! the link's from/to attributes. Inner joins drop unmatched parents,
//! outer joins retain them with the child side absent. Child attributes
//! are attached under the dotted alias path and wrapped as aliased values;
//! nested links are resolved recursively against each row the parent link
//! produced, so deeper links see already-joined rows.

use crate::error::QueryResult;
use crate::filter::{EvalContext, evaluate_filter};
use fauxcrm_query::{JoinType, LinkEntity};
use fauxcrm_store::RecordStore;
use fauxcrm_types::{AliasedValue, AttributeValue, Entity, values_match};

/// Expand every link in order, recursively. `prefix` is the dotted alias
/// path of the parent link; empty for links hanging off the root entity.
pub(crate) fn expand_links(
    rows: Vec<Entity>,
    links: &[LinkEntity],
    prefix: &str,
    store: &RecordStore,
    ctx: &EvalContext<'_>,
) -> QueryResult<Vec<Entity>> {
    let mut current = rows;
    for link in links {
        current = expand_one(current, link, prefix, store, ctx)?;
    }
    Ok(current)
}

fn expand_one(
    rows: Vec<Entity>,
    link: &LinkEntity,
    prefix: &str,
    store: &RecordStore,
    ctx: &EvalContext<'_>,
) -> QueryResult<Vec<Entity>> {
    let alias_path = if prefix.is_empty() {
        link.effective_alias().to_string()
    } else {
        format!("{prefix}.{}", link.effective_alias())
    };
    let parent_key = if prefix.is_empty() {
        link.to_attribute.clone()
    } else {
        format!("{prefix}.{}", link.to_attribute)
    };

    // The link's criteria constrain which child rows can join at all; they
    // are evaluated against the child rows themselves, so nested null
    // tests inside them behave exactly as top-level ones.
    let mut candidates = Vec::new();
    for child in store.rows_of_type(&link.name) {
        let child = with_primary_id(child, ctx);
        if evaluate_filter(&link.criteria, &child, &link.name, ctx)? {
            candidates.push(child);
        }
    }

    let mut joined = Vec::new();
    for row in rows {
        let parent_value = row.get(&parent_key).map(AttributeValue::unaliased).cloned();
        let matches: Vec<&Entity> = match &parent_value {
            Some(value) => candidates
                .iter()
                .filter(|child| {
                    child
                        .get(&link.from_attribute)
                        .is_some_and(|cv| values_match(cv, value))
                })
                .collect(),
            None => Vec::new(),
        };

        if matches.is_empty() {
            if link.join_type == JoinType::Outer {
                joined.push(row);
            }
            continue;
        }

        for child in matches {
            let mut combined = row.clone();
            for (name, value) in child.attributes() {
                combined.set(
                    &format!("{alias_path}.{name}"),
                    Some(
                        AliasedValue::new(&alias_path, &link.name, name, value.clone())
                            .into_value(),
                    ),
                );
            }
            joined.push(combined);
        }
    }

    // Deeper links see the rows this link produced.
    expand_links(joined, &link.links, &alias_path, store, ctx)
}

/// Make sure the row carries its own primary id attribute, so joins and
/// aggregates over the id work even when the caller never set it.
pub(crate) fn with_primary_id(mut row: Entity, ctx: &EvalContext<'_>) -> Entity {
    if let Some(meta) = ctx.metadata.entity(&row.logical_name) {
        if !row.contains(&meta.primary_id_attribute) {
            let id = row.id;
            row.set(
                &meta.primary_id_attribute,
                Some(AttributeValue::Guid(id)),
            );
        }
    }
    row
}
