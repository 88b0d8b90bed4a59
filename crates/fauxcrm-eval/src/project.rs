//! Projection: building output records limited to the requested columns.
//!
//! Explicit column requests are checked strictly against the metadata
//! registry — the store may still hold stray data for removed attributes,
//! and that data must not leak out. All-columns projection never fails and
//! never emits null-holding attributes (nulls are absent by construction).
//! Projected values are deep copies; mutating a result never mutates the
//! stored record.

use crate::error::{QueryError, QueryResult};
use crate::filter::EvalContext;
use fauxcrm_query::{AggregateType, LinkEntity};
use fauxcrm_types::{AttributeValue, Entity};

/// A column of the result set, resolved to its source row key and owning
/// entity. Shared between the projection and aggregation stages.
pub(crate) struct OutputColumn {
    /// Key in the output record
    pub output_name: String,
    /// Key in the joined row
    pub source_key: String,
    pub source_entity: String,
    pub source_attribute: String,
    pub aggregate: Option<AggregateType>,
    pub distinct: bool,
    pub group_by: bool,
}

/// Resolve every explicitly requested column (root and links, recursively),
/// failing on columns the metadata registry does not know.
pub(crate) fn collect_output_columns(ctx: &EvalContext<'_>) -> QueryResult<Vec<OutputColumn>> {
    let mut columns = Vec::new();

    for column in &ctx.query.column_set.columns {
        check_attribute(ctx, &ctx.query.entity_name, &column.name)?;
        columns.push(OutputColumn {
            output_name: column.output_name().to_string(),
            source_key: column.name.clone(),
            source_entity: ctx.query.entity_name.clone(),
            source_attribute: column.name.clone(),
            aggregate: column.aggregate,
            distinct: column.distinct,
            group_by: column.group_by,
        });
    }
    collect_link_columns(ctx, &ctx.query.link_entities, "", &mut columns)?;
    Ok(columns)
}

fn collect_link_columns(
    ctx: &EvalContext<'_>,
    links: &[LinkEntity],
    prefix: &str,
    out: &mut Vec<OutputColumn>,
) -> QueryResult<()> {
    for link in links {
        let path = if prefix.is_empty() {
            link.effective_alias().to_string()
        } else {
            format!("{prefix}.{}", link.effective_alias())
        };
        for column in &link.columns.columns {
            check_attribute(ctx, &link.name, &column.name)?;
            out.push(OutputColumn {
                output_name: column
                    .alias
                    .clone()
                    .unwrap_or_else(|| format!("{path}.{}", column.name)),
                source_key: format!("{path}.{}", column.name),
                source_entity: link.name.clone(),
                source_attribute: column.name.clone(),
                aggregate: column.aggregate,
                distinct: column.distinct,
                group_by: column.group_by,
            });
        }
        collect_link_columns(ctx, &link.links, &path, out)?;
    }
    Ok(())
}

/// Strict existence check, applied when the entity's schema is registered.
fn check_attribute(ctx: &EvalContext<'_>, entity: &str, attribute: &str) -> QueryResult<()> {
    if ctx.metadata.contains_entity(entity) && !ctx.metadata.has_attribute(entity, attribute) {
        return Err(QueryError::UnknownAttribute {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
        });
    }
    Ok(())
}

/// Project joined rows into output records (non-aggregate path).
pub(crate) fn project_rows(
    rows: Vec<Entity>,
    columns: &[OutputColumn],
    ctx: &EvalContext<'_>,
) -> QueryResult<Vec<Entity>> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut record = Entity::with_id(&ctx.query.entity_name, row.id);
        record.row_version = row.row_version;

        if ctx.query.column_set.all_columns {
            // Every present root attribute; joined (aliased) keys are not
            // part of the root projection.
            for (name, value) in row.attributes() {
                if !matches!(value, AttributeValue::Aliased(_)) {
                    record.set(name, Some(value.clone()));
                }
            }
        }
        copy_all_column_links(&row, &ctx.query.link_entities, "", &mut record);

        for column in columns {
            if column.aggregate.is_some() {
                continue;
            }
            if let Some(value) = row.get(&column.source_key) {
                record.set(&column.output_name, Some(value.clone()));
            }
        }

        attach_formatted_values(&mut record, ctx);
        out.push(record);
    }
    Ok(out)
}

/// Copy whole-link projections (`all-attributes` inside a link-entity).
fn copy_all_column_links(row: &Entity, links: &[LinkEntity], prefix: &str, record: &mut Entity) {
    for link in links {
        let path = if prefix.is_empty() {
            link.effective_alias().to_string()
        } else {
            format!("{prefix}.{}", link.effective_alias())
        };
        if link.columns.all_columns {
            for (name, value) in row.attributes() {
                if let AttributeValue::Aliased(aliased) = value {
                    if aliased.alias == path {
                        record.set(name, Some(value.clone()));
                    }
                }
            }
        }
        copy_all_column_links(row, &link.links, &path, record);
    }
}

/// Attach display strings for every projected value that has one: option
/// labels from metadata, boolean labels, money amounts, reference names
/// and date-times.
pub(crate) fn attach_formatted_values(record: &mut Entity, ctx: &EvalContext<'_>) {
    let mut formatted = Vec::new();
    for (name, value) in record.attributes() {
        let (entity, attribute) = match value {
            AttributeValue::Aliased(aliased) => {
                (aliased.entity_logical_name.as_str(), aliased.attribute.as_str())
            }
            _ => (ctx.query.entity_name.as_str(), name),
        };
        match value.unaliased() {
            AttributeValue::OptionSet(option) => {
                if let Some(label) = ctx.metadata.option_label(entity, attribute, option.0) {
                    formatted.push((name.to_string(), label));
                }
            }
            AttributeValue::MultiOptionSet(options) => {
                let labels: Vec<String> = options
                    .iter()
                    .filter_map(|o| ctx.metadata.option_label(entity, attribute, o.0))
                    .collect();
                if labels.len() == options.len() {
                    formatted.push((name.to_string(), labels.join("; ")));
                }
            }
            AttributeValue::Boolean(b) => {
                let label = ctx
                    .metadata
                    .option_label(entity, attribute, i32::from(*b))
                    .unwrap_or_else(|| if *b { "True".into() } else { "False".into() });
                formatted.push((name.to_string(), label));
            }
            AttributeValue::Money(money) => {
                formatted.push((name.to_string(), money.0.to_string()));
            }
            AttributeValue::Reference(reference) => {
                if let Some(display) = &reference.name {
                    formatted.push((name.to_string(), display.clone()));
                }
            }
            AttributeValue::DateTime(_) => {
                formatted.push((name.to_string(), value.display_string()));
            }
            _ => {}
        }
    }
    for (name, label) in formatted {
        record.set_formatted(&name, label);
    }
}
