//! Aggregation: group-by plus count / distinct-count / sum / avg / min /
//! max over the joined row set.
//!
//! Aggregates run over *all* rows produced for a group, so an aggregate
//! declared on an attribute reachable only through a doubly-nested outer
//! join is still computed per group — including groups where the outer
//! join produced no matching child rows at all, which count as 0 and sum
//! to nothing rather than raising.

use crate::error::QueryResult;
use crate::filter::EvalContext;
use crate::project::OutputColumn;
use fauxcrm_query::AggregateType;
use fauxcrm_types::{AliasedValue, AttributeValue, Entity, Money, compare_values, values_match};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;

/// Fold joined rows into one output record per group.
pub(crate) fn aggregate_rows(
    rows: &[Entity],
    columns: &[OutputColumn],
    ctx: &EvalContext<'_>,
) -> QueryResult<Vec<Entity>> {
    let group_columns: Vec<&OutputColumn> = columns.iter().filter(|c| c.group_by).collect();
    let aggregate_columns: Vec<&OutputColumn> =
        columns.iter().filter(|c| c.aggregate.is_some()).collect();

    // Group keys are the tuple of group-by values; an absent value is its
    // own key component, so rows missing a grouped attribute still group
    // together deterministically.
    type GroupKey = Vec<Option<AttributeValue>>;
    let mut groups: Vec<(GroupKey, Vec<&Entity>)> = Vec::new();

    if group_columns.is_empty() {
        // One overall group, present even over an empty row set.
        groups.push((Vec::new(), rows.iter().collect()));
    } else {
        for row in rows {
            let key: GroupKey = group_columns
                .iter()
                .map(|c| row.get(&c.source_key).map(|v| v.unaliased().clone()))
                .collect();
            match groups.iter_mut().find(|(k, _)| keys_match(k, &key)) {
                Some((_, members)) => members.push(row),
                None => groups.push((key, vec![row])),
            }
        }
    }

    let mut out = Vec::with_capacity(groups.len());
    for (key, members) in groups {
        let mut record = Entity::new(&ctx.query.entity_name);

        for (column, value) in group_columns.iter().zip(key) {
            if let Some(value) = value {
                record.set(
                    &column.output_name,
                    Some(aliased_output(column, value)),
                );
            }
        }

        for column in &aggregate_columns {
            let values: Vec<&AttributeValue> = members
                .iter()
                .filter_map(|row| row.get(&column.source_key))
                .map(|v| v.unaliased())
                .collect();
            if let Some(value) = compute(column, &values) {
                record.set(&column.output_name, Some(aliased_output(column, value)));
            }
        }

        crate::project::attach_formatted_values(&mut record, ctx);
        out.push(record);
    }
    Ok(out)
}

fn keys_match(a: &[Option<AttributeValue>], b: &[Option<AttributeValue>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x, y) {
            (None, None) => true,
            (Some(x), Some(y)) => values_match(x, y),
            _ => false,
        })
}

fn aliased_output(column: &OutputColumn, value: AttributeValue) -> AttributeValue {
    AliasedValue::new(
        &column.output_name,
        &column.source_entity,
        &column.source_attribute,
        value,
    )
    .into_value()
}

/// Compute one aggregate over the group's present values. Counts always
/// produce a value (0 for empty); the others are absent over an empty set.
fn compute(column: &OutputColumn, values: &[&AttributeValue]) -> Option<AttributeValue> {
    match column.aggregate? {
        AggregateType::Count | AggregateType::CountColumn => {
            let n = if column.distinct {
                let mut seen: Vec<&AttributeValue> = Vec::new();
                for value in values {
                    if !seen.iter().any(|s| values_match(s, value)) {
                        seen.push(value);
                    }
                }
                seen.len()
            } else {
                values.len()
            };
            Some(AttributeValue::Integer(n as i32))
        }
        AggregateType::Sum => numeric_fold(values).map(|(sum, _, money)| wrap_sum(sum, money)),
        AggregateType::Avg => numeric_fold(values).map(|(sum, n, money)| {
            let avg = sum / Decimal::from(n);
            if money {
                AttributeValue::Money(Money::new(avg))
            } else {
                AttributeValue::Decimal(avg)
            }
        }),
        AggregateType::Min => extremum(values, Ordering::Less),
        AggregateType::Max => extremum(values, Ordering::Greater),
    }
}

/// Sum the numeric readings of the values. Returns the sum, the count of
/// numeric values, and whether the column held money.
fn numeric_fold(values: &[&AttributeValue]) -> Option<(Decimal, usize, bool)> {
    let mut sum = Decimal::ZERO;
    let mut n = 0usize;
    let mut money = false;
    for value in values {
        if let Some(d) = value.as_decimal() {
            sum += d;
            n += 1;
            money |= matches!(value, AttributeValue::Money(_));
        }
    }
    (n > 0).then_some((sum, n, money))
}

fn wrap_sum(sum: Decimal, money: bool) -> AttributeValue {
    if money {
        AttributeValue::Money(Money::new(sum))
    } else if sum.is_integer() {
        match sum.to_i64() {
            Some(l) => AttributeValue::Long(l),
            None => AttributeValue::Decimal(sum),
        }
    } else {
        AttributeValue::Decimal(sum)
    }
}

fn extremum(values: &[&AttributeValue], keep: Ordering) -> Option<AttributeValue> {
    let mut best: Option<&AttributeValue> = None;
    for value in values {
        best = match best {
            None => Some(value),
            Some(current) => {
                if compare_values(value, current) == Some(keep) {
                    Some(value)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.cloned()
}
