//! Filter evaluation.
//!
//! A filter node is evaluated by purely structural recursion: all direct
//! conditions and all nested child filters are evaluated against the row
//! and combined with the node's logical operator. Nesting depth never
//! changes a match result, and conditions inside link-entity criteria are
//! honored exactly as at the top level.
//!
//! Null safety per operator: `null` matches an absent attribute, `not-null`
//! matches a present one, and every other operator applied to an absent
//! attribute fails the condition without raising.

use crate::alias::{find_alias_path, find_link};
use crate::error::{QueryError, QueryResult};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use fauxcrm_metadata::MetadataRegistry;
use fauxcrm_query::{
    ConditionExpression, ConditionOperator, ConditionValue, FilterExpression, LinkEntity,
    LogicalOperator, QueryExpression,
};
use fauxcrm_types::{AttributeValue, Entity, coerce_literal, compare_values, values_match};
use parking_lot::Mutex;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Per-query evaluation state, shared by the join, filter and projection
/// stages. `now` is captured once so date-window operators are consistent
/// across every row of one evaluation.
pub(crate) struct EvalContext<'a> {
    pub query: &'a QueryExpression,
    pub metadata: &'a MetadataRegistry,
    pub caller_id: Uuid,
    pub now: DateTime<Utc>,
    /// LIKE patterns compiled during this evaluation, keyed by literal.
    /// Scoped to the context so the cache dies with the query.
    pub like_patterns: Mutex<HashMap<String, Regex>>,
}

/// Evaluate a filter node against a row.
///
/// `owning_entity` is the entity unqualified attribute names refer to: the
/// root entity for the query's criteria, the linked entity for a link's
/// criteria (which are evaluated against candidate child rows).
pub(crate) fn evaluate_filter(
    filter: &FilterExpression,
    row: &Entity,
    owning_entity: &str,
    ctx: &EvalContext<'_>,
) -> QueryResult<bool> {
    if filter.is_empty() {
        return Ok(true);
    }

    match filter.filter_operator {
        LogicalOperator::And => {
            for condition in &filter.conditions {
                if !evaluate_condition(condition, row, owning_entity, ctx)? {
                    return Ok(false);
                }
            }
            for child in &filter.filters {
                if !evaluate_filter(child, row, owning_entity, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        LogicalOperator::Or => {
            for condition in &filter.conditions {
                if evaluate_condition(condition, row, owning_entity, ctx)? {
                    return Ok(true);
                }
            }
            for child in &filter.filters {
                if evaluate_filter(child, row, owning_entity, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Where a condition's attribute lives: the row key to read and the entity
/// whose metadata governs coercion.
struct Target {
    key: String,
    entity: String,
    attribute: String,
}

fn resolve_target(
    condition: &ConditionExpression,
    owning_entity: &str,
    ctx: &EvalContext<'_>,
) -> Target {
    let links = &ctx.query.link_entities;

    // Dotted attribute: the head names a link alias.
    if let Some((head, rest)) = condition.attribute_name.split_once('.') {
        if let (Some(path), Some(link)) = (find_alias_path(links, head), find_link(links, head)) {
            return Target {
                key: format!("{path}.{rest}"),
                entity: link.name.clone(),
                attribute: rest.to_string(),
            };
        }
    }

    // Qualified condition: entityname addresses a link (or the root).
    if let Some(qualifier) = &condition.entity_name {
        if qualifier != &ctx.query.entity_name {
            if let (Some(path), Some(link)) =
                (find_alias_path(links, qualifier), find_link(links, qualifier))
            {
                return Target {
                    key: format!("{path}.{}", condition.attribute_name),
                    entity: link.name.clone(),
                    attribute: condition.attribute_name.clone(),
                };
            }
        }
    }

    Target {
        key: condition.attribute_name.clone(),
        entity: owning_entity.to_string(),
        attribute: condition.attribute_name.clone(),
    }
}

/// Reject a condition whose attribute is not declared on a registered
/// entity. Unregistered entities stay lax.
fn check_target(target: &Target, ctx: &EvalContext<'_>) -> QueryResult<()> {
    if ctx.metadata.contains_entity(&target.entity)
        && !ctx.metadata.has_attribute(&target.entity, &target.attribute)
    {
        return Err(QueryError::UnknownAttribute {
            entity: target.entity.clone(),
            attribute: target.attribute.clone(),
        });
    }
    Ok(())
}

/// Validate every condition target in the query before any row is
/// evaluated. Runs once per execution so an unknown attribute on a
/// registered entity is an error even when the row set is empty.
pub(crate) fn check_condition_targets(ctx: &EvalContext<'_>) -> QueryResult<()> {
    check_filter_targets(&ctx.query.criteria, &ctx.query.entity_name, ctx)?;
    check_link_targets(&ctx.query.link_entities, ctx)
}

fn check_link_targets(links: &[LinkEntity], ctx: &EvalContext<'_>) -> QueryResult<()> {
    for link in links {
        check_filter_targets(&link.criteria, &link.name, ctx)?;
        check_link_targets(&link.links, ctx)?;
    }
    Ok(())
}

fn check_filter_targets(
    filter: &FilterExpression,
    owning_entity: &str,
    ctx: &EvalContext<'_>,
) -> QueryResult<()> {
    for condition in &filter.conditions {
        check_target(&resolve_target(condition, owning_entity, ctx), ctx)?;
    }
    for child in &filter.filters {
        check_filter_targets(child, owning_entity, ctx)?;
    }
    Ok(())
}

pub(crate) fn evaluate_condition(
    condition: &ConditionExpression,
    row: &Entity,
    owning_entity: &str,
    ctx: &EvalContext<'_>,
) -> QueryResult<bool> {
    use ConditionOperator as Op;

    let target = resolve_target(condition, owning_entity, ctx);
    let attribute = row.get(&target.key).map(AttributeValue::unaliased);

    // Null tests are the only operators defined on absent attributes.
    let Some(attribute) = attribute else {
        return Ok(condition.operator == Op::Null);
    };
    match condition.operator {
        Op::Null => return Ok(false),
        Op::NotNull => return Ok(true),
        _ => {}
    }

    // String-flavored operators take the literal as text and never go
    // through type coercion.
    match condition.operator {
        Op::Like => return like_matches(condition, attribute, ctx),
        Op::NotLike => return Ok(!like_matches(condition, attribute, ctx)?),
        Op::BeginsWith => return string_test(condition, attribute, |t, n| t.starts_with(n)),
        Op::DoesNotBeginWith => {
            return Ok(!string_test(condition, attribute, |t, n| t.starts_with(n))?);
        }
        Op::EndsWith => return string_test(condition, attribute, |t, n| t.ends_with(n)),
        Op::DoesNotEndWith => {
            return Ok(!string_test(condition, attribute, |t, n| t.ends_with(n))?);
        }
        Op::Contains => return string_test(condition, attribute, |t, n| t.contains(n)),
        Op::DoesNotContain => {
            return Ok(!string_test(condition, attribute, |t, n| t.contains(n))?);
        }
        Op::EqualUserId => return Ok(attribute.as_record_id() == Some(ctx.caller_id)),
        Op::NotEqualUserId => return Ok(attribute.as_record_id() != Some(ctx.caller_id)),
        _ => {}
    }

    // Column-to-column comparison: the other column's value stands in for
    // the literal. When both are present, valueof wins.
    let values: Vec<AttributeValue> = if let Some(other) = &condition.compare_column {
        match row.get(other).map(AttributeValue::unaliased) {
            Some(value) => vec![value.clone()],
            None => return Ok(false),
        }
    } else {
        typed_values(condition, &target, ctx)?
    };

    let result = match condition.operator {
        Op::Equal => values_match(attribute, single(condition, &values)?),
        Op::NotEqual => !values_match(attribute, single(condition, &values)?),
        Op::GreaterThan => ordered(attribute, single(condition, &values)?, Ordering::is_gt),
        Op::GreaterEqual => ordered(attribute, single(condition, &values)?, Ordering::is_ge),
        Op::LessThan => ordered(attribute, single(condition, &values)?, Ordering::is_lt),
        Op::LessEqual => ordered(attribute, single(condition, &values)?, Ordering::is_le),

        Op::In => values.iter().any(|v| values_match(attribute, v)),
        Op::NotIn => !values.iter().any(|v| values_match(attribute, v)),
        Op::Between => between(condition, attribute, &values)?,
        Op::NotBetween => !between(condition, attribute, &values)?,

        _ => date_condition(condition, attribute, &values, ctx)?,
    };
    Ok(result)
}

/// Coerce the condition's values. Raw literals are coerced against the
/// target attribute's declared type when the metadata registry knows it;
/// counted date operators always parse as plain integers.
fn typed_values(
    condition: &ConditionExpression,
    target: &Target,
    ctx: &EvalContext<'_>,
) -> QueryResult<Vec<AttributeValue>> {
    let declared = ctx.metadata.attribute_type(&target.entity, &target.attribute);
    let integer_count = condition.operator.takes_integer_count();

    condition
        .values
        .iter()
        .map(|value| match value {
            ConditionValue::Typed(v) => Ok(v.clone()),
            ConditionValue::Raw(literal) => Ok(coerce_literal(
                &target.entity,
                &target.attribute,
                literal,
                declared,
                integer_count,
            )?),
        })
        .collect()
}

fn single<'v>(
    condition: &ConditionExpression,
    values: &'v [AttributeValue],
) -> QueryResult<&'v AttributeValue> {
    values.first().ok_or_else(|| QueryError::InvalidCondition {
        attribute: condition.attribute_name.clone(),
        message: format!("operator '{}' requires a value", condition.operator),
    })
}

fn ordered(
    attribute: &AttributeValue,
    value: &AttributeValue,
    accept: impl Fn(Ordering) -> bool,
) -> bool {
    compare_values(attribute, value).is_some_and(accept)
}

fn between(
    condition: &ConditionExpression,
    attribute: &AttributeValue,
    values: &[AttributeValue],
) -> QueryResult<bool> {
    let [low, high] = values else {
        return Err(QueryError::InvalidCondition {
            attribute: condition.attribute_name.clone(),
            message: format!(
                "operator '{}' expects exactly two bounds, got {}",
                condition.operator,
                values.len()
            ),
        });
    };
    Ok(ordered(attribute, low, Ordering::is_ge) && ordered(attribute, high, Ordering::is_le))
}

// ============================================================================
// String operators
// ============================================================================

/// String-flavored operators take their argument as the raw literal text,
/// bypassing type coercion, and compare case-insensitively.
fn string_argument(condition: &ConditionExpression) -> QueryResult<String> {
    match condition.values.first() {
        Some(ConditionValue::Raw(s)) => Ok(s.clone()),
        Some(ConditionValue::Typed(v)) => Ok(v.display_string()),
        None => Err(QueryError::InvalidCondition {
            attribute: condition.attribute_name.clone(),
            message: format!("operator '{}' requires a value", condition.operator),
        }),
    }
}

fn string_test(
    condition: &ConditionExpression,
    attribute: &AttributeValue,
    test: impl Fn(&str, &str) -> bool,
) -> QueryResult<bool> {
    let needle = string_argument(condition)?.to_lowercase();
    let text = attribute.display_string().to_lowercase();
    Ok(test(&text, &needle))
}

/// SQL LIKE: `%` matches any run, `_` any single character; anchored and
/// case-insensitive. Compiled patterns are cached per literal for the
/// duration of the evaluation.
fn like_matches(
    condition: &ConditionExpression,
    attribute: &AttributeValue,
    ctx: &EvalContext<'_>,
) -> QueryResult<bool> {
    let pattern = string_argument(condition)?;
    let mut cache = ctx.like_patterns.lock();
    if !cache.contains_key(&pattern) {
        let mut source = String::from("(?i)^");
        for ch in pattern.chars() {
            match ch {
                '%' => source.push_str(".*"),
                '_' => source.push('.'),
                other => source.push_str(&regex::escape(&other.to_string())),
            }
        }
        source.push('$');
        let regex = Regex::new(&source).map_err(|e| QueryError::InvalidCondition {
            attribute: condition.attribute_name.clone(),
            message: format!("bad like pattern '{pattern}': {e}"),
        })?;
        cache.insert(pattern.clone(), regex);
    }
    let regex = &cache[&pattern];
    Ok(regex.is_match(&attribute.display_string()))
}

// ============================================================================
// Date operators
// ============================================================================

fn date_condition(
    condition: &ConditionExpression,
    attribute: &AttributeValue,
    values: &[AttributeValue],
    ctx: &EvalContext<'_>,
) -> QueryResult<bool> {
    use ConditionOperator as Op;

    // A non-date attribute never matches a date window.
    let Some(when) = attribute.as_datetime() else {
        return Ok(false);
    };
    let now = ctx.now;
    let today = now.date_naive();
    let date = when.date_naive();

    let result = match condition.operator {
        Op::Today => date == today,
        Op::Yesterday => date == today - Duration::days(1),
        Op::Tomorrow => date == today + Duration::days(1),
        Op::Last7Days => when >= now - Duration::days(7) && when <= now,
        Op::Next7Days => when >= now && when <= now + Duration::days(7),

        Op::LastWeek | Op::ThisWeek | Op::NextWeek => {
            let this_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
            let start = match condition.operator {
                Op::LastWeek => this_start - Duration::days(7),
                Op::NextWeek => this_start + Duration::days(7),
                _ => this_start,
            };
            date >= start && date < start + Duration::days(7)
        }

        Op::LastMonth | Op::ThisMonth | Op::NextMonth => {
            let this_first = today.with_day(1).unwrap_or(today);
            let first = match condition.operator {
                Op::LastMonth => this_first.checked_sub_months(Months::new(1)),
                Op::NextMonth => this_first.checked_add_months(Months::new(1)),
                _ => Some(this_first),
            };
            match first.and_then(|f| f.checked_add_months(Months::new(1)).map(|n| (f, n))) {
                Some((first, next)) => date >= first && date < next,
                None => false,
            }
        }

        Op::LastYear => date.year() == today.year() - 1,
        Op::ThisYear => date.year() == today.year(),
        Op::NextYear => date.year() == today.year() + 1,

        Op::On | Op::OnOrBefore | Op::OnOrAfter => {
            let bound = single(condition, values)?;
            let Some(bound) = bound.as_datetime() else {
                return Ok(false);
            };
            let bound = bound.date_naive();
            match condition.operator {
                Op::On => date == bound,
                Op::OnOrBefore => date <= bound,
                _ => date >= bound,
            }
        }

        Op::LastXHours => within(when, now - Duration::hours(count(condition, values)?), now),
        Op::NextXHours => within(when, now, now + Duration::hours(count(condition, values)?)),
        Op::LastXDays => within(when, now - Duration::days(count(condition, values)?), now),
        Op::NextXDays => within(when, now, now + Duration::days(count(condition, values)?)),
        Op::LastXWeeks => within(when, now - Duration::weeks(count(condition, values)?), now),
        Op::NextXWeeks => within(when, now, now + Duration::weeks(count(condition, values)?)),
        Op::LastXMonths => match now.checked_sub_months(months(condition, values)?) {
            Some(start) => within(when, start, now),
            None => false,
        },
        Op::NextXMonths => match now.checked_add_months(months(condition, values)?) {
            Some(end) => within(when, now, end),
            None => false,
        },
        Op::LastXYears => match now.checked_sub_months(years(condition, values)?) {
            Some(start) => within(when, start, now),
            None => false,
        },
        Op::NextXYears => match now.checked_add_months(years(condition, values)?) {
            Some(end) => within(when, now, end),
            None => false,
        },

        Op::OlderThanXMinutes => when < now - Duration::minutes(count(condition, values)?),
        Op::OlderThanXHours => when < now - Duration::hours(count(condition, values)?),
        Op::OlderThanXDays => when < now - Duration::days(count(condition, values)?),
        Op::OlderThanXWeeks => when < now - Duration::weeks(count(condition, values)?),
        Op::OlderThanXMonths => match now.checked_sub_months(months(condition, values)?) {
            Some(bound) => when < bound,
            None => false,
        },
        Op::OlderThanXYears => match now.checked_sub_months(years(condition, values)?) {
            Some(bound) => when < bound,
            None => false,
        },

        other => {
            return Err(QueryError::InvalidCondition {
                attribute: condition.attribute_name.clone(),
                message: format!("operator '{other}' is not defined for this attribute"),
            });
        }
    };
    Ok(result)
}

fn within(when: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    when >= start && when <= end
}

/// The integer count carried by the counted-window operators.
fn count(condition: &ConditionExpression, values: &[AttributeValue]) -> QueryResult<i64> {
    match single(condition, values)?.unaliased() {
        AttributeValue::Integer(i) => Ok(i64::from(*i)),
        AttributeValue::Long(l) => Ok(*l),
        other => Err(QueryError::InvalidCondition {
            attribute: condition.attribute_name.clone(),
            message: format!(
                "operator '{}' requires an integer count, got {}",
                condition.operator,
                other.type_name()
            ),
        }),
    }
}

fn months(condition: &ConditionExpression, values: &[AttributeValue]) -> QueryResult<Months> {
    Ok(Months::new(count(condition, values)?.unsigned_abs() as u32))
}

fn years(condition: &ConditionExpression, values: &[AttributeValue]) -> QueryResult<Months> {
    Ok(Months::new((count(condition, values)?.unsigned_abs() as u32).saturating_mul(12)))
}
