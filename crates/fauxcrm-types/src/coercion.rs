//! Literal-to-typed-value coercion.
//!
//! Condition values arriving through FetchXML are raw strings. When the
//! target attribute's declared type is known, the literal is parsed into
//! that type; without metadata a fixed heuristic chain applies: guid, then
//! decimal, then double, then date-time, else string. Decimal is tried
//! before double on purpose so that an integer-looking literal stays usable
//! both as a money comparison and as an option-set comparison.

use crate::type_code::AttributeTypeCode;
use crate::value::{AttributeValue, EntityReference, Money, OptionSetValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Literal could not be coerced to the type the attribute requires.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert value '{literal}' for {entity}.{attribute}: {reason}")]
pub struct CoercionError {
    pub entity: String,
    pub attribute: String,
    pub literal: String,
    pub reason: String,
}

impl CoercionError {
    fn new(entity: &str, attribute: &str, literal: &str, reason: impl Into<String>) -> Self {
        Self {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

/// Coerce a raw condition literal into a typed value.
///
/// `declared` is the attribute's metadata type when the entity is known to
/// the registry. `integer_count` is set for the date-relative operator
/// family ("older than X months", "last X days", ...), whose value is an
/// integer count no matter what the attribute's declared type is.
pub fn coerce_literal(
    entity: &str,
    attribute: &str,
    literal: &str,
    declared: Option<AttributeTypeCode>,
    integer_count: bool,
) -> Result<AttributeValue, CoercionError> {
    if integer_count {
        let count: i32 = literal
            .trim()
            .parse()
            .map_err(|e| CoercionError::new(entity, attribute, literal, format!("{e}")))?;
        return Ok(AttributeValue::Integer(count));
    }

    let Some(declared) = declared else {
        return Ok(parse_loose(literal));
    };

    let fail = |reason: String| CoercionError::new(entity, attribute, literal, reason);
    let trimmed = literal.trim();

    match declared {
        AttributeTypeCode::Boolean => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(AttributeValue::Boolean(true)),
            "false" | "0" => Ok(AttributeValue::Boolean(false)),
            _ => Err(fail("expected a boolean literal".into())),
        },
        AttributeTypeCode::Integer => trimmed
            .parse::<i32>()
            .map(AttributeValue::Integer)
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::BigInt => trimmed
            .parse::<i64>()
            .map(AttributeValue::Long)
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::Decimal => Decimal::from_str(trimmed)
            .map(AttributeValue::Decimal)
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::Double => trimmed
            .parse::<f64>()
            .map(AttributeValue::Double)
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::Money => Decimal::from_str(trimmed)
            .map(|d| AttributeValue::Money(Money::new(d)))
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::String | AttributeTypeCode::Memo => {
            Ok(AttributeValue::String(literal.to_string()))
        }
        AttributeTypeCode::DateTime => parse_datetime(trimmed)
            .map(AttributeValue::DateTime)
            .ok_or_else(|| fail("expected a date-time literal".into())),
        AttributeTypeCode::Uniqueidentifier => Uuid::parse_str(trimmed)
            .map(AttributeValue::Guid)
            .map_err(|e| fail(format!("{e}"))),
        AttributeTypeCode::Lookup | AttributeTypeCode::Customer | AttributeTypeCode::Owner => {
            // Lookups compare by record id; the target type is not carried
            // by the literal, so the reference is left untyped.
            Uuid::parse_str(trimmed)
                .map(|id| AttributeValue::Reference(EntityReference::new("", id)))
                .map_err(|e| fail(format!("{e}")))
        }
        AttributeTypeCode::Picklist | AttributeTypeCode::State | AttributeTypeCode::Status => {
            trimmed
                .parse::<i32>()
                .map(|code| AttributeValue::OptionSet(OptionSetValue(code)))
                .map_err(|e| fail(format!("{e}")))
        }
        AttributeTypeCode::MultiSelectPicklist => {
            let mut codes = Vec::new();
            for part in trimmed.split([';', ',']) {
                let code = part
                    .trim()
                    .parse::<i32>()
                    .map_err(|e| fail(format!("{e}")))?;
                codes.push(OptionSetValue(code));
            }
            Ok(AttributeValue::MultiOptionSet(codes))
        }
        AttributeTypeCode::Binary => Err(fail("binary attributes cannot be filtered by literal".into())),
    }
}

/// Metadata-free best-effort parse: guid, decimal, double, date-time, string.
pub fn parse_loose(literal: &str) -> AttributeValue {
    let trimmed = literal.trim();
    if let Ok(guid) = Uuid::parse_str(trimmed) {
        return AttributeValue::Guid(guid);
    }
    if let Ok(decimal) = Decimal::from_str(trimmed) {
        return AttributeValue::Decimal(decimal);
    }
    if let Ok(double) = trimmed.parse::<f64>() {
        return AttributeValue::Double(double);
    }
    if let Some(dt) = parse_datetime(trimmed) {
        return AttributeValue::DateTime(dt);
    }
    AttributeValue::String(literal.to_string())
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` without offset, and bare dates.
fn parse_datetime(literal: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(literal) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(literal, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(literal, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(literal, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn declared_option_set_turns_integer_into_option() {
        let v = coerce_literal("person", "grade", "3", Some(AttributeTypeCode::Picklist), false)
            .unwrap();
        assert_eq!(v, AttributeValue::OptionSet(OptionSetValue(3)));
    }

    #[test]
    fn declared_lookup_turns_guid_into_reference() {
        let id = Uuid::new_v4();
        let v = coerce_literal(
            "person",
            "employerid",
            &id.to_string(),
            Some(AttributeTypeCode::Lookup),
            false,
        )
        .unwrap();
        match v {
            AttributeValue::Reference(r) => assert_eq!(r.id, id),
            other => panic!("expected reference, got {other:?}"),
        }
    }

    #[test]
    fn declared_money_turns_decimal_into_money() {
        let v = coerce_literal("person", "salary", "10.50", Some(AttributeTypeCode::Money), false)
            .unwrap();
        assert_eq!(v, AttributeValue::Money(Money::new(Decimal::new(1050, 2))));
    }

    #[test]
    fn boolean_accepts_truthy_spellings() {
        for (lit, expected) in [("true", true), ("1", true), ("FALSE", false), ("0", false)] {
            let v = coerce_literal("p", "active", lit, Some(AttributeTypeCode::Boolean), false)
                .unwrap();
            assert_eq!(v, AttributeValue::Boolean(expected));
        }
    }

    #[test]
    fn integer_count_operators_bypass_declared_type() {
        // "older than 6 months" against a DateTime attribute: 6 is a count.
        let v = coerce_literal("p", "hiredate", "6", Some(AttributeTypeCode::DateTime), true)
            .unwrap();
        assert_eq!(v, AttributeValue::Integer(6));
    }

    #[test]
    fn loose_parse_prefers_decimal_over_double() {
        assert_eq!(parse_loose("42"), AttributeValue::Decimal(Decimal::from(42)));
        assert_eq!(parse_loose("hello"), AttributeValue::String("hello".into()));
        assert!(matches!(parse_loose("2024-01-15"), AttributeValue::DateTime(_)));
        assert!(matches!(
            parse_loose("0d74fc52-7b2f-4a33-9a30-61a8b9eaa826"),
            AttributeValue::Guid(_)
        ));
    }

    #[test]
    fn unparsable_literal_reports_entity_and_attribute() {
        let err = coerce_literal("person", "age", "abc", Some(AttributeTypeCode::Integer), false)
            .unwrap_err();
        assert_eq!(err.entity, "person");
        assert_eq!(err.attribute, "age");
        assert!(err.to_string().contains("person.age"));
    }
}
