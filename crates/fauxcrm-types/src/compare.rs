//! Type-aware value comparison.
//!
//! Ordering rules follow the platform: option values compare by integer
//! code, entity references compare by display name with null names first,
//! money and the numeric variants compare numerically across variants, and
//! strings compare ordinally. Values of incomparable kinds return `None`.

use crate::value::AttributeValue;
use std::cmp::Ordering;

/// Compare two values, alias-transparently.
///
/// Returns `None` when the two values have no defined ordering (for example
/// a string against a boolean).
pub fn compare_values(left: &AttributeValue, right: &AttributeValue) -> Option<Ordering> {
    use AttributeValue as V;

    let left = left.unaliased();
    let right = right.unaliased();

    // Numeric kinds (including Money and option codes) compare as decimals.
    if let (Some(a), Some(b)) = (left.as_decimal(), right.as_decimal()) {
        return Some(a.cmp(&b));
    }

    match (left, right) {
        (V::Boolean(a), V::Boolean(b)) => Some(a.cmp(b)),
        (V::String(a), V::String(b)) => Some(a.cmp(b)),
        (V::DateTime(a), V::DateTime(b)) => Some(a.cmp(b)),
        (V::Guid(a), V::Guid(b)) => Some(a.cmp(b)),
        (V::Binary(a), V::Binary(b)) => Some(a.cmp(b)),
        (V::Reference(a), V::Reference(b)) => match (&a.name, &b.name) {
            (None, None) => Some(Ordering::Equal),
            (None, Some(_)) => Some(Ordering::Less),
            (Some(_), None) => Some(Ordering::Greater),
            (Some(x), Some(y)) => Some(x.cmp(y)),
        },
        _ => None,
    }
}

/// Equality as the query engine sees it: alias-transparent, numeric kinds
/// unified, and references matched against bare guids by record id.
pub fn values_match(left: &AttributeValue, right: &AttributeValue) -> bool {
    use AttributeValue as V;

    let left = left.unaliased();
    let right = right.unaliased();

    // Lookup conditions compare by record id regardless of which side is
    // the reference and which the literal guid.
    if let (Some(a), Some(b)) = (left.as_record_id(), right.as_record_id()) {
        return a == b;
    }

    match (left, right) {
        (V::String(a), V::String(b)) => a == b,
        (V::DateTime(a), V::DateTime(b)) => a == b,
        (V::Boolean(a), V::Boolean(b)) => a == b,
        (V::Binary(a), V::Binary(b)) => a == b,
        (V::MultiOptionSet(a), V::MultiOptionSet(b)) => a == b,
        _ => matches!(compare_values(left, right), Some(Ordering::Equal)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{EntityReference, Money, OptionSetValue};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    #[test]
    fn options_compare_by_code() {
        let a = AttributeValue::OptionSet(OptionSetValue(1));
        let b = AttributeValue::OptionSet(OptionSetValue(2));
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
    }

    #[test]
    fn references_compare_by_display_name_null_first() {
        let named = AttributeValue::Reference(
            EntityReference::new("person", Uuid::new_v4()).with_name("Ann"),
        );
        let unnamed = AttributeValue::Reference(EntityReference::new("person", Uuid::new_v4()));
        assert_eq!(compare_values(&unnamed, &named), Some(Ordering::Less));
    }

    #[test]
    fn money_compares_against_plain_decimal() {
        let money = AttributeValue::Money(Money::new(Decimal::new(100, 0)));
        let dec = AttributeValue::Decimal(Decimal::new(100, 0));
        assert!(values_match(&money, &dec));
        assert_eq!(
            compare_values(&money, &AttributeValue::Integer(200)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn guid_matches_reference_to_same_record() {
        let id = Uuid::new_v4();
        let guid = AttributeValue::Guid(id);
        let reference = AttributeValue::Reference(EntityReference::new("person", id));
        assert!(values_match(&guid, &reference));
        assert!(values_match(&reference, &guid));
    }

    #[test]
    fn mismatched_kinds_have_no_ordering() {
        let s = AttributeValue::String("x".into());
        let b = AttributeValue::Boolean(true);
        assert_eq!(compare_values(&s, &b), None);
        assert!(!values_match(&s, &b));
    }
}
