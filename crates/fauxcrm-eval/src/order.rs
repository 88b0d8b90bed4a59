//! Stable multi-key ordering with type-aware comparison.

use fauxcrm_query::{OrderExpression, OrderType};
use fauxcrm_types::{AttributeValue, Entity, compare_values};
use std::cmp::Ordering;

/// Sort rows by the ordered key list. The sort is stable; rows whose keys
/// have no defined ordering keep their relative positions. Absent values
/// sort first.
pub(crate) fn order_rows(rows: &mut [Entity], orders: &[OrderExpression]) {
    if orders.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for order in orders {
            let left = a.get(&order.attribute).map(AttributeValue::unaliased);
            let right = b.get(&order.attribute).map(AttributeValue::unaliased);
            let ordering = match (left, right) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(l), Some(r)) => compare_values(l, r).unwrap_or(Ordering::Equal),
            };
            let ordering = match order.order_type {
                OrderType::Ascending => ordering,
                OrderType::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
