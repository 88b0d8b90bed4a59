//! Condition operator vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of condition operators.
///
/// Every operator maps 1:1 onto a FetchXML token; an unrecognized token is
/// a fatal parse error. The `LastX…`/`NextX…`/`OlderThanX…` family takes an
/// integer count value rather than a value of the attribute's own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
    /// SQL LIKE with `%`/`_` wildcards. Edge-only wildcards are rewritten
    /// by the parser into the Contains/BeginsWith/EndsWith family.
    Like,
    NotLike,
    In,
    NotIn,
    Between,
    NotBetween,
    /// Matches an absent (null) attribute
    Null,
    /// Matches a present, non-null attribute
    NotNull,
    BeginsWith,
    DoesNotBeginWith,
    EndsWith,
    DoesNotEndWith,
    Contains,
    DoesNotContain,

    // Fixed-window date operators
    Yesterday,
    Today,
    Tomorrow,
    Last7Days,
    Next7Days,
    LastWeek,
    ThisWeek,
    NextWeek,
    LastMonth,
    ThisMonth,
    NextMonth,
    LastYear,
    ThisYear,
    NextYear,
    On,
    OnOrBefore,
    OnOrAfter,

    // Counted-window date operators (value is an integer count)
    LastXHours,
    NextXHours,
    LastXDays,
    NextXDays,
    LastXWeeks,
    NextXWeeks,
    LastXMonths,
    NextXMonths,
    LastXYears,
    NextXYears,
    OlderThanXMinutes,
    OlderThanXHours,
    OlderThanXDays,
    OlderThanXWeeks,
    OlderThanXMonths,
    OlderThanXYears,

    // Caller-identity operators
    EqualUserId,
    NotEqualUserId,
}

impl ConditionOperator {
    /// Look up an operator by its FetchXML token.
    pub fn from_fetch_token(token: &str) -> Option<Self> {
        use ConditionOperator as Op;
        let op = match token {
            "eq" => Op::Equal,
            "neq" | "ne" => Op::NotEqual,
            "gt" => Op::GreaterThan,
            "ge" => Op::GreaterEqual,
            "lt" => Op::LessThan,
            "le" => Op::LessEqual,
            "like" => Op::Like,
            "not-like" => Op::NotLike,
            "in" => Op::In,
            "not-in" => Op::NotIn,
            "between" => Op::Between,
            "not-between" => Op::NotBetween,
            "null" => Op::Null,
            "not-null" => Op::NotNull,
            "begins-with" => Op::BeginsWith,
            "not-begin-with" => Op::DoesNotBeginWith,
            "ends-with" => Op::EndsWith,
            "not-end-with" => Op::DoesNotEndWith,
            "contains" => Op::Contains,
            "does-not-contain" => Op::DoesNotContain,
            "yesterday" => Op::Yesterday,
            "today" => Op::Today,
            "tomorrow" => Op::Tomorrow,
            "last-seven-days" => Op::Last7Days,
            "next-seven-days" => Op::Next7Days,
            "last-week" => Op::LastWeek,
            "this-week" => Op::ThisWeek,
            "next-week" => Op::NextWeek,
            "last-month" => Op::LastMonth,
            "this-month" => Op::ThisMonth,
            "next-month" => Op::NextMonth,
            "last-year" => Op::LastYear,
            "this-year" => Op::ThisYear,
            "next-year" => Op::NextYear,
            "on" => Op::On,
            "on-or-before" => Op::OnOrBefore,
            "on-or-after" => Op::OnOrAfter,
            "last-x-hours" => Op::LastXHours,
            "next-x-hours" => Op::NextXHours,
            "last-x-days" => Op::LastXDays,
            "next-x-days" => Op::NextXDays,
            "last-x-weeks" => Op::LastXWeeks,
            "next-x-weeks" => Op::NextXWeeks,
            "last-x-months" => Op::LastXMonths,
            "next-x-months" => Op::NextXMonths,
            "last-x-years" => Op::LastXYears,
            "next-x-years" => Op::NextXYears,
            "olderthan-x-minutes" => Op::OlderThanXMinutes,
            "olderthan-x-hours" => Op::OlderThanXHours,
            "olderthan-x-days" => Op::OlderThanXDays,
            "olderthan-x-weeks" => Op::OlderThanXWeeks,
            "olderthan-x-months" => Op::OlderThanXMonths,
            "olderthan-x-years" => Op::OlderThanXYears,
            "eq-userid" => Op::EqualUserId,
            "ne-userid" => Op::NotEqualUserId,
            _ => return None,
        };
        Some(op)
    }

    /// The canonical FetchXML token for this operator.
    pub fn fetch_token(&self) -> &'static str {
        use ConditionOperator as Op;
        match self {
            Op::Equal => "eq",
            Op::NotEqual => "neq",
            Op::GreaterThan => "gt",
            Op::GreaterEqual => "ge",
            Op::LessThan => "lt",
            Op::LessEqual => "le",
            Op::Like => "like",
            Op::NotLike => "not-like",
            Op::In => "in",
            Op::NotIn => "not-in",
            Op::Between => "between",
            Op::NotBetween => "not-between",
            Op::Null => "null",
            Op::NotNull => "not-null",
            Op::BeginsWith => "begins-with",
            Op::DoesNotBeginWith => "not-begin-with",
            Op::EndsWith => "ends-with",
            Op::DoesNotEndWith => "not-end-with",
            Op::Contains => "contains",
            Op::DoesNotContain => "does-not-contain",
            Op::Yesterday => "yesterday",
            Op::Today => "today",
            Op::Tomorrow => "tomorrow",
            Op::Last7Days => "last-seven-days",
            Op::Next7Days => "next-seven-days",
            Op::LastWeek => "last-week",
            Op::ThisWeek => "this-week",
            Op::NextWeek => "next-week",
            Op::LastMonth => "last-month",
            Op::ThisMonth => "this-month",
            Op::NextMonth => "next-month",
            Op::LastYear => "last-year",
            Op::ThisYear => "this-year",
            Op::NextYear => "next-year",
            Op::On => "on",
            Op::OnOrBefore => "on-or-before",
            Op::OnOrAfter => "on-or-after",
            Op::LastXHours => "last-x-hours",
            Op::NextXHours => "next-x-hours",
            Op::LastXDays => "last-x-days",
            Op::NextXDays => "next-x-days",
            Op::LastXWeeks => "last-x-weeks",
            Op::NextXWeeks => "next-x-weeks",
            Op::LastXMonths => "last-x-months",
            Op::NextXMonths => "next-x-months",
            Op::LastXYears => "last-x-years",
            Op::NextXYears => "next-x-years",
            Op::OlderThanXMinutes => "olderthan-x-minutes",
            Op::OlderThanXHours => "olderthan-x-hours",
            Op::OlderThanXDays => "olderthan-x-days",
            Op::OlderThanXWeeks => "olderthan-x-weeks",
            Op::OlderThanXMonths => "olderthan-x-months",
            Op::OlderThanXYears => "olderthan-x-years",
            Op::EqualUserId => "eq-userid",
            Op::NotEqualUserId => "ne-userid",
        }
    }

    /// Whether the value of this operator is an integer count rather than
    /// a value of the attribute's declared type.
    pub fn takes_integer_count(&self) -> bool {
        use ConditionOperator as Op;
        matches!(
            self,
            Op::LastXHours
                | Op::NextXHours
                | Op::LastXDays
                | Op::NextXDays
                | Op::LastXWeeks
                | Op::NextXWeeks
                | Op::LastXMonths
                | Op::NextXMonths
                | Op::LastXYears
                | Op::NextXYears
                | Op::OlderThanXMinutes
                | Op::OlderThanXHours
                | Op::OlderThanXDays
                | Op::OlderThanXWeeks
                | Op::OlderThanXMonths
                | Op::OlderThanXYears
        )
    }

    /// Whether this operator is itself a null test.
    pub fn is_null_test(&self) -> bool {
        matches!(self, Self::Null | Self::NotNull)
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fetch_token())
    }
}
