//! Date comparison operators shared by unary and binary constraints.

use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDate;

use super::error::ParseComparisonError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relation evaluated between a left and a right calendar date.
///
/// Every operator has a reversed form obtained by swapping the operands, so
/// that for all dates `a` and `b`:
///
/// ```
/// use calsat::constraints::Comparison;
/// use chrono::NaiveDate;
///
/// let a = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let b = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let op = Comparison::DaysApart(-3);
/// assert_eq!(op.evaluate(a, b), op.reverse().evaluate(b, a));
/// ```
///
/// | Operator        | Holds when                     | Reverse         |
/// |-----------------|--------------------------------|-----------------|
/// | `Equal`         | `left == right`                | `Equal`         |
/// | `NotEqual`      | `left != right`                | `NotEqual`      |
/// | `Before`        | `left < right`                 | `After`         |
/// | `OnOrBefore`    | `left <= right`                | `OnOrAfter`     |
/// | `After`         | `left > right`                 | `Before`        |
/// | `OnOrAfter`     | `left >= right`                | `OnOrBefore`    |
/// | `DaysApart(n)`  | `left - right == n` days       | `DaysApart(-n)` |
/// | `WithinDays(n)` | `abs(left - right) <= n` days  | `WithinDays(n)` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Comparison {
    Equal,
    NotEqual,
    Before,
    OnOrBefore,
    After,
    OnOrAfter,
    /// Signed day gap: `left` falls exactly `n` days after `right`.
    DaysApart(i64),
    /// Both dates lie at most `n` days from each other, in either direction.
    WithinDays(u32),
}

impl Comparison {
    /// Evaluates `left <op> right`.
    pub fn evaluate(self, left: NaiveDate, right: NaiveDate) -> bool {
        match self {
            Self::Equal => left == right,
            Self::NotEqual => left != right,
            Self::Before => left < right,
            Self::OnOrBefore => left <= right,
            Self::After => left > right,
            Self::OnOrAfter => left >= right,
            Self::DaysApart(days) => (left - right).num_days() == days,
            Self::WithinDays(days) => (left - right).num_days().abs() <= i64::from(days),
        }
    }

    /// Returns the operator that holds on `(right, left)` exactly when `self`
    /// holds on `(left, right)`.
    ///
    /// `DaysApart(i64::MIN)` has no negation; it never holds for calendar
    /// dates and reverses to itself.
    pub fn reverse(self) -> Self {
        match self {
            Self::Equal => Self::Equal,
            Self::NotEqual => Self::NotEqual,
            Self::Before => Self::After,
            Self::OnOrBefore => Self::OnOrAfter,
            Self::After => Self::Before,
            Self::OnOrAfter => Self::OnOrBefore,
            Self::DaysApart(days) => Self::DaysApart(days.checked_neg().unwrap_or(days)),
            Self::WithinDays(days) => Self::WithinDays(days),
        }
    }

    /// Returns true if swapping the operands never changes the outcome.
    pub fn is_symmetric(self) -> bool {
        self.reverse() == self
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "=="),
            Self::NotEqual => write!(f, "!="),
            Self::Before => write!(f, "<"),
            Self::OnOrBefore => write!(f, "<="),
            Self::After => write!(f, ">"),
            Self::OnOrAfter => write!(f, ">="),
            Self::DaysApart(days) => write!(f, "=[{days:+}d]"),
            Self::WithinDays(days) => write!(f, "~[{days}d]"),
        }
    }
}

impl FromStr for Comparison {
    type Err = ParseComparisonError;

    /// Parses the plain relational symbols. Day-gap operators carry a payload
    /// and are built directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" => Ok(Self::Equal),
            "!=" => Ok(Self::NotEqual),
            "<" => Ok(Self::Before),
            "<=" => Ok(Self::OnOrBefore),
            ">" => Ok(Self::After),
            ">=" => Ok(Self::OnOrAfter),
            other => Err(ParseComparisonError::UnknownOperator(other.to_string())),
        }
    }
}
