//! Unary and binary date constraints over meeting variables.

use std::fmt::Display;

use chrono::NaiveDate;

use super::comparison::Comparison;
use crate::VarId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constrains one meeting against a fixed reference date: `var <op> reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryConstraint {
    pub var: VarId,
    pub op: Comparison,
    pub reference: NaiveDate,
}

impl UnaryConstraint {
    pub const fn new(var: VarId, op: Comparison, reference: NaiveDate) -> Self {
        Self { var, op, reference }
    }

    /// Evaluates the operator with `date` on the left and `reference` on the right.
    pub fn is_satisfied_by(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        self.op.evaluate(date, reference)
    }

    /// Evaluates the constraint against its own reference date.
    pub fn admits(&self, date: NaiveDate) -> bool {
        self.is_satisfied_by(date, self.reference)
    }
}

/// Constrains two meetings against each other: `left <op> right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinaryConstraint {
    pub left: VarId,
    pub op: Comparison,
    pub right: VarId,
}

impl BinaryConstraint {
    pub const fn new(left: VarId, op: Comparison, right: VarId) -> Self {
        Self { left, op, right }
    }

    /// Evaluates `left_date <op> right_date`.
    pub fn is_satisfied_by(&self, left_date: NaiveDate, right_date: NaiveDate) -> bool {
        self.op.evaluate(left_date, right_date)
    }

    /// Returns the equivalent constraint with operands swapped.
    ///
    /// `c.is_satisfied_by(a, b) == c.reverse().is_satisfied_by(b, a)` for all dates.
    pub fn reverse(&self) -> Self {
        Self {
            left: self.right,
            op: self.op.reverse(),
            right: self.left,
        }
    }

    /// Returns true when both operands refer to the same meeting.
    pub fn is_self_referencing(&self) -> bool {
        self.left == self.right
    }
}

/// A constraint on one or two meeting variables.
///
/// # Examples
///
/// ```
/// use calsat::constraints::{Comparison, Constraint};
/// use chrono::NaiveDate;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let first = Constraint::unary(0, Comparison::OnOrAfter, monday);
/// let second = Constraint::binary(0, Comparison::Before, 1);
///
/// assert_eq!(first.arity(), 1);
/// assert_eq!(second.arity(), 2);
/// assert_eq!(second.max_variable(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Constraint {
    Unary(UnaryConstraint),
    Binary(BinaryConstraint),
}

impl Constraint {
    pub const fn unary(var: VarId, op: Comparison, reference: NaiveDate) -> Self {
        Self::Unary(UnaryConstraint::new(var, op, reference))
    }

    pub const fn binary(left: VarId, op: Comparison, right: VarId) -> Self {
        Self::Binary(BinaryConstraint::new(left, op, right))
    }

    /// Number of meeting variables referenced (1 or 2).
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 1,
            Self::Binary(_) => 2,
        }
    }

    /// Evaluates the operator on two dates. For a unary constraint `b` plays
    /// the role of the reference date.
    pub fn is_satisfied_by(&self, a: NaiveDate, b: NaiveDate) -> bool {
        match self {
            Self::Unary(c) => c.is_satisfied_by(a, b),
            Self::Binary(c) => c.is_satisfied_by(a, b),
        }
    }

    /// Variables referenced by this constraint, left operand first.
    pub fn variables(&self) -> impl Iterator<Item = VarId> {
        let (first, second) = match self {
            Self::Unary(c) => (c.var, None),
            Self::Binary(c) => (c.left, Some(c.right)),
        };
        std::iter::once(first).chain(second)
    }

    /// Highest variable index referenced by this constraint.
    pub fn max_variable(&self) -> VarId {
        match self {
            Self::Unary(c) => c.var,
            Self::Binary(c) => c.left.max(c.right),
        }
    }

    /// Evaluates the constraint against a (possibly partial) assignment.
    ///
    /// Returns `None` if a referenced variable is not yet assigned.
    pub fn check(&self, assignment: &[NaiveDate]) -> Option<bool> {
        match self {
            Self::Unary(c) => assignment.get(c.var).map(|&date| c.admits(date)),
            Self::Binary(c) => {
                let left = assignment.get(c.left)?;
                let right = assignment.get(c.right)?;
                Some(c.is_satisfied_by(*left, *right))
            }
        }
    }

    pub fn as_unary(&self) -> Option<&UnaryConstraint> {
        match self {
            Self::Unary(c) => Some(c),
            Self::Binary(_) => None,
        }
    }

    pub fn as_binary(&self) -> Option<&BinaryConstraint> {
        match self {
            Self::Unary(_) => None,
            Self::Binary(c) => Some(c),
        }
    }
}

impl From<UnaryConstraint> for Constraint {
    fn from(c: UnaryConstraint) -> Self {
        Self::Unary(c)
    }
}

impl From<BinaryConstraint> for Constraint {
    fn from(c: BinaryConstraint) -> Self {
        Self::Binary(c)
    }
}

impl Display for UnaryConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{} {} {}", self.var, self.op, self.reference)
    }
}

impl Display for BinaryConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m{} {} m{}", self.left, self.op, self.right)
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unary(c) => Display::fmt(c, f),
            Self::Binary(c) => Display::fmt(c, f),
        }
    }
}
