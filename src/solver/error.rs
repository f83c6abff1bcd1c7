use chrono::NaiveDate;
use thiserror::Error;

use crate::constraints::Constraint;
use crate::VarId;

/// Caller errors detected before solving starts.
///
/// A problem without a solution is not an error; see
/// [`Solution::schedule`](super::Solution::schedule).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Date range is inverted: {start} is after {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("Constraint {constraint} references meeting {index}, but only {n_meetings} meeting(s) exist")]
    VariableOutOfRange {
        constraint: Constraint,
        index: VarId,
        n_meetings: usize,
    },
}
