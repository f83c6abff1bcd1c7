//! calsat - Calendar constraint satisfaction
//!
//! Schedules `n` meetings on calendar days inside a date range, subject to
//! unary constraints (a meeting against a fixed date) and binary constraints
//! (a meeting against another meeting). Domains are filtered by node and arc
//! consistency before a backtracking search looks for a full schedule.
//!
//! ```
//! use calsat::{solve, Comparison, Constraint};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let constraints = [
//!     Constraint::unary(0, Comparison::OnOrAfter, day(2)),
//!     Constraint::binary(1, Comparison::DaysApart(2), 0),
//! ];
//!
//! let schedule = solve(2, day(1), day(5), &constraints).unwrap().unwrap();
//! assert!(schedule.satisfies(&constraints));
//! ```

pub mod consistency;
pub mod constraints;
pub mod domain;
pub mod schedule;
pub mod search;
pub mod solver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use constraints::{BinaryConstraint, Comparison, Constraint, UnaryConstraint};
pub use schedule::Schedule;
pub use solver::{solve, CalendarProblem, CspSolver, Solution, SolveError, SolverConfig};

/// Index of a meeting variable, in `0..n_meetings`.
pub type VarId = usize;
