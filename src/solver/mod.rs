//! Entry point: builds the domains, filters them and searches for a schedule.
//!
//! ```text
//!   CalendarProblem ──▶ Domains::full ──▶ NodeConsistency ──▶ ArcConsistency ──▶ Backtracking
//!                                                                                  │
//!                                                           Some(Schedule) / None ◀┘
//! ```
//!
//! Use [`solve`] for a one-shot call, or [`CspSolver`] with a [`SolverConfig`]
//! to choose the phases and get the statistics of the run.

mod config;
mod error;


pub use config::SolverConfig;
pub use error::SolveError;

use chrono::NaiveDate;
use log::debug;

use crate::consistency::{ArcConsistency, NodeConsistency, PropagationReport, Propagator};
use crate::constraints::Constraint;
use crate::domain::Domains;
use crate::schedule::Schedule;
use crate::search::{Backtracking, SearchStats};

/// A calendar scheduling query.
///
/// # Examples
///
/// ```
/// use calsat::constraints::{Comparison, Constraint};
/// use calsat::solver::CalendarProblem;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
///
/// let mut problem = CalendarProblem::new(2, start, end);
/// problem
///     .add_constraint(Constraint::unary(0, Comparison::Equal, start))
///     .add_constraint(Constraint::binary(0, Comparison::NotEqual, 1));
///
/// assert!(problem.validate().is_ok());
/// assert_eq!(problem.constraints().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarProblem {
    n_meetings: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
    constraints: Vec<Constraint>,
}

impl CalendarProblem {
    /// Creates a problem with `n_meetings` meetings, each allowed on any day
    /// of the inclusive `[range_start, range_end]`.
    pub fn new(n_meetings: usize, range_start: NaiveDate, range_end: NaiveDate) -> Self {
        Self {
            n_meetings,
            range_start,
            range_end,
            constraints: Vec::new(),
        }
    }

    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> &mut Self {
        self.constraints.push(constraint.into());
        self
    }

    pub fn with_constraints<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = Constraint>,
    {
        self.constraints.extend(constraints);
        self
    }

    pub fn n_meetings(&self) -> usize {
        self.n_meetings
    }

    pub fn range_start(&self) -> NaiveDate {
        self.range_start
    }

    pub fn range_end(&self) -> NaiveDate {
        self.range_end
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Checks the caller contract: a non-inverted range and constraints that
    /// only reference meetings in `0..n_meetings`.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.range_start > self.range_end {
            return Err(SolveError::InvertedRange {
                start: self.range_start,
                end: self.range_end,
            });
        }

        for constraint in &self.constraints {
            let index = constraint.max_variable();
            if index >= self.n_meetings {
                return Err(SolveError::VariableOutOfRange {
                    constraint: *constraint,
                    index,
                    n_meetings: self.n_meetings,
                });
            }
        }

        Ok(())
    }

    /// One full-range domain per meeting.
    pub fn initial_domains(&self) -> Domains {
        Domains::full(self.n_meetings, self.range_start, self.range_end)
    }
}

/// Counters of one solve call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStats {
    pub node_consistency: PropagationReport,
    pub arc_consistency: PropagationReport,
    pub search: SearchStats,
}

/// Outcome of [`CspSolver::solve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// The schedule found, or `None` if no assignment satisfies every constraint.
    pub schedule: Option<Schedule>,
    pub stats: SolveStats,
}

impl Solution {
    /// Whether a schedule was found.
    pub fn is_solved(&self) -> bool {
        self.schedule.is_some()
    }
}

/// Calendar CSP solver: node consistency, arc consistency, then backtracking.
#[derive(Debug, Clone, Default)]
pub struct CspSolver {
    config: SolverConfig,
}

impl CspSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `problem`.
    ///
    /// Returns `Err` only for caller errors (see [`CalendarProblem::validate`]).
    /// A problem without a solution yields `Ok` with `schedule: None`.
    pub fn solve(&self, problem: &CalendarProblem) -> Result<Solution, SolveError> {
        problem.validate()?;

        let constraints = problem.constraints();
        let mut domains = problem.initial_domains();
        let mut stats = SolveStats::default();

        debug!(
            "solving {} meeting(s) over {}..={} with {} constraint(s)",
            problem.n_meetings(),
            problem.range_start(),
            problem.range_end(),
            constraints.len()
        );

        if self.config.node_consistency {
            stats.node_consistency = filter(&NodeConsistency, &mut domains, constraints);
        }
        if self.config.arc_consistency {
            stats.arc_consistency = filter(&ArcConsistency, &mut domains, constraints);
        }
        if let Some(var) = domains.first_empty() {
            debug!("m{var} has no candidate date left, no schedule exists");
        }

        let search = Backtracking::new(&domains, constraints);
        let schedule = self.search(&search);
        stats.search = search.stats();

        Ok(Solution { schedule, stats })
    }

    #[cfg(feature = "parallel")]
    fn search(&self, search: &Backtracking<'_>) -> Option<Schedule> {
        if self.config.parallel_root {
            search.run_parallel()
        } else {
            search.run()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn search(&self, search: &Backtracking<'_>) -> Option<Schedule> {
        if self.config.parallel_root {
            log::warn!("parallel_root requested but the `parallel` feature is disabled, searching sequentially");
        }
        search.run()
    }
}

fn filter(
    propagator: &dyn Propagator,
    domains: &mut Domains,
    constraints: &[Constraint],
) -> PropagationReport {
    let before = domains.total_size();
    let report = propagator.propagate(domains, constraints);
    debug!(
        "{}: {} revision(s), {} -> {} candidate date(s)",
        propagator.name(),
        report.revisions,
        before,
        domains.total_size()
    );
    report
}

/// Schedules `n_meetings` meetings inside the inclusive `[range_start, range_end]`.
///
/// Returns `Ok(Some(schedule))` with one date per meeting, `Ok(None)` if the
/// constraints cannot all be met, and `Err` if the input breaks the caller
/// contract.
///
/// Search depth grows with `n_meetings`; see [`Backtracking::run`] for the
/// stack requirements of very large problems.
///
/// # Examples
///
/// ```
/// use calsat::constraints::{Comparison, Constraint};
/// use calsat::solver::solve;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
/// let constraints = [
///     Constraint::unary(0, Comparison::Equal, day(1)),
///     Constraint::binary(0, Comparison::NotEqual, 1),
/// ];
///
/// let schedule = solve(2, day(1), day(3), &constraints).unwrap().unwrap();
/// assert_eq!(schedule[0], day(1));
/// assert_ne!(schedule[1], day(1));
///
/// let impossible = [Constraint::binary(0, Comparison::NotEqual, 1)];
/// assert_eq!(solve(2, day(1), day(1), &impossible).unwrap(), None);
/// ```
pub fn solve(
    n_meetings: usize,
    range_start: NaiveDate,
    range_end: NaiveDate,
    constraints: &[Constraint],
) -> Result<Option<Schedule>, SolveError> {
    let problem = CalendarProblem::new(n_meetings, range_start, range_end)
        .with_constraints(constraints.iter().copied());
    CspSolver::default()
        .solve(&problem)
        .map(|solution| solution.schedule)
}
