//! Depth-first backtracking over the filtered domains.
//!
//! Meetings are assigned in index order onto a single stack of dates. For
//! meeting `k` every date left in its domain is tried in ascending order:
//!
//! 1. push the date,
//! 2. check every constraint whose highest variable is `k` (constraints on
//!    lower variables only were already checked further up the stack),
//! 3. on success recurse into meeting `k + 1`,
//! 4. otherwise pop exactly the date pushed in step 1 and try the next one.
//!
//! The first full-length stack is returned. When the domain of meeting 0 is
//! exhausted the problem has no solution.
//!
//! Search only reads the domains; all filtering happens beforehand in
//! [`consistency`](crate::consistency).

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use log::{debug, trace};

use crate::constraints::Constraint;
use crate::domain::Domains;
use crate::schedule::Schedule;

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Tentative assignments pushed onto the stack.
    pub nodes: u64,
    /// Times a meeting ran out of candidate dates.
    pub backtracks: u64,
}

#[derive(Debug, Default)]
struct Counters {
    nodes: AtomicU64,
    backtracks: AtomicU64,
}

impl Counters {
    fn node(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    fn backtrack(&self) {
        self.backtracks.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> SearchStats {
        SearchStats {
            nodes: self.nodes.load(Ordering::Relaxed),
            backtracks: self.backtracks.load(Ordering::Relaxed),
        }
    }
}

/// Backtracking search over a fixed set of domains and constraints.
#[derive(Debug)]
pub struct Backtracking<'a> {
    domains: &'a Domains,
    /// `checks[k]`: constraints whose highest referenced variable is `k`.
    checks: Vec<Vec<&'a Constraint>>,
    counters: Counters,
}

impl<'a> Backtracking<'a> {
    /// Prepares a search over `domains`.
    ///
    /// # Panics
    ///
    /// Panics if a constraint references a variable without a domain.
    pub fn new(domains: &'a Domains, constraints: &'a [Constraint]) -> Self {
        let mut checks = vec![Vec::new(); domains.len()];
        for constraint in constraints {
            let last = constraint.max_variable();
            assert!(
                last < domains.len(),
                "{constraint} references a variable outside 0..{}",
                domains.len()
            );
            checks[last].push(constraint);
        }

        Self {
            domains,
            checks,
            counters: Counters::default(),
        }
    }

    /// Number of meetings to assign.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Counters accumulated by every run on this instance so far.
    pub fn stats(&self) -> SearchStats {
        self.counters.snapshot()
    }

    /// Searches from meeting 0 and returns the first complete schedule found.
    ///
    /// # Panics
    ///
    /// The search recurses once per meeting (two frames each), so very large
    /// meeting counts can overflow the thread's stack. A few thousand meetings
    /// fit in a default 2 MiB thread; run larger problems on a thread built
    /// with a bigger stack.
    pub fn run(&self) -> Option<Schedule> {
        let mut assignment = Vec::with_capacity(self.len());
        let found = self.complete(&mut assignment);
        debug!(
            "search {}: {:?}",
            if found { "succeeded" } else { "exhausted" },
            self.stats()
        );
        found.then(|| Schedule::from(assignment))
    }

    /// Explores the candidates of meeting 0 as independent subtrees on the
    /// rayon pool, each with its own stack.
    ///
    /// Which schedule is returned may vary between runs when several exist.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> Option<Schedule> {
        use rayon::prelude::*;

        let Some(roots) = self.domains.first() else {
            return Some(Schedule::new());
        };

        let found = roots.iter().copied().collect::<Vec<_>>().into_par_iter().find_map_any(|date| {
            let mut assignment = Vec::with_capacity(self.len());
            self.try_date(&mut assignment, date)
                .then(|| Schedule::from(assignment))
        });

        if found.is_none() {
            self.counters.backtrack();
        }
        debug!("parallel search finished: {:?}", self.stats());
        found
    }

    /// Extends a partial assignment to a full one.
    ///
    /// `assignment` must hold consistent dates for meetings `0..assignment.len()`.
    /// On success it holds one date per meeting; on failure it is left exactly
    /// as it was passed in.
    pub fn complete(&self, assignment: &mut Vec<NaiveDate>) -> bool {
        let var = assignment.len();
        if var >= self.len() {
            return true;
        }

        for &date in self.domains[var].iter() {
            if self.try_date(assignment, date) {
                return true;
            }
            debug_assert_eq!(assignment.len(), var, "failed branch leaked stack entries");
        }

        self.counters.backtrack();
        trace!("m{var}: no date left, backtracking");
        false
    }

    /// Pushes `date` for the next meeting and tries to finish from there.
    /// Pops it again if that fails.
    fn try_date(&self, assignment: &mut Vec<NaiveDate>, date: NaiveDate) -> bool {
        self.counters.node();
        assignment.push(date);
        if self.consistent(assignment) && self.complete(assignment) {
            return true;
        }
        assignment.pop();
        false
    }

    /// Checks the constraints that became fully assigned with the last push.
    fn consistent(&self, assignment: &[NaiveDate]) -> bool {
        let last = assignment.len() - 1;
        self.checks[last]
            .iter()
            .all(|c| c.check(assignment).unwrap_or(false))
    }
}

/// Runs a sequential backtracking search over `domains`.
pub fn backtrack(domains: &Domains, constraints: &[Constraint]) -> Option<Schedule> {
    Backtracking::new(domains, constraints).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Comparison;
    use crate::test_utils::d;

    #[test]
    fn no_meetings_yields_empty_schedule() {
        let domains = Domains::full(0, d(1), d(3));
        assert_eq!(backtrack(&domains, &[]), Some(Schedule::new()));
    }

    #[test]
    fn unconstrained_picks_earliest_dates() {
        let domains = Domains::full(3, d(1), d(3));
        let schedule = backtrack(&domains, &[]).unwrap();
        assert_eq!(schedule.dates(), &[d(1), d(1), d(1)]);
    }

    #[test]
    fn respects_binary_constraints_without_filtering() {
        let domains = Domains::full(3, d(1), d(3));
        let constraints = [
            Constraint::binary(0, Comparison::Before, 1),
            Constraint::binary(1, Comparison::Before, 2),
        ];

        let schedule = backtrack(&domains, &constraints).unwrap();

        assert_eq!(schedule.dates(), &[d(1), d(2), d(3)]);
    }

    #[test]
    fn respects_unary_constraints_without_filtering() {
        let domains = Domains::full(2, d(1), d(3));
        let constraints = [
            Constraint::unary(1, Comparison::After, d(2)),
            Constraint::binary(0, Comparison::DaysApart(-1), 1),
        ];

        let schedule = backtrack(&domains, &constraints).unwrap();

        assert_eq!(schedule.dates(), &[d(2), d(3)]);
    }

    #[test]
    fn empty_domain_fails_immediately() {
        let mut domains = Domains::full(2, d(1), d(3));
        domains[1].retain(|_| false);

        let search = Backtracking::new(&domains, &[]);

        assert_eq!(search.run(), None);
        // three dates for m0 tried, each dead-ends on m1
        assert_eq!(search.stats().nodes, 3);
    }

    #[test]
    fn exhaustion_reports_no_schedule() {
        let domains = Domains::full(3, d(1), d(2));
        let constraints = [
            Constraint::binary(0, Comparison::NotEqual, 1),
            Constraint::binary(1, Comparison::NotEqual, 2),
            Constraint::binary(0, Comparison::NotEqual, 2),
        ];

        let search = Backtracking::new(&domains, &constraints);

        assert_eq!(search.run(), None);
        assert!(search.stats().backtracks > 0);
    }

    #[test]
    fn failed_branch_restores_stack() {
        let domains = Domains::full(3, d(1), d(3));
        // m0 = d(3) leaves nothing for m1 > m0
        let constraints = [Constraint::binary(1, Comparison::After, 0)];
        let search = Backtracking::new(&domains, &constraints);

        let mut assignment = vec![d(3)];
        assert!(!search.complete(&mut assignment));
        assert_eq!(assignment, vec![d(3)]);

        let mut assignment = vec![d(1)];
        assert!(search.complete(&mut assignment));
        assert_eq!(assignment.len(), 3);
    }

    #[test]
    fn constraints_checked_once_fully_assigned() {
        let domains = Domains::full(3, d(1), d(2));
        // only checkable when m2 is placed
        let constraints = [Constraint::binary(2, Comparison::After, 0)];

        let schedule = backtrack(&domains, &constraints).unwrap();

        assert_eq!(schedule.dates(), &[d(1), d(1), d(2)]);
    }

    #[test]
    fn self_referencing_constraint() {
        let domains = Domains::full(1, d(1), d(3));
        let impossible = [Constraint::binary(0, Comparison::NotEqual, 0)];
        let trivial = [Constraint::binary(0, Comparison::Equal, 0)];

        assert_eq!(backtrack(&domains, &impossible), None);
        assert_eq!(backtrack(&domains, &trivial).map(|s| s.len()), Some(1));
    }

    #[test]
    fn thousands_of_meetings_fit_default_stack() {
        let domains = Domains::full(2_000, d(1), d(1));
        assert_eq!(backtrack(&domains, &[]).map(|s| s.len()), Some(2_000));
    }

    #[test]
    fn deeper_search_runs_on_larger_stack() {
        let schedule = std::thread::Builder::new()
            .stack_size(256 * 1024 * 1024)
            .spawn(|| {
                let domains = Domains::full(20_000, d(1), d(1));
                backtrack(&domains, &[])
            })
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(schedule.map(|s| s.len()), Some(20_000));
    }

    #[test]
    #[should_panic(expected = "outside 0..2")]
    fn rejects_unknown_variable() {
        let domains = Domains::full(2, d(1), d(2));
        let constraints = [Constraint::unary(2, Comparison::Equal, d(1))];
        Backtracking::new(&domains, &constraints);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_search_finds_valid_schedule() {
        let domains = Domains::full(4, d(1), d(6));
        let constraints = [
            Constraint::binary(0, Comparison::After, 1),
            Constraint::binary(1, Comparison::After, 2),
            Constraint::binary(2, Comparison::After, 3),
            Constraint::unary(0, Comparison::OnOrAfter, d(5)),
        ];

        let schedule = Backtracking::new(&domains, &constraints).run_parallel().unwrap();

        assert!(schedule.satisfies(&constraints));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_search_reports_no_schedule() {
        let domains = Domains::full(2, d(1), d(1));
        let constraints = [Constraint::binary(0, Comparison::NotEqual, 1)];

        assert_eq!(Backtracking::new(&domains, &constraints).run_parallel(), None);
    }
}
