//! Node consistency: unary constraints applied to single domains.

use log::{trace, warn};

use super::{PropagationReport, Propagator};
use crate::constraints::Constraint;
use crate::domain::Domains;

/// Filters each domain with the unary constraints on its variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeConsistency;

impl Propagator for NodeConsistency {
    fn name(&self) -> &'static str {
        "node-consistency"
    }

    fn propagate(&self, domains: &mut Domains, constraints: &[Constraint]) -> PropagationReport {
        node_consistency(domains, constraints)
    }
}

/// Keeps in every variable's domain only the dates allowed by all unary
/// constraints on that variable.
///
/// Several unary constraints on the same variable intersect, so the order in
/// which they are applied does not matter. Binary constraints are skipped.
///
/// # Panics
///
/// Panics if a unary constraint references a variable without a domain.
pub fn node_consistency(domains: &mut Domains, constraints: &[Constraint]) -> PropagationReport {
    let mut report = PropagationReport::default();

    for unary in constraints.iter().filter_map(Constraint::as_unary) {
        let domain = &mut domains[unary.var];
        let removed = domain.retain(|date| unary.admits(date));
        report.revisions += 1;
        report.removed += removed;

        if removed > 0 {
            trace!("{unary}: removed {removed} date(s) from m{}", unary.var);
            if domain.is_empty() {
                warn!("{unary} emptied the domain of m{}", unary.var);
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Comparison;
    use crate::test_utils::{d, dates};

    fn dates_of(domains: &Domains, var: usize) -> Vec<chrono::NaiveDate> {
        domains[var].iter().copied().collect()
    }

    #[test]
    fn unary_equal_pins_the_variable() {
        let mut domains = Domains::full(2, d(1), d(3));
        let constraints = [Constraint::unary(0, Comparison::Equal, d(1))];

        let report = node_consistency(&mut domains, &constraints);

        assert_eq!(dates_of(&domains, 0), vec![d(1)]);
        assert_eq!(dates_of(&domains, 1), dates(1, 3));
        assert_eq!(report.removed, 2);
        assert_eq!(report.revisions, 1);
    }

    #[test]
    fn multiple_unary_constraints_intersect() {
        let mut domains = Domains::full(1, d(1), d(10));
        let constraints = [
            Constraint::unary(0, Comparison::After, d(3)),
            Constraint::unary(0, Comparison::OnOrBefore, d(6)),
            Constraint::unary(0, Comparison::NotEqual, d(5)),
        ];

        node_consistency(&mut domains, &constraints);

        assert_eq!(dates_of(&domains, 0), vec![d(4), d(6)]);
    }

    #[test]
    fn order_of_unary_constraints_is_irrelevant() {
        let forward = [
            Constraint::unary(0, Comparison::OnOrAfter, d(2)),
            Constraint::unary(0, Comparison::Before, d(5)),
        ];
        let backward = [forward[1], forward[0]];

        let mut a = Domains::full(1, d(1), d(7));
        let mut b = a.clone();
        node_consistency(&mut a, &forward);
        node_consistency(&mut b, &backward);

        assert_eq!(a, b);
    }

    #[test]
    fn binary_constraints_are_ignored() {
        let mut domains = Domains::full(2, d(1), d(3));
        let original = domains.clone();
        let constraints = [Constraint::binary(0, Comparison::Before, 1)];

        let report = node_consistency(&mut domains, &constraints);

        assert_eq!(domains, original);
        assert_eq!(report, PropagationReport::default());
    }

    #[test]
    fn contradictory_unary_constraints_empty_the_domain() {
        let mut domains = Domains::full(1, d(1), d(5));
        let constraints = [
            Constraint::unary(0, Comparison::Before, d(2)),
            Constraint::unary(0, Comparison::After, d(4)),
        ];

        node_consistency(&mut domains, &constraints);

        assert!(domains[0].is_empty());
    }

    #[test]
    fn reference_outside_range() {
        let mut domains = Domains::full(1, d(10), d(12));
        let constraints = [Constraint::unary(0, Comparison::After, d(1))];

        let report = node_consistency(&mut domains, &constraints);

        assert_eq!(report.removed, 0);
        assert_eq!(domains[0].len(), 3);
    }

    #[test]
    fn running_twice_is_idempotent() {
        let constraints = [
            Constraint::unary(0, Comparison::WithinDays(1), d(4)),
            Constraint::unary(1, Comparison::DaysApart(2), d(1)),
        ];
        let mut domains = Domains::full(2, d(1), d(8));

        node_consistency(&mut domains, &constraints);
        let once = domains.clone();
        let second = node_consistency(&mut domains, &constraints);

        assert_eq!(domains, once);
        assert!(!second.changed());
        assert_eq!(dates_of(&domains, 0), dates(3, 5));
        assert_eq!(dates_of(&domains, 1), vec![d(3)]);
    }

    #[test]
    fn propagator_trait_delegates() {
        let mut domains = Domains::full(1, d(1), d(3));
        let constraints = [Constraint::unary(0, Comparison::NotEqual, d(2))];

        let report = NodeConsistency.propagate(&mut domains, &constraints);

        assert_eq!(NodeConsistency.name(), "node-consistency");
        assert_eq!(report.removed, 1);
    }
}
