//! Domain filtering that runs ahead of search.
//!
//! Two propagators shrink the [`Domains`] of a problem before backtracking
//! starts:
//!
//! - [`NodeConsistency`] applies every unary constraint to its variable.
//! - [`ArcConsistency`] applies every binary constraint in both directions
//!   with an AC-3 worklist until no domain changes any more.
//!
//! Neither propagator ever fails. A domain may end up empty, which proves the
//! problem has no solution; detecting that is left to the search.
//!
//! # Module Structure
//!
//! - [`node`] - unary filtering
//! - [`arc`] - arcs, the constraint graph and the worklist propagation

pub mod arc;
pub mod node;

use std::ops::AddAssign;

use crate::constraints::Constraint;
use crate::domain::Domains;

pub use arc::{arc_consistency, revise, ArcConsistency, ArcQueue, ConstraintArc, ConstraintGraph};
pub use node::{node_consistency, NodeConsistency};

/// What a propagation pass did to the domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropagationReport {
    /// Number of filtering steps performed (constraints applied or arcs revised).
    pub revisions: usize,
    /// Number of dates removed across all domains.
    pub removed: usize,
}

impl PropagationReport {
    /// Returns true if the pass removed at least one date.
    pub fn changed(&self) -> bool {
        self.removed > 0
    }
}

impl AddAssign for PropagationReport {
    fn add_assign(&mut self, other: Self) {
        self.revisions += other.revisions;
        self.removed += other.removed;
    }
}

/// A filtering pass over the domains of a problem.
///
/// # Contract
///
/// Implementations must:
/// - Only remove dates, never add them
/// - Never remove a date that takes part in some full solution
/// - Leave the domains untouched when run a second time on their own output
pub trait Propagator {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Shrinks `domains` according to `constraints`.
    fn propagate(&self, domains: &mut Domains, constraints: &[Constraint]) -> PropagationReport;
}
