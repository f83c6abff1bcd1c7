//! Arc consistency with an AC-3 style worklist.
//!
//! Every binary constraint `left <op> right` produces two directed arcs:
//!
//! ```text
//!   (left  -> right, left <op> right)
//!   (right -> left,  right <op.reverse()> left)
//! ```
//!
//! Revising an arc `tail -> head` removes every date of `tail` that has no
//! supporting date in `head`. Whenever a revision removes something, all arcs
//! pointing *into* `tail` are queued again, since their support may be gone.
//!
//! The arcs are stored as edges of a [`petgraph`] directed graph whose nodes
//! are the meeting variables, so "all arcs whose head is `v`" is simply the
//! set of incoming edges of node `v`.

use std::collections::{HashSet, VecDeque};
use std::fmt::Display;
use std::hash::Hash;

use log::{debug, trace, warn};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use super::{PropagationReport, Propagator};
use crate::constraints::{BinaryConstraint, Constraint};
use crate::domain::Domains;
use crate::VarId;

/// Directed propagation edge: `tail` is pruned using `head` as support.
///
/// The constraint is always oriented so that its left operand is `tail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintArc {
    pub tail: VarId,
    pub head: VarId,
    pub constraint: BinaryConstraint,
}

impl ConstraintArc {
    /// Builds the arc that prunes `constraint.left` against `constraint.right`.
    pub fn forward(constraint: BinaryConstraint) -> Self {
        Self {
            tail: constraint.left,
            head: constraint.right,
            constraint,
        }
    }

    /// Returns both arcs of a binary constraint, forward first.
    pub fn pair(constraint: BinaryConstraint) -> [Self; 2] {
        let reversed = constraint.reverse();
        debug_assert_eq!(
            reversed.reverse(),
            constraint,
            "reversing {constraint} twice must give it back"
        );
        [Self::forward(constraint), Self::forward(reversed)]
    }
}

impl Display for ConstraintArc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} -> {} | {})", self.tail, self.head, self.constraint)
    }
}

/// All arcs of a problem, as a directed graph over the meeting variables.
#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    graph: DiGraph<VarId, ConstraintArc>,
}

impl ConstraintGraph {
    /// Builds the graph for `n_vars` variables from the binary constraints in
    /// `constraints`. Unary constraints are skipped and duplicate arcs collapse.
    ///
    /// # Panics
    ///
    /// Panics if a binary constraint references a variable `>= n_vars`.
    pub fn build(n_vars: usize, constraints: &[Constraint]) -> Self {
        let mut graph = DiGraph::with_capacity(n_vars, 2 * constraints.len());
        for var in 0..n_vars {
            graph.add_node(var);
        }

        let mut seen = HashSet::new();
        for binary in constraints.iter().filter_map(Constraint::as_binary) {
            for arc in ConstraintArc::pair(*binary) {
                if seen.insert(arc) {
                    assert!(
                        arc.tail < n_vars && arc.head < n_vars,
                        "{arc} references a variable outside 0..{n_vars}"
                    );
                    graph.add_edge(NodeIndex::new(arc.tail), NodeIndex::new(arc.head), arc);
                }
            }
        }

        Self { graph }
    }

    pub fn var_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Handles of every arc in the graph.
    pub fn arc_ids(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Returns the arc behind a handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn arc(&self, id: EdgeIndex) -> &ConstraintArc {
        &self.graph[id]
    }

    /// Iterates over all arcs.
    pub fn arcs(&self) -> impl Iterator<Item = &ConstraintArc> + '_ {
        self.graph.edge_weights()
    }

    /// Arcs whose head is `var`, i.e. arcs that use `var` as support.
    pub fn arcs_into(&self, var: VarId) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph
            .edges_directed(NodeIndex::new(var), Direction::Incoming)
            .map(|edge| edge.id())
    }
}

/// FIFO worklist that never holds the same item twice.
#[derive(Debug, Clone)]
pub struct ArcQueue<T> {
    order: VecDeque<T>,
    queued: HashSet<T>,
}

impl<T: Copy + Eq + Hash> ArcQueue<T> {
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            queued: HashSet::new(),
        }
    }

    /// Enqueues `item` unless it is already waiting. Returns true if added.
    pub fn push(&mut self, item: T) -> bool {
        let added = self.queued.insert(item);
        if added {
            self.order.push_back(item);
        }
        added
    }

    /// Removes the oldest waiting item.
    pub fn pop(&mut self) -> Option<T> {
        let item = self.order.pop_front()?;
        self.queued.remove(&item);
        Some(item)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T: Copy + Eq + Hash> Default for ArcQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> FromIterator<T> for ArcQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        for item in iter {
            queue.push(item);
        }
        queue
    }
}

/// Removes from `arc.tail` every date without support in `arc.head`.
///
/// A self-referencing arc (`tail == head`) keeps a date only if the
/// constraint holds between the date and itself.
///
/// Returns the number of dates removed.
pub fn revise(domains: &mut Domains, arc: &ConstraintArc) -> usize {
    let constraint = arc.constraint;

    if arc.tail == arc.head {
        return domains[arc.tail].retain(|date| constraint.is_satisfied_by(date, date));
    }

    let (tail, head) = domains.split_pair(arc.tail, arc.head);
    tail.retain(|date| head.iter().any(|&support| constraint.is_satisfied_by(date, support)))
}

/// Filters the domains with every binary constraint until a fixed point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcConsistency;

impl Propagator for ArcConsistency {
    fn name(&self) -> &'static str {
        "arc-consistency"
    }

    fn propagate(&self, domains: &mut Domains, constraints: &[Constraint]) -> PropagationReport {
        arc_consistency(domains, constraints)
    }
}

/// Runs the worklist propagation over all binary constraints.
///
/// The worklist starts with every arc. Each popped arc is revised; if the
/// revision shrank `tail`, every arc whose head is `tail` is queued again.
/// The loop ends when the worklist is empty, which always happens because
/// every re-queue is paid for by at least one removed date.
///
/// An emptied domain does not stop the propagation.
///
/// # Panics
///
/// Panics if a binary constraint references a variable without a domain.
pub fn arc_consistency(domains: &mut Domains, constraints: &[Constraint]) -> PropagationReport {
    let graph = ConstraintGraph::build(domains.len(), constraints);
    let mut queue: ArcQueue<EdgeIndex> = graph.arc_ids().collect();
    let mut report = PropagationReport::default();

    debug!(
        "arc consistency: {} arc(s) over {} variable(s)",
        graph.arc_count(),
        graph.var_count()
    );

    while let Some(id) = queue.pop() {
        let arc = graph.arc(id);
        let removed = revise(domains, arc);
        report.revisions += 1;

        if removed == 0 {
            continue;
        }

        report.removed += removed;
        trace!("revised {arc}: removed {removed} date(s)");
        if domains[arc.tail].is_empty() {
            warn!("{arc} emptied the domain of m{}", arc.tail);
        }

        for dependent in graph.arcs_into(arc.tail) {
            queue.push(dependent);
        }
    }

    report
}
