//! Configuration for the calendar solver.

/// Controls which phases run during a solve.
///
/// Filtering only speeds the search up: turning a phase off never changes
/// whether a schedule is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Apply unary constraints to the domains before searching.
    pub node_consistency: bool,
    /// Propagate binary constraints to a fixed point before searching.
    pub arc_consistency: bool,
    /// Explore the dates of meeting 0 in parallel.
    ///
    /// Only takes effect when the crate is built with the `parallel` feature.
    pub parallel_root: bool,
}

impl SolverConfig {
    /// Plain backtracking with no filtering at all.
    pub const fn unfiltered() -> Self {
        Self {
            node_consistency: false,
            arc_consistency: false,
            parallel_root: false,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_consistency: true,
            arc_consistency: true,
            parallel_root: false,
        }
    }
}
