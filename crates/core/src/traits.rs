use common::{
    error::Error,
    types::{NodeId, SearchOutcome},
};

use super::graph::GraphCsr;

/// Trait for solvers computing single-source shortest paths with
/// negative-cycle detection.
pub trait PathSolver {
    /// Computes least-cost distances from `source`, or proves a negative
    /// cycle reachable from it.
    ///
    /// Returns `Ok(SearchOutcome::Paths { .. })` on normal convergence,
    /// `Ok(SearchOutcome::NegativeCycle { .. })` when divergence is
    /// detected, or `Err(e)` on invalid input or an internal invariant
    /// violation.
    fn shortest_paths(&self, graph: &GraphCsr, source: NodeId) -> Result<SearchOutcome, Error>;
}
