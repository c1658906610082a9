use common::types::{Distance, NodeId, NodeState};

use super::graph::GraphCsr;

/// Read-only view of the engine's state, emitted to observers.
///
/// Borrows the live tables; observers cannot mutate them, so a misbehaving
/// observer can only affect presentation, never correctness.
pub struct Snapshot<'a> {
    graph: &'a GraphCsr,
    pub distances: &'a [Distance],
    pub states: &'a [NodeState],
    pred_edges: &'a [Option<usize>],
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(
        graph: &'a GraphCsr,
        distances: &'a [Distance],
        pred_edges: &'a [Option<usize>],
        states: &'a [NodeState],
    ) -> Self {
        Self {
            graph,
            distances,
            states,
            pred_edges,
        }
    }

    /// Predecessor of `v` on its current best-known path, if any.
    pub fn predecessor(&self, v: NodeId) -> Option<NodeId> {
        self.pred_edges
            .get(v)
            .copied()
            .flatten()
            .and_then(|idx| self.graph.edge_source(idx).ok())
    }

    /// Full predecessor table as nodes, indexed by `NodeId`.
    pub fn predecessors(&self) -> Vec<Option<NodeId>> {
        (0..self.distances.len()).map(|v| self.predecessor(v)).collect()
    }
}

/// Hook for visualizing or logging the engine's progress.
///
/// Invoked synchronously: once before the first frontier scan, once after
/// each processed frontier element, and once with the final state. All
/// methods default to no-ops, so implementors override only what they need.
pub trait ProgressObserver {
    fn on_start(&mut self, _snapshot: &Snapshot<'_>) {}
    fn on_step(&mut self, _snapshot: &Snapshot<'_>) {}
    fn on_finish(&mut self, _snapshot: &Snapshot<'_>) {}
}

/// Default observer that ignores every event.
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {}
