use common::error::Error;
use common::types::{Distance, NodeId, NodeState, SearchOutcome};
use tracing::{debug, trace};

use super::cycle::extract_negative_cycle;
use super::graph::GraphCsr;
use super::journey::reconstruct_journeys;
use super::observer::{NoopObserver, ProgressObserver, Snapshot};
use super::traits::PathSolver;

/// Worklist label-correcting solver (SPFA-style) for single-source shortest
/// paths over graphs that may contain negative-weight edges.
///
/// Classical relaxation never converges in the presence of a negative cycle
/// reachable from the source, so the engine layers three divergence triggers
/// on top of the relaxation loop:
///
/// 1. the source itself is relaxed (a source-to-source path with negative
///    total exists);
/// 2. a distance drops below the sum of all strictly negative edge weights
///    (impossible without repeating a negative edge);
/// 3. total frontier appends exceed `n(n-1)/2 + 1`, more than any converging
///    run can produce.
///
/// The first two are fast paths, the third is the backstop that bounds the
/// work. Any trigger hands the offending node to the cycle extractor.
pub struct SpfaEngine;

impl SpfaEngine {
    /// Runs the search with a progress observer attached.
    ///
    /// The observer receives a read-only snapshot once before the first
    /// frontier scan, once after each processed frontier element, and once
    /// with the final state. See [`PathSolver::shortest_paths`] for the
    /// result contract.
    ///
    /// # Errors
    /// `Error::InvalidNode` if `source` is out of bounds; the extraction
    /// errors only when a divergence trigger fired without a real cycle,
    /// which is an engine defect and intentionally loud.
    pub fn shortest_paths_observed<O: ProgressObserver>(
        &self,
        graph: &GraphCsr,
        source: NodeId,
        observer: &mut O,
    ) -> Result<SearchOutcome, Error> {
        let n = graph.num_nodes;
        if source >= n {
            return Err(Error::InvalidNode(source));
        }

        let mut distances = vec![Distance::Unreached; n];
        let mut pred_edges: Vec<Option<usize>> = vec![None; n];
        let mut states = vec![NodeState::Unvisited; n];

        // Append-only frontier scanned by cursor, not a true queue: its total
        // length doubles as the divergence backstop. `pending[v]` marks nodes
        // sitting at or after the cursor; those are never re-queued.
        let mut frontier: Vec<NodeId> = Vec::with_capacity(n);
        let mut pending = vec![false; n];

        distances[source] = Distance::Finite(0.0);
        frontier.push(source);
        pending[source] = true;
        states[source] = NodeState::Queued;

        // No cycle-free path can go below `floor`: a simple path uses each
        // negative edge at most once. `frontier_cap` is tuned so that the
        // worst-case converging run lands exactly on the limit without
        // tripping it.
        let floor = graph.negative_weight_sum();
        let frontier_cap = n * n.saturating_sub(1) / 2 + 1;

        debug!(
            num_nodes = n,
            source, floor, frontier_cap, "starting shortest-path search"
        );
        observer.on_start(&Snapshot::new(graph, &distances, &pred_edges, &states));

        let mut cursor = 0;
        while cursor < frontier.len() {
            let m = frontier[cursor];
            pending[m] = false;

            let Distance::Finite(base) = distances[m] else {
                // Only relaxed nodes are ever queued.
                cursor += 1;
                continue;
            };

            for (edge_idx, v, weight) in graph.out_edges(m) {
                let candidate = base + weight;
                if !distances[v].improved_by(candidate) {
                    continue;
                }
                distances[v] = Distance::Finite(candidate);
                pred_edges[v] = Some(edge_idx);
                trace!(from = m, node = v, candidate, "relaxed");

                if v == source || candidate < floor {
                    debug!(node = v, candidate, "divergence detected during relaxation");
                    let (cycle, distances) =
                        extract_negative_cycle(graph, v, &pred_edges, distances)?;
                    observer.on_finish(&Snapshot::new(graph, &distances, &pred_edges, &states));
                    return Ok(SearchOutcome::NegativeCycle { cycle, distances });
                }

                if !pending[v] {
                    frontier.push(v);
                    pending[v] = true;
                    states[v] = NodeState::Queued;
                }
            }

            states[m] = NodeState::Settled;

            if frontier.len() > frontier_cap {
                debug!(
                    frontier_len = frontier.len(),
                    frontier_cap, "frontier overflow, extracting cycle"
                );
                let (cycle, distances) = extract_negative_cycle(graph, m, &pred_edges, distances)?;
                observer.on_finish(&Snapshot::new(graph, &distances, &pred_edges, &states));
                return Ok(SearchOutcome::NegativeCycle { cycle, distances });
            }

            observer.on_step(&Snapshot::new(graph, &distances, &pred_edges, &states));
            cursor += 1;
        }

        let journeys = reconstruct_journeys(graph, source, &pred_edges, &distances)?;
        debug!(
            reached = journeys.iter().filter(|j| !j.is_empty()).count(),
            "search converged"
        );
        observer.on_finish(&Snapshot::new(graph, &distances, &pred_edges, &states));
        Ok(SearchOutcome::Paths {
            distances,
            journeys,
        })
    }
}

impl PathSolver for SpfaEngine {
    fn shortest_paths(&self, graph: &GraphCsr, source: NodeId) -> Result<SearchOutcome, Error> {
        self.shortest_paths_observed(graph, source, &mut NoopObserver)
    }
}
