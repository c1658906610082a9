use std::collections::{HashMap, VecDeque};

use common::error::Error;
use common::types::{Distance, NodeId};
use tracing::debug;

use super::graph::GraphCsr;

/// Recovers a negative cycle from the predecessor state and marks every node
/// it can reach as `Undefined`.
///
/// `start` is a node the engine proved to lie on, or downstream of, a
/// negative cycle. Walking predecessor edges backwards from it must revisit
/// a node within `num_nodes` steps: predecessors form a finite functional
/// graph, and a node genuinely tainted by a cycle has no dead end upstream.
/// The first revisited node anchors the cycle.
///
/// # Returns
/// The cycle as a closed forward node walk (first == last, consecutive
/// entries joined by real edges) together with the distance table updated so
/// that every node forward-reachable from the cycle is `Undefined`.
///
/// # Errors
/// - `Error::InvalidNode` if `start` is out of bounds.
/// - `Error::BrokenPredecessorChain` if the walk hits a node without a
///   predecessor.
/// - `Error::CycleExtractionFailed` if no repeat shows up within the bound.
///
/// The last two are contract violations: the engine invoked extraction
/// without a real cycle being present. They must surface, never be swallowed.
pub fn extract_negative_cycle(
    graph: &GraphCsr,
    start: NodeId,
    pred_edges: &[Option<usize>],
    mut distances: Vec<Distance>,
) -> Result<(Vec<NodeId>, Vec<Distance>), Error> {
    if start >= graph.num_nodes {
        return Err(Error::InvalidNode(start));
    }

    // Backward walk, recording each node's position for O(1) repeat checks.
    let mut walk: Vec<NodeId> = Vec::new();
    let mut seen_at: HashMap<NodeId, usize> = HashMap::new();
    let mut node = start;

    let repeat_at = loop {
        if let Some(&pos) = seen_at.get(&node) {
            break pos;
        }
        if walk.len() > graph.num_nodes {
            return Err(Error::CycleExtractionFailed);
        }
        seen_at.insert(node, walk.len());
        walk.push(node);

        let edge_idx = pred_edges[node].ok_or(Error::BrokenPredecessorChain(node))?;
        node = graph.edge_source(edge_idx)?;
    };

    // walk[repeat_at..] is the cycle in backward order; close it and reverse
    // to get a forward walk whose consecutive pairs are real edges.
    let mut cycle: Vec<NodeId> = walk[repeat_at..].to_vec();
    cycle.push(walk[repeat_at]);
    cycle.reverse();

    debug!(?cycle, "negative cycle reconstructed");

    // Everything forward-reachable from the cycle has no finite minimum.
    // Marking is idempotent: an already-Undefined node is never re-queued.
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    for &v in &cycle {
        if distances[v] != Distance::Undefined {
            distances[v] = Distance::Undefined;
            queue.push_back(v);
        }
    }
    while let Some(u) = queue.pop_front() {
        for (_, v, _) in graph.out_edges(u) {
            if distances[v] != Distance::Undefined {
                distances[v] = Distance::Undefined;
                queue.push_back(v);
            }
        }
    }

    Ok((cycle, distances))
}
