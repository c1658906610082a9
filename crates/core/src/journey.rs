use common::error::Error;
use common::types::{Distance, NodeId};

use super::graph::GraphCsr;

/// Rebuilds the explicit node path from `source` to every node with a finite
/// distance, from the final predecessor state.
///
/// `journeys[v]` is `[source, .., v]` for reached nodes, `[source]` for the
/// source itself, and empty for unreached nodes (not an error). Relies on
/// the predecessor table being acyclic, which holds whenever the engine
/// terminated normally; the walk is still bounded defensively and a chain
/// longer than `num_nodes` surfaces as `BrokenPredecessorChain`.
pub fn reconstruct_journeys(
    graph: &GraphCsr,
    source: NodeId,
    pred_edges: &[Option<usize>],
    distances: &[Distance],
) -> Result<Vec<Vec<NodeId>>, Error> {
    let n = graph.num_nodes;
    let mut journeys = vec![Vec::new(); n];

    for v in 0..n {
        if v == source {
            journeys[v] = vec![source];
            continue;
        }
        if !distances[v].is_finite() {
            continue;
        }

        let mut path = vec![v];
        let mut current = v;
        while current != source {
            if path.len() > n {
                return Err(Error::BrokenPredecessorChain(v));
            }
            let edge_idx = pred_edges[current].ok_or(Error::BrokenPredecessorChain(current))?;
            current = graph.edge_source(edge_idx)?;
            path.push(current);
        }
        path.reverse();
        journeys[v] = path;
    }

    Ok(journeys)
}
