use common::error::Error;
use common::types::{Edge, NodeId};

pub enum AddEdgeResult {
    Success,
    RebuildNeeded(Vec<Edge>),
}

/// Directed weighted graph in Compressed Sparse Row (CSR) format.
///
/// CSR stores the outgoing edges of each node contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from node `u`
/// - `edge_targets[i]` -> target node of edge `i`
/// - `edge_weights[i]` -> signed weight of edge `i`
/// - `edge_source_by_index[i]` -> source node of edge `i`
///
/// This gives O(out-degree) traversal of a node's edges and O(1) edge-to-source
/// lookup, which the cycle extractor relies on when walking predecessor edges.
/// Weights are stored as-is; negative, zero, and positive values are all legal.
///
/// Pending updates are batched and applied on rebuild to keep the streaming
/// front end cheap between searches.
#[derive(Debug, Clone)]
pub struct GraphCsr {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<NodeId>,
    pub edge_weights: Vec<f64>,
    pub edge_source_by_index: Vec<NodeId>,
    pub rebuild_limit: usize,
    pub pending_updates: Vec<Edge>,
}

impl GraphCsr {
    /// Creates a new CSR graph from a list of edges `(src, dst, weight)`.
    ///
    /// Duplicate `(src, dst)` pairs are collapsed to the last occurrence in
    /// the input (no multigraph support: last write wins). Self-loops are
    /// permitted.
    ///
    /// # Arguments
    /// - `num_nodes`: total number of nodes (graph indices: 0..num_nodes-1)
    /// - `edges`: list of `(src, dst, weight)` tuples
    /// - `rebuild_limit`: number of pending updates before a rebuild is signalled
    ///
    /// # Errors
    /// Returns `Error::InvalidNode` if any endpoint lies outside
    /// `[0, num_nodes)`. Validation happens before any relaxation can run.
    pub fn from_edges(
        num_nodes: usize,
        mut edges: Vec<Edge>,
        rebuild_limit: usize,
    ) -> Result<Self, Error> {
        for &(u, v, _) in &edges {
            if u >= num_nodes {
                return Err(Error::InvalidNode(u));
            }
            if v >= num_nodes {
                return Err(Error::InvalidNode(v));
            }
        }

        // Stable sort keeps input order within equal keys; reversing before
        // dedup therefore keeps the *latest* write for each (src, dst) pair.
        edges.sort_by_key(|&(src, dst, _)| (src, dst));
        edges.reverse();
        edges.dedup_by_key(|(src, dst, _)| (*src, *dst));

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, &edges);

        Ok(Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
            rebuild_limit,
            pending_updates: Vec::new(),
        })
    }

    /// Internal helper constructing the four CSR arrays with the two-pass
    /// counting technique. The input does not need to be sorted; counting
    /// places each edge in its source node's contiguous block.
    fn build_csr_from_edges(
        num_nodes: usize,
        edges: &[Edge],
    ) -> (Vec<usize>, Vec<NodeId>, Vec<f64>, Vec<NodeId>) {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for &(u, _, _) in edges {
            node_pointers[u + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0.0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for &(u, v, weight) in edges {
            let pos = cursor[u]; // Next free slot in node u's block
            edge_targets[pos] = v;
            edge_weights[pos] = weight;
            edge_source_by_index[pos] = u;
            cursor[u] += 1;
        }

        (
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        )
    }

    /// Iterates over the out-edges of `u` as `(edge_index, target, weight)`.
    ///
    /// O(out-degree); the edge index can be stored and later resolved back to
    /// its source via [`GraphCsr::edge_source`].
    pub fn out_edges(&self, u: NodeId) -> impl Iterator<Item = (usize, NodeId, f64)> + '_ {
        let start = self.node_pointers[u];
        let end = self.node_pointers[u + 1];
        (start..end).map(move |i| (i, self.edge_targets[i], self.edge_weights[i]))
    }

    /// O(1) lookup for the source node of a given edge index.
    ///
    /// # Errors
    /// Returns `Error::InvalidNode` if `edge_idx` is out of bounds.
    pub fn edge_source(&self, edge_idx: usize) -> Result<NodeId, Error> {
        self.edge_source_by_index
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidNode(edge_idx))
    }

    /// Weight of the edge `u -> v`, if present. Linear in out-degree of `u`;
    /// intended for result validation, not the hot path.
    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        if u >= self.num_nodes {
            return None;
        }
        self.out_edges(u)
            .find(|&(_, target, _)| target == v)
            .map(|(_, _, w)| w)
    }

    /// Sum of all strictly negative edge weights in the graph.
    ///
    /// A valid lower bound for any shortest path that does not traverse a
    /// negative cycle: a simple path can use each negative edge at most once.
    /// The engine uses it as a fast-fail divergence floor.
    pub fn negative_weight_sum(&self) -> f64 {
        self.edge_weights.iter().filter(|w| **w < 0.0).sum()
    }

    /// Attempts to add a batch of new edges to the internal buffer.
    /// If the buffer limit is reached, it atomically extracts (via O(1) swap)
    /// the full accumulated edge list and signals that a rebuild is required.
    pub fn add_edges_and_extract_data(&mut self, edges: Vec<Edge>) -> AddEdgeResult {
        self.pending_updates.extend(edges);

        if self.pending_updates.len() >= self.rebuild_limit {
            let edges_to_rebuild = std::mem::take(&mut self.pending_updates);

            return AddEdgeResult::RebuildNeeded(edges_to_rebuild);
        }
        AddEdgeResult::Success
    }

    /// Fully rebuilds the CSR structure by incorporating a new set of edges.
    ///
    /// Existing edges are extracted, merged with `new_edges` (a new edge for
    /// an existing `(src, dst)` pair replaces the old weight), and the node
    /// count grows to cover the highest endpoint seen. O(E log E).
    pub fn rebuild_with_edges(&mut self, new_edges: Vec<Edge>) {
        let mut edges: Vec<Edge> = Vec::with_capacity(self.edge_targets.len() + new_edges.len());

        // Existing edges first so that new_edges win the dedup below.
        for src in 0..self.num_nodes {
            let start = self.node_pointers[src];
            let end = self.node_pointers[src + 1];
            for j in start..end {
                edges.push((src, self.edge_targets[j], self.edge_weights[j]));
            }
        }

        let mut new_edges = new_edges;
        edges.append(&mut new_edges);

        // Sort and deduplicate by (src, dst), keeping the latest write.
        edges.sort_by_key(|&(src, dst, _)| (src, dst));
        edges.reverse();
        edges.dedup_by_key(|(src, dst, _)| (*src, *dst));

        let num_nodes = edges
            .iter()
            .flat_map(|&(u, v, _)| [u, v])
            .max()
            .map_or(0, |max_id| max_id + 1);

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, &edges);

        self.num_nodes = num_nodes;
        self.node_pointers = node_pointers;
        self.edge_targets = edge_targets;
        self.edge_weights = edge_weights;
        self.edge_source_by_index = edge_source_by_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_creates_correct_csr_for_small_graph() {
        let edges = vec![(2, 1, -0.5), (0, 2, 1.5), (0, 1, 2.0)]; // Un-sorted edges
        let csr = GraphCsr::from_edges(3, edges, 3).unwrap();

        assert_eq!(csr.node_pointers, vec![0, 2, 2, 3]);
        assert_eq!(csr.num_nodes, 3);
        assert!(csr.pending_updates.is_empty());
        assert_eq!(csr.rebuild_limit, 3);

        assert_eq!(csr.edge_weight(0, 1), Some(2.0));
        assert_eq!(csr.edge_weight(0, 2), Some(1.5));
        assert_eq!(csr.edge_weight(2, 1), Some(-0.5));
    }

    #[test]
    fn node_with_no_outgoing_edges() {
        let csr = GraphCsr::from_edges(3, vec![(0, 2, 1.0)], 3).unwrap();

        assert_eq!(csr.node_pointers, vec![0, 1, 1, 1]);
        assert_eq!(csr.edge_targets, vec![2]);
        assert_eq!(csr.edge_weights, vec![1.0]);
    }

    #[test]
    fn single_node_graph() {
        let csr = GraphCsr::from_edges(1, vec![], 1).unwrap();

        assert_eq!(csr.num_nodes, 1);
        assert_eq!(csr.node_pointers, vec![0, 0]);
        assert!(csr.edge_targets.is_empty());
    }

    #[test]
    fn empty_graph() {
        let csr = GraphCsr::from_edges(0, vec![], 1).unwrap();

        assert_eq!(csr.num_nodes, 0);
        assert_eq!(csr.node_pointers, vec![0]);
        assert!(csr.edge_targets.is_empty());
    }

    #[test]
    fn out_of_range_source_rejected() {
        let result = GraphCsr::from_edges(3, vec![(3, 0, 1.0)], 3);
        assert!(matches!(result, Err(Error::InvalidNode(3))));
    }

    #[test]
    fn out_of_range_target_rejected() {
        let result = GraphCsr::from_edges(3, vec![(0, 7, 1.0)], 3);
        assert!(matches!(result, Err(Error::InvalidNode(7))));
    }

    #[test]
    fn duplicate_edge_keeps_latest() {
        let csr = GraphCsr::from_edges(2, vec![(0, 1, 1.0), (0, 1, -4.0)], 3).unwrap();

        assert_eq!(csr.edge_targets, vec![1]);
        assert_eq!(csr.edge_weight(0, 1), Some(-4.0));
    }

    #[test]
    fn self_loop_is_permitted() {
        let csr = GraphCsr::from_edges(2, vec![(1, 1, -1.0)], 3).unwrap();
        assert_eq!(csr.edge_weight(1, 1), Some(-1.0));
    }

    #[test]
    fn negative_weight_sum_counts_only_negatives() {
        let edges = vec![(0, 1, 1.0), (1, 2, -1.0), (1, 3, -50.0), (2, 1, 0.0)];
        let csr = GraphCsr::from_edges(4, edges, 4).unwrap();
        assert_eq!(csr.negative_weight_sum(), -51.0);
    }

    #[test]
    fn negative_weight_sum_is_zero_without_negatives() {
        let csr = GraphCsr::from_edges(2, vec![(0, 1, 3.0)], 2).unwrap();
        assert_eq!(csr.negative_weight_sum(), 0.0);
    }

    #[test]
    fn out_edges_reports_index_target_weight() {
        let csr = GraphCsr::from_edges(3, vec![(1, 0, 2.0), (1, 2, -3.0)], 3).unwrap();

        let edges: Vec<_> = csr.out_edges(1).collect();
        assert_eq!(edges.len(), 2);
        for (idx, target, weight) in edges {
            assert_eq!(csr.edge_source(idx).unwrap(), 1);
            assert_eq!(csr.edge_weight(1, target), Some(weight));
        }
        assert!(csr.out_edges(0).next().is_none());
    }

    #[test]
    fn edge_source_out_of_bounds_is_error() {
        let csr = GraphCsr::from_edges(2, vec![(0, 1, 1.0)], 2).unwrap();
        assert!(csr.edge_source(0).is_ok());
        assert!(csr.edge_source(1).is_err());
    }

    #[test]
    fn rebuild_merges_pending_updates_correctly() {
        let mut csr = GraphCsr::from_edges(3, vec![(0, 1, 1.0), (1, 2, 1.5)], 2).unwrap();

        csr.pending_updates = vec![(2, 0, 2.0)];
        let pending = std::mem::take(&mut csr.pending_updates);
        csr.rebuild_with_edges(pending);

        assert_eq!(csr.edge_targets.len(), 3);
        assert_eq!(csr.edge_targets.iter().sum::<usize>(), 0 + 1 + 2);
        assert!(csr.pending_updates.is_empty());
    }

    #[test]
    fn rebuild_deduplicates_by_keeping_latest() {
        let mut csr = GraphCsr::from_edges(2, vec![(0, 1, 1.0)], 2).unwrap();
        csr.rebuild_with_edges(vec![(0, 1, -2.0)]);

        assert_eq!(csr.edge_targets, vec![1]);
        assert_eq!(csr.edge_weights, vec![-2.0]);
    }

    #[test]
    fn rebuild_is_idempotent_when_empty() {
        let csr_original = GraphCsr::from_edges(2, vec![(0, 1, 1.0)], 2).unwrap();
        let mut csr = csr_original.clone();

        csr.rebuild_with_edges(Vec::new());
        assert_eq!(csr.node_pointers, csr_original.node_pointers);
        assert_eq!(csr.edge_targets, csr_original.edge_targets);
        assert_eq!(csr.edge_weights, csr_original.edge_weights);
    }

    #[test]
    fn rebuild_grows_node_count() {
        let mut csr = GraphCsr::from_edges(0, vec![], 1).unwrap();
        csr.rebuild_with_edges(vec![(0, 1, 1.0)]);

        assert_eq!(csr.num_nodes, 2);
        assert_eq!(csr.edge_targets, vec![1]);
        assert_eq!(csr.node_pointers, vec![0, 1, 1]);
    }

    #[test]
    fn add_edges_below_limit_buffers_without_rebuild() {
        let mut csr = GraphCsr::from_edges(2, vec![(0, 1, 1.0)], 3).unwrap();

        let result = csr.add_edges_and_extract_data(vec![(1, 0, 2.0)]);

        assert!(matches!(result, AddEdgeResult::Success));
        assert_eq!(csr.pending_updates.len(), 1);
        assert_eq!(csr.edge_targets.len(), 1); // CSR arrays unchanged
    }

    #[test]
    fn add_edges_at_limit_extracts_and_leaves_buffer_empty() {
        let mut csr = GraphCsr::from_edges(2, vec![(0, 1, 1.0)], 1).unwrap();
        let updates = vec![(1, 0, 2.0)];

        let result = csr.add_edges_and_extract_data(updates);

        assert!(csr.pending_updates.is_empty());

        let extracted_edges = match result {
            AddEdgeResult::RebuildNeeded(edges) => edges,
            AddEdgeResult::Success => panic!("Expected RebuildNeeded result"),
        };

        csr.rebuild_with_edges(extracted_edges);

        assert_eq!(csr.edge_targets.len(), 2);
    }
}
