/// Node identifier. Graphs use dense indices `0..num_nodes`.
pub type NodeId = usize;

/// Type alias for a single edge: (from, to, weight).
///
/// Weights are signed; negative, zero, and positive values are all legal.
pub type Edge = (NodeId, NodeId, f64);

/// Best-known length of the path from the source to a node.
///
/// A tagged enum rather than float sentinels: `Unreached` stands in for
/// `+inf` and `Undefined` for `-inf`, so neither can collide with a
/// genuinely huge finite distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// A concrete shortest-path length found so far.
    Finite(f64),
    /// No path from the source is known.
    Unreached,
    /// The node is reachable from a negative cycle; no finite minimum exists.
    Undefined,
}

impl Distance {
    /// Returns the finite length, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Unreached | Distance::Undefined => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    /// Whether a candidate length strictly improves on the current entry.
    ///
    /// Ties never relax; `Undefined` entries are final and cannot improve.
    pub fn improved_by(&self, candidate: f64) -> bool {
        match self {
            Distance::Finite(d) => candidate < *d,
            Distance::Unreached => true,
            Distance::Undefined => false,
        }
    }
}

/// Observer-visible exploration state of a node. Mirrors the engine's
/// progress but is never read back by the algorithm itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// The engine has not seen this node yet.
    Unvisited,
    /// The node is queued on the frontier awaiting (re-)examination.
    Queued,
    /// All out-edges of the node have been examined at least once.
    Settled,
}

/// Final result of a shortest-path run.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Normal termination: the relaxation converged.
    ///
    /// Both vectors are indexed by `NodeId`. `journeys[v]` is the explicit
    /// node sequence `[source, .., v]` for reached nodes, `[source]` for the
    /// source itself, and empty for unreached nodes.
    Paths {
        distances: Vec<Distance>,
        journeys: Vec<Vec<NodeId>>,
    },

    /// A negative cycle reachable from the source was found.
    ///
    /// `cycle` is a closed forward walk (first element == last element,
    /// consecutive entries joined by real edges) with strictly negative
    /// total weight. `distances` holds `Undefined` for every node reachable
    /// from the cycle and the last settled value for all others.
    NegativeCycle {
        cycle: Vec<NodeId>,
        distances: Vec<Distance>,
    },
}

impl SearchOutcome {
    pub fn distances(&self) -> &[Distance] {
        match self {
            SearchOutcome::Paths { distances, .. }
            | SearchOutcome::NegativeCycle { distances, .. } => distances,
        }
    }
}
