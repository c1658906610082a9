pub mod cycle;
pub mod engine;
pub mod graph;
pub mod journey;
pub mod observer;
pub mod traits;

pub use engine::SpfaEngine;
pub use graph::GraphCsr;
pub use observer::{NoopObserver, ProgressObserver, Snapshot};
pub use traits::PathSolver;

use common::{
    error::Error,
    types::{NodeId, SearchOutcome},
};

/// Convenience entry point: single-source shortest paths with negative-cycle
/// detection, no observer attached.
pub fn shortest_paths(graph: &GraphCsr, source: NodeId) -> Result<SearchOutcome, Error> {
    SpfaEngine.shortest_paths(graph, source)
}
