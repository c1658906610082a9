use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An edge or query referenced a node index outside `[0, num_nodes)`.
    /// Rejected at graph-construction time, before any relaxation runs.
    #[error("node index {0} is out of bounds")]
    InvalidNode(usize),

    /// Cycle extraction was invoked but the backward predecessor walk found
    /// no repeated node within the expected bound. The divergence heuristics
    /// fired without a real cycle being present; this is an engine defect,
    /// not a user input problem.
    #[error("cycle extraction found no repeat in the predecessor chain; engine state is inconsistent")]
    CycleExtractionFailed,

    /// A predecessor walk hit a node with no recorded predecessor where one
    /// was required, or failed to terminate within `num_nodes` steps.
    #[error("predecessor chain is broken at node {0}")]
    BrokenPredecessorChain(usize),
}
