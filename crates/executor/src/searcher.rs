use tokio::select;
use tokio::sync::watch;
use tokio::time::{self, Duration};
use tracing::{error, info, warn};

use super::{error::Error, types::SharedGraph};
use common::types::SearchOutcome;
use path_solver_core::traits::PathSolver;

/// Periodically runs the shortest-path solver against a snapshot of the
/// shared graph and reports the outcome.
pub struct PathSearcher<S> {
    solver: S,
    graph: SharedGraph,
    interval: u64, // interval in seconds
    source: usize,
    shutdown: watch::Receiver<()>,
}

impl<S> PathSearcher<S>
where
    S: PathSolver,
{
    pub fn new(
        graph: SharedGraph,
        interval: u64,
        source: usize,
        solver: S,
        shutdown: watch::Receiver<()>,
    ) -> Self {
        PathSearcher {
            graph,
            interval,
            source,
            solver,
            shutdown,
        }
    }

    pub async fn search_for_paths(mut self) -> Result<(), Error> {
        info!("Searcher ready.");

        let mut interval = time::interval(Duration::from_secs(self.interval));

        // The first tick occurs immediately, but we skip it to wait the full duration
        interval.tick().await;

        loop {
            select! {
                _ = interval.tick() => {}
                _ = self.shutdown.changed() => {
                    info!("Shutdown signal received, stopping searcher.");
                    return Ok(());
                }
            }

            let graph_snapshot = {
                let graph_guard = self.graph.read().await;
                graph_guard.clone()
            };

            // Only run the search once the graph covers the source node
            if graph_snapshot.num_nodes > self.source {
                info!("Searcher: Starting shortest-path search on new snapshot...");

                match self.solver.shortest_paths(&graph_snapshot, self.source) {
                    Ok(SearchOutcome::Paths { distances, .. }) => {
                        let reached = distances.iter().filter(|d| d.is_finite()).count();
                        info!(
                            "Search complete: converged, {}/{} nodes reachable from {}.",
                            reached,
                            graph_snapshot.num_nodes,
                            self.source
                        );
                    }
                    Ok(SearchOutcome::NegativeCycle { cycle, distances }) => {
                        let affected = distances
                            .iter()
                            .filter(|d| **d == common::types::Distance::Undefined)
                            .count();
                        warn!(
                            "Negative cycle FOUND! Path: {:?} ({} nodes affected)",
                            cycle, affected
                        );
                    }
                    Err(e) => {
                        error!(
                            "Searcher Error: shortest-path solver failed due to: {}. Continuing.",
                            e
                        );
                    }
                }
            } else {
                info!("Searcher: Graph does not cover the source node yet. Skipping.");
            }
        }
    }
}
