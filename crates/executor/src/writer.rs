use tokio::select;
use tokio::sync::watch;
use tokio::sync::mpsc::Receiver;
use tracing::{debug, info};

use super::error::Error;
use super::types::SharedGraph;
use common::types::Edge;
use path_solver_core::graph::AddEdgeResult;

/// Async consumer that applies edge updates to the shared graph.
pub struct Writer {
    graph: SharedGraph,
    receiver: Receiver<Vec<Edge>>,
    shutdown: watch::Receiver<()>, // signal for graceful shutdown
}

impl Writer {
    pub fn new(
        graph: SharedGraph,
        receiver: Receiver<Vec<Edge>>,
        shutdown: watch::Receiver<()>,
    ) -> Self {
        Self {
            graph,
            receiver,
            shutdown,
        }
    }

    /// Run the writer asynchronously.
    ///
    /// Consumes batches from the receiver and buffers them into the graph;
    /// when the pending buffer hits its rebuild limit, the accumulated edges
    /// are merged into the CSR arrays in one pass. The write lock is released
    /// after each batch. Exits gracefully when the receiver is closed or the
    /// shutdown signal is received.
    pub async fn process_updates(mut self) -> Result<(), Error> {
        info!("Writer ready.");

        loop {
            select! {
                updates = self.receiver.recv() => {
                    match updates {
                        Some(updates) => {
                            let size = updates.len();
                            let mut graph_guard = self.graph.write().await;
                            match graph_guard.add_edges_and_extract_data(updates) {
                                AddEdgeResult::Success => {
                                    debug!("{} edges added to graph pending buffer", size);
                                }
                                AddEdgeResult::RebuildNeeded(edges) => {
                                    debug!("Graph rebuild limit reached. Re-building CSR");
                                    graph_guard.rebuild_with_edges(edges);
                                }
                            }
                        }
                        None => {
                            info!("Receiver closed, shutting down writer.");
                            break;
                        }
                    }
                }

                _ = self.shutdown.changed() => {
                    info!("Shutdown signal received, stopping writer.");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Public method that spawns the Writer task onto the Tokio runtime.
    ///
    /// This function consumes the Writer instance (`self`) and returns a
    /// JoinHandle, allowing the pipeline orchestrator to monitor the task.
    pub fn spawn_task(self) -> tokio::task::JoinHandle<Result<(), Error>> {
        tokio::spawn(self.process_updates())
    }
}
