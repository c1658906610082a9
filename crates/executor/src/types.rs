use std::sync::Arc;
use tokio::sync::{RwLock, mpsc::Sender};
use tokio::task::JoinHandle;

use super::error::Error;
use common::types::Edge;
use path_solver_core::GraphCsr;

pub type SharedGraph = Arc<RwLock<GraphCsr>>;
pub type JoinHandleResult = JoinHandle<Result<(), Error>>;

/// Where edge updates come from.
pub enum DataSource {
    Sim,
    Csv(String),
}

/// A trait defining the contract for any source that generates and streams
/// edge updates into the main processing pipeline.
///
/// This trait decouples the Producer task from the specific data source
/// (CSV file vs. simulated data).
///
/// The trait bounds (`Send`, `Sync`, `'static`) are mandatory to ensure the
/// implementation can be safely executed by the multi-threaded asynchronous
/// runtime (Tokio).
#[async_trait::async_trait]
pub trait UpdateStreamer: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<Vec<Edge>>) -> Result<(), Error>;
}
