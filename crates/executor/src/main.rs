pub mod config;
pub mod csv_streamer;
pub mod error;
pub mod producer;
pub mod searcher;
pub mod sim_streamer;
pub mod types;
pub mod writer;

use std::env;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, mpsc::Sender, watch};
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::types::Edge;
use csv_streamer::CsvStreamer;
use path_solver_core::GraphCsr;
use path_solver_core::SpfaEngine;
use producer::Producer;
use searcher::PathSearcher;
use sim_streamer::SimStreamer;
use types::{DataSource, JoinHandleResult, SharedGraph};
use writer::Writer;

const REBUILD_LIMIT: usize = 100;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let source = parse_args();
    let config = config::load_config().expect("Failed to load config");

    let shared_graph = Arc::new(RwLock::new(
        GraphCsr::from_edges(0, vec![], REBUILD_LIMIT).expect("empty graph is always valid"),
    ));

    let (sender, receiver) = mpsc::channel::<Vec<Edge>>(config.executor.buffer_size);
    let (shutdown_tx, shutdown_rx) = watch::channel(());

    // Spawn tasks
    let producer_handle = spawn_producer(&source, sender, &config);
    let writer_handle = spawn_writer(shared_graph.clone(), receiver, shutdown_rx.clone());
    let searcher_handle = spawn_searcher(shared_graph.clone(), &config, shutdown_rx);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, shutting down pipeline.");
            let _ = shutdown_tx.send(());
        }
    });

    let _ = tokio::join!(writer_handle, searcher_handle, producer_handle);

    info!("Pipeline shut down.");
}

/// Parse command-line arguments to determine data source
fn parse_args() -> DataSource {
    let args: Vec<String> = env::args().collect();
    let source = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "sim".to_string());

    match source.as_str() {
        "sim" => DataSource::Sim,
        "csv" => {
            let path = args.get(2).expect("CSV path required for CSV mode").clone();
            DataSource::Csv(path)
        }
        _ => {
            eprintln!(
                "Usage: {} <SIM|CSV> [path_to_csv]\n  - SIM: run simulated edge updates\n  - CSV: read edge updates from a CSV file",
                args[0]
            );
            std::process::exit(1);
        }
    }
}

pub fn spawn_producer(
    source: &DataSource,
    sender: Sender<Vec<Edge>>,
    config: &config::Config,
) -> JoinHandleResult {
    match source {
        DataSource::Sim => {
            info!("Starting SimStreamer producer task...");
            let streamer = SimStreamer::new(config.simulator.clone());
            let producer = Producer::new(streamer);
            producer.spawn(sender)
        }
        DataSource::Csv(path) => {
            info!("Starting CsvStreamer producer task...");
            let streamer = CsvStreamer::new(path.clone(), config.producer.batch_size);
            let producer = Producer::new(streamer);
            producer.spawn(sender)
        }
    }
}

/// Spawn writer task
fn spawn_writer(
    shared_graph: SharedGraph,
    receiver: mpsc::Receiver<Vec<Edge>>,
    shutdown: watch::Receiver<()>,
) -> JoinHandleResult {
    let writer = Writer::new(shared_graph, receiver, shutdown);
    writer.spawn_task()
}

/// Spawn searcher task
fn spawn_searcher(
    shared_graph: SharedGraph,
    config: &config::Config,
    shutdown: watch::Receiver<()>,
) -> JoinHandleResult {
    let searcher = PathSearcher::new(
        shared_graph,
        config.searcher.interval_seconds,
        config.searcher.source_node,
        SpfaEngine,
        shutdown,
    );
    tokio::spawn(async move { searcher.search_for_paths().await })
}
