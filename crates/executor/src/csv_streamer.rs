use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use tokio::sync::mpsc::Sender;
use tracing::{error, info};

use super::error::Error;
use super::types::UpdateStreamer;
use common::types::Edge;

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Default)]
pub struct CsvRecord {
    #[serde(rename = "from")]
    pub from_node: usize,

    #[serde(rename = "to")]
    pub to_node: usize,

    #[serde(rename = "weight")]
    pub weight_value: f64,
}

pub struct CsvStreamer {
    path: String,
    batch_size: usize,
}

impl CsvStreamer {
    pub fn new(path: String, batch_size: usize) -> Self {
        CsvStreamer { path, batch_size }
    }

    fn parse_csv_to_edges(&self) -> Result<Vec<Edge>, Error> {
        let file = File::open(&self.path).map_err(|e| {
            error!("Failed to read file {}: {:?}", self.path, e);
            Error::IoError(e)
        })?;

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let mut edges = Vec::new();

        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            edges.push((record.from_node, record.to_node, record.weight_value));
        }
        Ok(edges)
    }
}

#[async_trait::async_trait]
impl UpdateStreamer for CsvStreamer {
    async fn run_stream(self, sender: Sender<Vec<Edge>>) -> Result<(), Error> {
        let all_edges = self.parse_csv_to_edges()?;
        let total_edges = all_edges.len();
        let mut edges_sent = 0;

        info!("CsvStreamer: Starting transfer of {} edges...", total_edges);

        for chunk in all_edges.chunks(self.batch_size) {
            let batch: Vec<Edge> = chunk.to_vec();
            if let Err(e) = sender.send(batch).await {
                error!(
                    "CsvStreamer shutting down: Writer receiver dropped during send. Error: {}",
                    e
                );
                return Err(Error::ChannelSendFailed);
            }

            edges_sent += chunk.len();
        }

        info!(
            "CsvStreamer: Successfully transferred {} edges in batches.",
            edges_sent
        );
        Ok(())
    }
}
