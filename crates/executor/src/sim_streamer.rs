use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};
use tracing::{debug, info};

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::UpdateStreamer;
use common::types::Edge;

/// Produces synthetic edge updates for simulation purposes.
///
/// Generates batches of random `(from, to, weight)` updates with signed
/// weights drawn from the configured range, and sends them over a Tokio
/// bounded channel for processing. A negative `weight_min` lets negative
/// cycles appear over time, which is what the searcher is there to catch.
pub struct SimStreamer {
    config: SimulatorConfig,
}

impl SimStreamer {
    pub fn new(config: SimulatorConfig) -> Self {
        SimStreamer { config }
    }

    fn rng(&self) -> SmallRng {
        match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        }
    }
}

#[async_trait]
impl UpdateStreamer for SimStreamer {
    /// Runs the simulation asynchronously.
    ///
    /// Periodically generates batches of edge updates and sends them via the
    /// provided `Sender`. Backpressure is handled naturally via awaiting on
    /// `sender.send()`. Exits gracefully if the receiver is dropped.
    async fn run_stream(self, sender: Sender<Vec<Edge>>) -> Result<(), Error> {
        let mut interval = time::interval(Duration::from_millis(self.config.update_interval_ms));

        let mut rng = self.rng();

        let weight_range = self.config.weight_min..=self.config.weight_max;
        let node_range = 0..self.config.total_nodes;

        loop {
            interval.tick().await;

            // Generate a batch of edge updates
            let updates: Vec<Edge> = (0..self.config.batch_size)
                .map(|_| {
                    let from = rng.random_range(node_range.clone());
                    let to = rng.random_range(node_range.clone());
                    let weight = rng.random_range(weight_range.clone());

                    (from, to, weight)
                })
                .collect();

            debug!("Producer sent {} updates.", updates.len());
            if sender.send(updates).await.is_err() {
                info!("Simulator shutting down: Writer receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }
    }
}
