// src/beacon/scheduler.rs
use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tokio::task::JoinHandle;

use crate::beacon::config::BeaconConfig;
use crate::beacon::throttle::ThrottleClock;
use crate::beacon::types::TextBatch;
use crate::source::MessageSource;

#[derive(Clone, Copy, Debug)]
pub struct BeaconSchedulerCfg {
    /// Tick cadence of the driving loop. May be shorter than the beacon's
    /// poll interval; the engine throttles on its own.
    pub tick_secs: u64,
}

impl Default for BeaconSchedulerCfg {
    fn default() -> Self {
        Self { tick_secs: 1 }
    }
}

/// Spawn a lightweight loop that invokes the beacon every tick and hands
/// each non-empty batch to `emit`.
pub fn spawn_beacon_scheduler<F>(
    cfg: BeaconSchedulerCfg,
    source: Arc<dyn MessageSource>,
    beacon_cfg: BeaconConfig,
    mut emit: F,
) -> JoinHandle<()>
where
    F: FnMut(TextBatch) + Send + 'static,
{
    tokio::spawn(async move {
        let mut clock = ThrottleClock::new();
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(cfg.tick_secs.max(1)));
        loop {
            ticker.tick().await;
            match crate::beacon::poll(source.as_ref(), &beacon_cfg, &mut clock, Utc::now()).await {
                Ok(report) => {
                    counter!("beacon_runs_total").increment(1);
                    for batch in report.batches {
                        tracing::info!(
                            target: "beacon",
                            texts = batch.texts.len(),
                            "beacon tick emitted texts"
                        );
                        emit(batch);
                    }
                }
                Err(e) => {
                    // No retry here; the next tick is the retry.
                    tracing::warn!(error = ?e, "beacon poll failed");
                    counter!("beacon_source_errors_total").increment(1);
                }
            }
        }
    })
}
