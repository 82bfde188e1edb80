// src/beacon/mod.rs
pub mod config;
pub mod scheduler;
pub mod throttle;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::beacon::config::BeaconConfig;
use crate::beacon::throttle::ThrottleClock;
use crate::beacon::types::{TextBatch, TextEvent};
use crate::source::{MessageSource, SourceError};

/// One-time metrics registration (so series show up on scrape).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("beacon_polls_total", "Polls that reached the message source.");
        describe_counter!(
            "beacon_throttled_total",
            "Invocations skipped by the poll interval."
        );
        describe_counter!(
            "beacon_misconfigured_total",
            "Invocations skipped on incomplete credentials."
        );
        describe_counter!("beacon_texts_total", "Normalized text events emitted.");
        describe_counter!(
            "beacon_delete_errors_total",
            "Message acknowledgments that failed."
        );
        describe_counter!("beacon_source_errors_total", "Source listing failures.");
        describe_histogram!("beacon_list_ms", "Source listing time in milliseconds.");
        describe_gauge!(
            "beacon_last_poll_ts",
            "Unix ts when the beacon last contacted the source."
        );
    });
}

/// Which early-exit branch ended an invocation, when one did. The emitted
/// result stays empty either way; this is the observable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A required credential or the target number is missing.
    Misconfigured,
    /// The poll interval since the last source contact has not elapsed.
    Throttled,
}

/// Outcome of a single beacon invocation.
#[derive(Debug, Default)]
pub struct PollReport {
    /// Empty, or exactly one batch of texts in provider list order.
    pub batches: Vec<TextBatch>,
    pub skipped: Option<SkipReason>,
}

impl PollReport {
    fn skip(reason: SkipReason) -> Self {
        Self {
            batches: Vec::new(),
            skipped: Some(reason),
        }
    }

    fn batch(texts: Vec<TextEvent>) -> Self {
        Self {
            batches: vec![TextBatch { texts }],
            skipped: None,
        }
    }
}

/// Run one beacon invocation against `source` at `now`.
///
/// The invoking scheduler's cadence is not trusted: the configured poll
/// interval is enforced here through `clock`, keyed by the beacon identity.
/// Listing failures propagate untouched; throttling and incomplete
/// configuration are normal flow and yield an empty report.
pub async fn poll(
    source: &dyn MessageSource,
    config: &BeaconConfig,
    clock: &mut ThrottleClock,
    now: DateTime<Utc>,
) -> Result<PollReport, SourceError> {
    ensure_metrics_described();
    tracing::trace!(source = source.name(), "text message beacon starting");

    if !config.is_complete() {
        tracing::warn!("beacon config incomplete, skipping poll");
        counter!("beacon_misconfigured_total").increment(1);
        return Ok(PollReport::skip(SkipReason::Misconfigured));
    }

    let key = config.beacon_key();
    if !clock.should_poll(&key, config.poll_interval_secs, now) {
        tracing::trace!(
            interval = config.poll_interval_secs,
            "beacon poll interval not met"
        );
        counter!("beacon_throttled_total").increment(1);
        return Ok(PollReport::skip(SkipReason::Throttled));
    }

    let messages = source.list(&config.to_number).await?;
    // Cadence advances on every successful source contact, texts found or
    // not. Only the two early exits above leave the baseline untouched.
    clock.record_poll(&key, now);
    counter!("beacon_polls_total").increment(1);
    gauge!("beacon_last_poll_ts").set(now.timestamp() as f64);
    tracing::trace!(count = messages.len(), "beacon listed messages");

    if messages.is_empty() {
        return Ok(PollReport::default());
    }

    let mut texts = Vec::with_capacity(messages.len());
    for msg in &messages {
        let images = if msg.num_media > 0 {
            match source.media_uris(&msg.sid).await {
                Ok(uris) => uris,
                Err(e) => {
                    tracing::warn!(error = ?e, sid = %msg.sid, "media listing failed");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        texts.push(TextEvent::from_sms(msg, images));

        // Delete only after the event is in the batch. A failed delete
        // means the same message may be listed again next cycle.
        if let Err(e) = source.delete(&msg.sid).await {
            tracing::warn!(error = ?e, sid = %msg.sid, "message delete failed");
            counter!("beacon_delete_errors_total").increment(1);
        }
    }

    counter!("beacon_texts_total").increment(texts.len() as u64);
    Ok(PollReport::batch(texts))
}
