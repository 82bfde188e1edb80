// src/beacon/throttle.rs
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Last-contact bookkeeping for each beacon identity.
///
/// The map lives for the process lifetime and is handed into
/// [`poll`](crate::beacon::poll) by the caller, keeping the engine free of
/// ambient state. Entries are never evicted; a restart forgets everything,
/// so the first poll afterwards always proceeds.
#[derive(Debug, Default)]
pub struct ThrottleClock {
    last_polled: HashMap<String, DateTime<Utc>>,
}

impl ThrottleClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` may contact the source at `now`. A key with no prior
    /// record always may; otherwise the elapsed whole seconds since the
    /// recorded poll must reach `interval_secs`.
    pub fn should_poll(&self, key: &str, interval_secs: u64, now: DateTime<Utc>) -> bool {
        match self.last_polled.get(key) {
            None => true,
            Some(last) => (now - *last).num_seconds() >= interval_secs as i64,
        }
    }

    /// Overwrite the cadence baseline for `key` with `now`.
    pub fn record_poll(&mut self, key: &str, now: DateTime<Utc>) {
        self.last_polled.insert(key.to_string(), now);
    }

    pub fn last_polled(&self, key: &str) -> Option<DateTime<Utc>> {
        self.last_polled.get(key).copied()
    }
}
