// src/source/memory.rs
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::source::{InboundSms, MessageSource, SourceError};

/// Deterministic in-memory message store for tests and demos. Seed it with
/// [`push`](InMemorySource::push) / [`put_media`](InMemorySource::put_media),
/// then assert on the recorded call counts and deletions.
#[derive(Default)]
pub struct InMemorySource {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    messages: Vec<InboundSms>,
    media: HashMap<String, Vec<String>>,
    deleted: Vec<String>,
    failing_deletes: HashSet<String>,
    failing_media: HashSet<String>,
    fail_next_list: Option<String>,
    list_calls: u32,
    media_calls: u32,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, msg: InboundSms) {
        self.lock().messages.push(msg);
    }

    pub fn put_media(&self, message_sid: &str, uris: Vec<String>) {
        self.lock().media.insert(message_sid.to_string(), uris);
    }

    /// Make the next `list` fail with [`SourceError::Unavailable`].
    pub fn fail_next_list(&self, reason: &str) {
        self.lock().fail_next_list = Some(reason.to_string());
    }

    /// Make every `delete` of `message_sid` fail.
    pub fn fail_delete(&self, message_sid: &str) {
        self.lock().failing_deletes.insert(message_sid.to_string());
    }

    /// Make every `media_uris` call for `message_sid` fail.
    pub fn fail_media(&self, message_sid: &str) {
        self.lock().failing_media.insert(message_sid.to_string());
    }

    /// Sids deleted so far, in call order (repeats included).
    pub fn deleted(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    pub fn list_calls(&self) -> u32 {
        self.lock().list_calls
    }

    pub fn media_calls(&self) -> u32 {
        self.lock().media_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("source mutex poisoned")
    }
}

#[async_trait]
impl MessageSource for InMemorySource {
    async fn list(&self, _to: &str) -> Result<Vec<InboundSms>, SourceError> {
        let mut g = self.lock();
        g.list_calls += 1;
        if let Some(reason) = g.fail_next_list.take() {
            return Err(SourceError::Unavailable(reason));
        }
        Ok(g.messages.clone())
    }

    async fn media_uris(&self, message_sid: &str) -> Result<Vec<String>, SourceError> {
        let mut g = self.lock();
        g.media_calls += 1;
        if g.failing_media.contains(message_sid) {
            return Err(SourceError::Unavailable(format!(
                "media listing for {message_sid} refused"
            )));
        }
        Ok(g.media.get(message_sid).cloned().unwrap_or_default())
    }

    async fn delete(&self, message_sid: &str) -> Result<(), SourceError> {
        let mut g = self.lock();
        g.deleted.push(message_sid.to_string());
        if g.failing_deletes.contains(message_sid) {
            return Err(SourceError::Unavailable(format!(
                "delete of {message_sid} refused"
            )));
        }
        g.messages.retain(|m| m.sid != message_sid);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "InMemory"
    }
}
