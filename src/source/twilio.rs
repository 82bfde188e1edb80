// src/source/twilio.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::histogram;
use serde::Deserialize;

use crate::source::{InboundSms, MessageSource, SourceError};

const TWILIO_API_BASE: &str = "https://api.twilio.com";

// One page per listing; a beacon polling every few seconds never
// accumulates more than this.
const PAGE_SIZE: &str = "50";

#[derive(Debug, Deserialize)]
struct MessagePage {
    #[serde(default)]
    messages: Vec<MessageResource>,
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
    body: Option<String>,
    from: Option<String>,
    // RFC 2822, e.g. "Mon, 01 Jan 2024 00:00:00 +0000"
    date_sent: Option<String>,
    // Twilio serializes the count as a string.
    num_media: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MediaPage {
    #[serde(default)]
    media_list: Vec<MediaResource>,
}

#[derive(Debug, Deserialize)]
struct MediaResource {
    uri: String,
}

fn parse_rfc2822_utc(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl MessageResource {
    fn into_inbound(self) -> InboundSms {
        InboundSms {
            date_sent: self.date_sent.as_deref().and_then(parse_rfc2822_utc),
            num_media: self
                .num_media
                .as_deref()
                .and_then(|n| n.parse().ok())
                .unwrap_or(0),
            sid: self.sid,
            body: self.body,
            from: self.from,
        }
    }
}

/// Message store backed by the Twilio REST API (2010-04-01). Stateless aside
/// from credentials; safe to construct per poll or cache across polls.
pub struct TwilioSource {
    base_url: String,
    account_sid: String,
    auth_token: String,
    client: reqwest::Client,
}

impl TwilioSource {
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            base_url: TWILIO_API_BASE.to_string(),
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Point the client at a non-default API host (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        )
    }

    fn message_url(&self, message_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{}.json",
            self.base_url, self.account_sid, message_sid
        )
    }

    fn media_url(&self, message_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{}/Media.json",
            self.base_url, self.account_sid, message_sid
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Rejected { status, body });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MessageSource for TwilioSource {
    async fn list(&self, to: &str) -> Result<Vec<InboundSms>, SourceError> {
        let t0 = std::time::Instant::now();
        let page: MessagePage = self
            .get_json(&self.messages_url(), &[("To", to), ("PageSize", PAGE_SIZE)])
            .await?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("beacon_list_ms").record(ms);

        Ok(page
            .messages
            .into_iter()
            .map(MessageResource::into_inbound)
            .collect())
    }

    async fn media_uris(&self, message_sid: &str) -> Result<Vec<String>, SourceError> {
        let page: MediaPage = self.get_json(&self.media_url(message_sid), &[]).await?;
        Ok(page.media_list.into_iter().map(|m| m.uri).collect())
    }

    async fn delete(&self, message_sid: &str) -> Result<(), SourceError> {
        let resp = self
            .client
            .delete(self.message_url(message_sid))
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Rejected { status, body });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Twilio"
    }
}
