// src/beacon/types.rs
use chrono::SecondsFormat;

use crate::source::InboundSms;

/// Normalized record for one inbound text. Every field is a string so the
/// emitted shape stays stable regardless of the provider's native types.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct TextEvent {
    pub id: String,
    pub body: String,
    pub from: String,
    /// RFC 3339, or empty when the provider never stamped the message.
    pub sent: String,
    pub images: Vec<String>,
}

impl TextEvent {
    /// Pure mapping from the provider-owned shape. Missing optionals become
    /// empty strings, never errors.
    pub fn from_sms(msg: &InboundSms, images: Vec<String>) -> Self {
        Self {
            id: msg.sid.clone(),
            body: msg.body.clone().unwrap_or_default(),
            from: msg.from.clone().unwrap_or_default(),
            sent: msg
                .date_sent
                .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
            images,
        }
    }
}

/// One poll's worth of texts, in provider list order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct TextBatch {
    pub texts: Vec<TextEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn full_message_maps_field_for_field() {
        let sms = InboundSms {
            sid: "SM1".into(),
            body: Some("hi".into()),
            from: Some("+1777".into()),
            date_sent: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            num_media: 0,
        };
        let ev = TextEvent::from_sms(&sms, vec![]);
        assert_eq!(ev.id, "SM1");
        assert_eq!(ev.body, "hi");
        assert_eq!(ev.from, "+1777");
        assert_eq!(ev.sent, "2024-01-01T00:00:00Z");
        assert!(ev.images.is_empty());
    }

    #[test]
    fn missing_optionals_become_empty_strings() {
        let sms = InboundSms {
            sid: "SM2".into(),
            body: None,
            from: None,
            date_sent: None,
            num_media: 0,
        };
        let ev = TextEvent::from_sms(&sms, vec![]);
        assert_eq!(ev.body, "");
        assert_eq!(ev.from, "");
        assert_eq!(ev.sent, "");
    }

    #[test]
    fn images_pass_through_in_order() {
        let sms = InboundSms {
            sid: "SM3".into(),
            body: Some("pics".into()),
            from: Some("+1".into()),
            date_sent: None,
            num_media: 2,
        };
        let ev = TextEvent::from_sms(&sms, vec!["/a.jpg".into(), "/b.jpg".into()]);
        assert_eq!(ev.images, vec!["/a.jpg".to_string(), "/b.jpg".to_string()]);
    }
}
