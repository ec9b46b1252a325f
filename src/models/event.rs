//! Rows of the exported `events` table.
//!
//! One row per tracker event. Only the `data` column is structured; the other
//! columns are copied verbatim from the store and may be empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EventRow {
    pub sender_id: String,
    /// Seconds since the Unix epoch, as stored by the tracker.
    pub timestamp: Option<f64>,
    pub type_name: Option<String>,
    pub intent_name: Option<String>,
    pub action_name: Option<String>,
    /// Serialized event object. Absent when the source cell was empty.
    pub data: Option<String>,
}

impl EventRow {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(epoch_to_datetime)
    }

    /// Bot-side view of this row, if it records an executed action.
    pub fn as_bot_action(&self) -> Option<BotAction> {
        self.action_name.as_ref().map(|action_name| BotAction {
            sender_id: self.sender_id.clone(),
            timestamp: self.timestamp,
            action_name: action_name.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BotAction {
    pub sender_id: String,
    pub timestamp: Option<f64>,
    pub action_name: String,
}

pub fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_at_converts_fractional_epoch() {
        let row = EventRow {
            sender_id: "u1".into(),
            timestamp: Some(1_700_000_000.5),
            ..Default::default()
        };
        let at = row.recorded_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn bot_action_requires_action_name() {
        let mut row = EventRow {
            sender_id: "u1".into(),
            ..Default::default()
        };
        assert!(row.as_bot_action().is_none());

        row.action_name = Some("action_listen".into());
        let action = row.as_bot_action().unwrap();
        assert_eq!(action.action_name, "action_listen");
        assert_eq!(action.sender_id, "u1");
    }
}
