use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PredictionSource;

use super::event::epoch_to_datetime;
use super::intent::TrueIntent;

/// A user-authored message pulled out of an event row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserTurn {
    pub sender_id: String,
    pub timestamp: Option<f64>,
    pub text: String,
    /// `parse_data.intent.name` from the serialized event.
    pub predicted_intent: Option<String>,
    /// The row's `intent_name` column, stored separately by the tracker.
    pub reported_intent: Option<String>,
}

impl UserTurn {
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(epoch_to_datetime)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabeledTurn {
    #[serde(flatten)]
    pub turn: UserTurn,
    pub true_intent: TrueIntent,
}

impl LabeledTurn {
    pub fn sender_id(&self) -> &str {
        &self.turn.sender_id
    }

    pub fn text(&self) -> &str {
        &self.turn.text
    }

    /// The system-assigned intent this turn is judged against.
    pub fn predicted(&self, source: PredictionSource) -> Option<&str> {
        match source {
            PredictionSource::ParseData => self.turn.predicted_intent.as_deref(),
            PredictionSource::IntentColumn => self.turn.reported_intent.as_deref(),
        }
    }

    pub fn is_correct(&self, source: PredictionSource) -> bool {
        self.true_intent.matches(self.predicted(source))
    }
}
