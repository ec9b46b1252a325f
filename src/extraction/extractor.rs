use serde_json::{Map, Value};

use crate::models::{EventRow, UserTurn};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Text and system intent carried by a serialized `user` event.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEvent {
    pub text: String,
    pub predicted_intent: Option<String>,
}

/// Parse one serialized event. Returns `None` for anything that is not a
/// well-formed `user` event; callers treat that as "not a user turn".
pub fn parse_user_event(raw: &str) -> Option<UserEvent> {
    let mut data: Map<String, Value> = match serde_json::from_str(raw) {
        Ok(data) => data,
        Err(err) => {
            log_debug!("Skipping malformed event data: {err}");
            return None;
        }
    };

    if data.get("event").and_then(Value::as_str) != Some("user") {
        return None;
    }

    let text = match data.remove("text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    };

    let predicted_intent = data
        .get("parse_data")
        .and_then(|parse| parse.pointer("/intent/name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Some(UserEvent {
        text,
        predicted_intent,
    })
}

/// Keep the user-authored rows, in input order.
pub fn extract_user_turns(rows: &[EventRow]) -> Vec<UserTurn> {
    let mut skipped = 0usize;

    let turns: Vec<UserTurn> = rows
        .iter()
        .filter_map(|row| {
            let event = row.data.as_deref().and_then(parse_user_event);
            if event.is_none() {
                skipped += 1;
            }
            event.map(|event| UserTurn {
                sender_id: row.sender_id.clone(),
                timestamp: row.timestamp,
                text: event.text,
                predicted_intent: event.predicted_intent,
                reported_intent: row.intent_name.clone(),
            })
        })
        .collect();

    log_info!(
        "Extracted {} user turns ({} rows were not user events)",
        turns.len(),
        skipped
    );
    turns
}
