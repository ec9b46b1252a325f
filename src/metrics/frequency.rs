use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::MetricsConfig;
use crate::models::{EventRow, LabeledTurn};

use super::types::{
    ActionFallback, IntentDistribution, IntentPivot, LabelCount, Overview, PivotRow, SenderCount,
};

/// Count occurrences, most frequent first; ties ordered by label.
pub fn value_counts<'a, I>(labels: I) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut sorted: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    sorted
}

fn intent_rows(rows: &[EventRow]) -> impl Iterator<Item = (&str, &str)> {
    rows.iter().filter_map(|row| {
        row.intent_name
            .as_deref()
            .map(|intent| (row.sender_id.as_str(), intent))
    })
}

/// Sender × intent counts over rows carrying an `intent_name`.
pub fn user_intent_pivot(rows: &[EventRow]) -> IntentPivot {
    let mut cells: BTreeMap<&str, HashMap<&str, u64>> = BTreeMap::new();
    let mut intents: BTreeSet<&str> = BTreeSet::new();

    for (sender_id, intent) in intent_rows(rows) {
        intents.insert(intent);
        *cells.entry(sender_id).or_default().entry(intent).or_insert(0) += 1;
    }

    let intents: Vec<&str> = intents.into_iter().collect();
    let rows = cells
        .into_iter()
        .map(|(sender_id, by_intent)| PivotRow {
            sender_id: sender_id.to_string(),
            counts: intents
                .iter()
                .map(|intent| by_intent.get(intent).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    IntentPivot {
        intents: intents.into_iter().map(str::to_string).collect(),
        rows,
    }
}

pub fn intent_distribution(rows: &[EventRow]) -> IntentDistribution {
    IntentDistribution {
        frequency: value_counts(intent_rows(rows).map(|(_, intent)| intent)),
        pivot: user_intent_pivot(rows),
    }
}

/// Fallback rate as seen from the bot's executed actions.
pub fn action_fallback(rows: &[EventRow], config: &MetricsConfig) -> ActionFallback {
    let total_user_queries = intent_rows(rows).count() as u64;
    let actions: Vec<_> = rows.iter().filter_map(EventRow::as_bot_action).collect();

    let fallbacks: Vec<_> = actions
        .iter()
        .filter(|a| a.action_name == config.fallback_action)
        .collect();
    let fallback_actions = fallbacks.len() as u64;

    let fallback_rate = if total_user_queries > 0 {
        fallback_actions as f64 / total_user_queries as f64
    } else {
        0.0
    };

    let by_user = value_counts(fallbacks.iter().map(|a| a.sender_id.as_str()))
        .into_iter()
        .map(|c| SenderCount {
            sender_id: c.label,
            count: c.count,
        })
        .collect();

    let mut top_actions = value_counts(actions.iter().map(|a| a.action_name.as_str()));
    top_actions.truncate(config.top_actions);

    ActionFallback {
        total_user_queries,
        fallback_actions,
        fallback_rate,
        by_user,
        top_actions,
    }
}

pub fn overview(turns: &[LabeledTurn], config: &MetricsConfig) -> Overview {
    let source = config.prediction_source;

    let users: HashSet<&str> = turns.iter().map(|t| t.sender_id()).collect();
    let intents: HashSet<&str> = turns.iter().filter_map(|t| t.predicted(source)).collect();
    let fallback_queries = turns
        .iter()
        .filter(|t| t.predicted(source) == Some(config.fallback_intent.as_str()))
        .count() as u64;

    Overview {
        unique_users: users.len() as u64,
        total_queries: turns.len() as u64,
        unique_intents: intents.len() as u64,
        successful_queries: turns.len() as u64 - fallback_queries,
        fallback_queries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TrueIntent, UserTurn};

    fn row(sender: &str, intent: Option<&str>, action: Option<&str>) -> EventRow {
        EventRow {
            sender_id: sender.into(),
            intent_name: intent.map(str::to_string),
            action_name: action.map(str::to_string),
            ..Default::default()
        }
    }

    fn sample_rows() -> Vec<EventRow> {
        vec![
            row("u1", Some("greet"), None),
            row("u1", None, Some("utter_greet")),
            row("u1", Some("order_status"), None),
            row("u1", None, Some("action_default_fallback")),
            row("u2", Some("greet"), None),
            row("u2", None, Some("action_default_fallback")),
            row("u2", Some("nlu_fallback"), None),
            row("u2", None, Some("action_default_fallback")),
            row("u3", None, Some("action_listen")),
        ]
    }

    #[test]
    fn value_counts_sorts_by_frequency_then_label() {
        let counts = value_counts(["b", "a", "b", "c", "a", "b"]);
        let flat: Vec<_> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(flat, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn pivot_fills_missing_cells_with_zero() {
        let pivot = user_intent_pivot(&sample_rows());
        assert_eq!(pivot.intents, vec!["greet", "nlu_fallback", "order_status"]);
        assert_eq!(pivot.rows.len(), 2);
        assert_eq!(pivot.get("u1", "order_status"), Some(1));
        assert_eq!(pivot.get("u1", "nlu_fallback"), Some(0));
        assert_eq!(pivot.get("u2", "nlu_fallback"), Some(1));
        assert_eq!(pivot.get("u3", "greet"), None);
    }

    #[test]
    fn distribution_counts_intent_rows() {
        let dist = intent_distribution(&sample_rows());
        assert_eq!(dist.frequency[0].label, "greet");
        assert_eq!(dist.frequency[0].count, 2);
        assert_eq!(dist.frequency.iter().map(|c| c.count).sum::<u64>(), 4);
    }

    #[test]
    fn action_fallback_rate_and_ranking() {
        let config = MetricsConfig::default();
        let result = action_fallback(&sample_rows(), &config);
        assert_eq!(result.total_user_queries, 4);
        assert_eq!(result.fallback_actions, 3);
        assert_eq!(result.fallback_rate, 0.75);
        assert_eq!(result.by_user[0].sender_id, "u2");
        assert_eq!(result.by_user[0].count, 2);
        assert_eq!(result.top_actions[0].label, "action_default_fallback");
        assert_eq!(result.top_actions.len(), 3);
    }

    #[test]
    fn action_fallback_without_queries_is_zero() {
        let config = MetricsConfig::default();
        let rows = vec![row("u1", None, Some("action_default_fallback"))];
        let result = action_fallback(&rows, &config);
        assert_eq!(result.total_user_queries, 0);
        assert_eq!(result.fallback_rate, 0.0);
    }

    #[test]
    fn overview_counts_successes_and_fallbacks() {
        let config = MetricsConfig::default();
        let make = |sender: &str, reported: Option<&str>| LabeledTurn {
            turn: UserTurn {
                sender_id: sender.into(),
                timestamp: None,
                text: String::new(),
                predicted_intent: None,
                reported_intent: reported.map(str::to_string),
            },
            true_intent: TrueIntent::Greet,
        };
        let turns = vec![
            make("a", Some("greet")),
            make("a", Some("nlu_fallback")),
            make("b", None),
            make("c", Some("greet")),
        ];

        let view = overview(&turns, &config);
        assert_eq!(view.unique_users, 3);
        assert_eq!(view.total_queries, 4);
        assert_eq!(view.unique_intents, 2);
        assert_eq!(view.fallback_queries, 1);
        assert_eq!(view.successful_queries, 3);
    }
}
