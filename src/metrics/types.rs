use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{FallbackBasis, PredictionSource};
use crate::models::UserMetrics;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SenderCount {
    pub sender_id: String,
    pub count: u64,
}

/// Rows are true labels, columns predicted labels, both over the same sorted label set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    pub fn get(&self, true_label: &str, predicted_label: &str) -> Option<u64> {
        let row = self.labels.iter().position(|l| l == true_label)?;
        let col = self.labels.iter().position(|l| l == predicted_label)?;
        Some(self.counts[row][col])
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AverageMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: AverageMetrics,
    pub weighted_avg: AverageMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentPair {
    pub true_intent: String,
    pub predicted_intent: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Describe-style summary of messages per session. NaN where undefined.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionLengthStats {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
    pub per_user: Vec<SenderCount>,
    pub histogram: Vec<HistogramBin>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Overview {
    pub unique_users: u64,
    pub total_queries: u64,
    pub unique_intents: u64,
    pub successful_queries: u64,
    pub fallback_queries: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PivotRow {
    pub sender_id: String,
    pub counts: Vec<u64>,
}

/// Sender × intent message counts; absent combinations are 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IntentPivot {
    pub intents: Vec<String>,
    pub rows: Vec<PivotRow>,
}

impl IntentPivot {
    pub fn get(&self, sender_id: &str, intent: &str) -> Option<u64> {
        let col = self.intents.iter().position(|i| i == intent)?;
        let row = self.rows.iter().find(|r| r.sender_id == sender_id)?;
        Some(row.counts[col])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentDistribution {
    pub frequency: Vec<LabelCount>,
    pub pivot: IntentPivot,
}

/// Fallbacks as recorded by the bot's own fallback action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionFallback {
    pub total_user_queries: u64,
    pub fallback_actions: u64,
    pub fallback_rate: f64,
    pub by_user: Vec<SenderCount>,
    pub top_actions: Vec<LabelCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccuracyReport {
    pub evaluated_turns: u64,
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub classification: ClassificationReport,
    pub comparison: Vec<IntentPair>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackAnalysis {
    /// Share of turns the keyword labeler could not place.
    pub rule_fallback_rate: f64,
    /// Share of turns the system itself labelled as fallback.
    pub reported_fallback_rate: f64,
    /// Per-user breakdown of the rule-derived fallbacks.
    pub by_user: Vec<UserMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SatisfactionReport {
    pub basis: FallbackBasis,
    pub users: Vec<UserMetrics>,
    pub overall_conversion_rate: f64,
    pub csat: f64,
    pub nps_score: f64,
    pub promoters: u64,
    pub passives: u64,
    pub detractors: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub prediction_source: PredictionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<Overview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_distribution: Option<IntentDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_fallback: Option<ActionFallback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions: Option<SessionLengthStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction: Option<SatisfactionReport>,
}
