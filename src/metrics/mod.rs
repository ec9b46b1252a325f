pub mod accuracy;
pub mod frequency;
pub mod sessions;
pub mod types;
pub mod users;

pub use types::{
    AccuracyReport, ActionFallback, AnalyticsReport, ClassificationReport, ConfusionMatrix,
    FallbackAnalysis, IntentDistribution, IntentPivot, LabelCount, Overview, SatisfactionReport,
    SessionLengthStats,
};

use chrono::Utc;
use log::info;
use uuid::Uuid;

use crate::config::MetricsConfig;
use crate::pipeline::Dataset;

/// Which parts of the report to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSections {
    pub overview: bool,
    pub intent_distribution: bool,
    pub action_fallback: bool,
    pub accuracy: bool,
    pub fallback: bool,
    pub sessions: bool,
    pub satisfaction: bool,
}

impl ReportSections {
    pub fn all() -> Self {
        Self {
            overview: true,
            intent_distribution: true,
            action_fallback: true,
            accuracy: true,
            fallback: true,
            sessions: true,
            satisfaction: true,
        }
    }

    /// Intent distribution, per-user pivot and bot-side fallback actions.
    pub fn dashboard() -> Self {
        Self {
            intent_distribution: true,
            action_fallback: true,
            ..Self::default()
        }
    }

    pub fn accuracy_only() -> Self {
        Self {
            accuracy: true,
            ..Self::default()
        }
    }

    /// Everything about recognition quality and session shape.
    pub fn analysis() -> Self {
        Self {
            overview: true,
            intent_distribution: true,
            accuracy: true,
            fallback: true,
            sessions: true,
            ..Self::default()
        }
    }

    pub fn satisfaction_only() -> Self {
        Self {
            satisfaction: true,
            ..Self::default()
        }
    }
}

pub struct MetricAggregator<'a> {
    config: &'a MetricsConfig,
}

impl<'a> MetricAggregator<'a> {
    pub fn new(config: &'a MetricsConfig) -> Self {
        Self { config }
    }

    pub fn compute(&self, dataset: &Dataset, sections: ReportSections) -> AnalyticsReport {
        let config = self.config;
        let source = config.prediction_source;
        let turns = dataset.turns();
        let rows = dataset.rows();

        let accuracy = sections.accuracy.then(|| AccuracyReport {
            evaluated_turns: turns.len() as u64,
            accuracy: accuracy::accuracy(turns, source),
            confusion: accuracy::confusion_matrix(turns, source),
            classification: accuracy::classification_report(turns, source),
            comparison: accuracy::intent_comparison(turns, source),
        });

        let report = AnalyticsReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            prediction_source: source,
            overview: sections
                .overview
                .then(|| frequency::overview(turns, config)),
            intent_distribution: sections
                .intent_distribution
                .then(|| frequency::intent_distribution(rows)),
            action_fallback: sections
                .action_fallback
                .then(|| frequency::action_fallback(rows, config)),
            accuracy,
            fallback: sections
                .fallback
                .then(|| users::fallback_analysis(turns, config)),
            sessions: sections
                .sessions
                .then(|| sessions::session_length_stats(turns, config.histogram_bins)),
            satisfaction: sections
                .satisfaction
                .then(|| users::satisfaction(turns, config)),
        };

        info!(
            "Computed report {} over {} rows / {} user turns",
            report.run_id,
            rows.len(),
            turns.len()
        );
        report
    }
}
