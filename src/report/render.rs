//! Plain-text rendering of an [`AnalyticsReport`] for the terminal.

use std::fmt::Write;

use crate::metrics::types::{
    AccuracyReport, ActionFallback, ClassificationReport, ConfusionMatrix, FallbackAnalysis,
    IntentDistribution, Overview, SatisfactionReport, SessionLengthStats,
};
use crate::metrics::AnalyticsReport;

fn pct(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}%", value * 100.0)
    }
}

fn num(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {title} ==");
}

pub fn render_report(report: &AnalyticsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Report {} generated {}",
        report.run_id,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if let Some(overview) = &report.overview {
        render_overview(&mut out, overview);
    }
    if let Some(distribution) = &report.intent_distribution {
        render_distribution(&mut out, distribution);
    }
    if let Some(actions) = &report.action_fallback {
        render_action_fallback(&mut out, actions);
    }
    if let Some(fallback) = &report.fallback {
        render_fallback(&mut out, fallback);
    }
    if let Some(accuracy) = &report.accuracy {
        render_accuracy(&mut out, accuracy);
    }
    if let Some(sessions) = &report.sessions {
        render_sessions(&mut out, sessions);
    }
    if let Some(satisfaction) = &report.satisfaction {
        render_satisfaction(&mut out, satisfaction);
    }

    out
}

fn render_overview(out: &mut String, overview: &Overview) {
    heading(out, "Overview");
    let _ = writeln!(out, "Number of unique users:   {}", overview.unique_users);
    let _ = writeln!(out, "Total user queries:       {}", overview.total_queries);
    let _ = writeln!(out, "Number of unique intents: {}", overview.unique_intents);
    let _ = writeln!(out, "Successful queries:       {}", overview.successful_queries);
    let _ = writeln!(out, "Fallback queries:         {}", overview.fallback_queries);
}

fn render_distribution(out: &mut String, distribution: &IntentDistribution) {
    heading(out, "Intent frequency distribution");
    for entry in &distribution.frequency {
        let _ = writeln!(out, "{:<24} {:>6}", entry.label, entry.count);
    }

    heading(out, "User x intent frequency");
    let _ = write!(out, "{:<24}", "sender_id");
    for intent in &distribution.pivot.intents {
        let _ = write!(out, " {intent:>16}");
    }
    let _ = writeln!(out);
    for row in &distribution.pivot.rows {
        let _ = write!(out, "{:<24}", row.sender_id);
        for count in &row.counts {
            let _ = write!(out, " {count:>16}");
        }
        let _ = writeln!(out);
    }
}

fn render_action_fallback(out: &mut String, actions: &ActionFallback) {
    heading(out, "Bot fallback actions");
    let _ = writeln!(out, "Fallback rate: {}", pct(actions.fallback_rate));
    let _ = writeln!(out, "Total user queries: {}", actions.total_user_queries);
    let _ = writeln!(out, "Fallback actions: {}", actions.fallback_actions);
    for entry in &actions.by_user {
        let _ = writeln!(out, "  {:<24} {:>6}", entry.sender_id, entry.count);
    }
    let _ = writeln!(out, "Top actions:");
    for entry in &actions.top_actions {
        let _ = writeln!(out, "  {:<32} {:>6}", entry.label, entry.count);
    }
}

fn render_fallback(out: &mut String, fallback: &FallbackAnalysis) {
    heading(out, "Fallback analysis");
    let _ = writeln!(
        out,
        "Overall fallback rate (keyword rules): {}",
        pct(fallback.rule_fallback_rate)
    );
    let _ = writeln!(
        out,
        "Overall fallback rate (system intent): {}",
        pct(fallback.reported_fallback_rate)
    );
    let _ = writeln!(
        out,
        "{:<24} {:>14} {:>14} {:>14}",
        "sender_id", "total_queries", "fallback_count", "fallback_ratio"
    );
    for user in &fallback.by_user {
        let _ = writeln!(
            out,
            "{:<24} {:>14} {:>14} {:>14.4}",
            user.sender_id, user.total_messages, user.fallback_messages, user.fallback_ratio
        );
    }
}

fn render_confusion(out: &mut String, confusion: &ConfusionMatrix) {
    let _ = writeln!(out, "Confusion matrix (rows = true, columns = predicted):");
    let _ = write!(out, "{:<16}", "");
    for label in &confusion.labels {
        let _ = write!(out, " {label:>16}");
    }
    let _ = writeln!(out);
    for (label, row) in confusion.labels.iter().zip(&confusion.counts) {
        let _ = write!(out, "{label:<16}");
        for count in row {
            let _ = write!(out, " {count:>16}");
        }
        let _ = writeln!(out);
    }
}

fn render_classification(out: &mut String, report: &ClassificationReport) {
    let _ = writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>10} {:>10}",
        "", "precision", "recall", "f1-score", "support"
    );
    for class in &report.classes {
        let _ = writeln!(
            out,
            "{:<16} {:>10.2} {:>10.2} {:>10.2} {:>10}",
            class.label, class.precision, class.recall, class.f1_score, class.support
        );
    }
    let _ = writeln!(
        out,
        "{:<16} {:>10} {:>10} {:>10} {:>10}",
        "accuracy",
        "",
        "",
        num(report.accuracy),
        report.macro_avg.support
    );
    for (name, avg) in [("macro avg", &report.macro_avg), ("weighted avg", &report.weighted_avg)] {
        let _ = writeln!(
            out,
            "{:<16} {:>10} {:>10} {:>10} {:>10}",
            name,
            num(avg.precision),
            num(avg.recall),
            num(avg.f1_score),
            avg.support
        );
    }
}

fn render_accuracy(out: &mut String, accuracy: &AccuracyReport) {
    heading(out, "Intent recognition");
    let _ = writeln!(
        out,
        "Intent Recognition Accuracy: {} over {} turns",
        pct(accuracy.accuracy),
        accuracy.evaluated_turns
    );
    render_confusion(out, &accuracy.confusion);
    let _ = writeln!(out);
    render_classification(out, &accuracy.classification);

    let _ = writeln!(out, "\nIntent comparison:");
    for pair in &accuracy.comparison {
        let _ = writeln!(
            out,
            "  {:<16} -> {:<24} {:>6}",
            pair.true_intent, pair.predicted_intent, pair.count
        );
    }
}

fn render_sessions(out: &mut String, sessions: &SessionLengthStats) {
    heading(out, "Session length (messages per session)");
    let rows = [
        ("count", sessions.count as f64),
        ("mean", sessions.mean),
        ("std", sessions.std),
        ("min", sessions.min),
        ("25%", sessions.p25),
        ("50%", sessions.p50),
        ("75%", sessions.p75),
        ("max", sessions.max),
    ];
    for (name, value) in rows {
        let _ = writeln!(out, "{name:<8} {:>10}", num(value));
    }

    if !sessions.histogram.is_empty() {
        let _ = writeln!(out, "Histogram:");
        for bin in &sessions.histogram {
            let _ = writeln!(
                out,
                "  [{:>8.2}, {:>8.2}) {:>6} {}",
                bin.lower,
                bin.upper,
                bin.count,
                "#".repeat(bin.count.min(60) as usize)
            );
        }
    }
}

fn render_satisfaction(out: &mut String, satisfaction: &SatisfactionReport) {
    heading(out, "User satisfaction");
    let _ = writeln!(out, "{:<24} {:>16} {:>10}", "sender_id", "conversion_rate", "nps_group");
    for user in &satisfaction.users {
        let _ = writeln!(
            out,
            "{:<24} {:>16.4} {:>10}",
            user.sender_id,
            user.conversion_rate,
            user.nps_group.as_str()
        );
    }
    let _ = writeln!(
        out,
        "Overall Conversion Rate: {}",
        pct(satisfaction.overall_conversion_rate)
    );
    let _ = writeln!(out, "Estimated CSAT: {}", pct(satisfaction.csat));
    let _ = writeln!(
        out,
        "Estimated NPS Score: {} (promoters {}, passives {}, detractors {})",
        num(satisfaction.nps_score),
        satisfaction.promoters,
        satisfaction.passives,
        satisfaction.detractors
    );
}
