use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::PredictionSource;
use crate::models::LabeledTurn;

use super::types::{
    AverageMetrics, ClassMetrics, ClassificationReport, ConfusionMatrix, IntentPair,
};

/// Fraction of turns whose system intent equals the rule-derived one.
/// A missing system intent is a miss. NaN for an empty set.
pub fn accuracy(turns: &[LabeledTurn], source: PredictionSource) -> f64 {
    if turns.is_empty() {
        return f64::NAN;
    }
    let correct = turns.iter().filter(|t| t.is_correct(source)).count();
    correct as f64 / turns.len() as f64
}

/// Square matrix over the sorted true labels present in `turns`.
///
/// Predictions outside that label set (and missing predictions) are not
/// counted anywhere, so the matrix total can be smaller than `turns.len()`.
pub fn confusion_matrix(turns: &[LabeledTurn], source: PredictionSource) -> ConfusionMatrix {
    let labels: Vec<String> = turns
        .iter()
        .map(|t| t.true_intent.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let index: HashMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut counts = vec![vec![0u64; labels.len()]; labels.len()];
    for turn in turns {
        let row = index[turn.true_intent.as_str()];
        if let Some(&col) = turn.predicted(source).and_then(|p| index.get(p)) {
            counts[row][col] += 1;
        }
    }

    ConfusionMatrix { labels, counts }
}

#[derive(Default)]
struct Tally {
    true_positive: u64,
    predicted: u64,
    support: u64,
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Per-label precision/recall/F1 over the union of true and predicted labels.
/// Zero denominators score 0.
pub fn classification_report(
    turns: &[LabeledTurn],
    source: PredictionSource,
) -> ClassificationReport {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for turn in turns {
        let truth = turn.true_intent.as_str();
        let predicted = turn.predicted(source);

        let entry = tallies.entry(truth.to_string()).or_default();
        entry.support += 1;
        if predicted == Some(truth) {
            entry.true_positive += 1;
        }

        if let Some(predicted) = predicted {
            tallies.entry(predicted.to_string()).or_default().predicted += 1;
        }
    }

    let classes: Vec<ClassMetrics> = tallies
        .into_iter()
        .map(|(label, tally)| {
            let precision = safe_div(tally.true_positive as f64, tally.predicted as f64);
            let recall = safe_div(tally.true_positive as f64, tally.support as f64);
            let f1_score = safe_div(2.0 * precision * recall, precision + recall);
            ClassMetrics {
                label,
                precision,
                recall,
                f1_score,
                support: tally.support,
            }
        })
        .collect();

    let total_support: u64 = classes.iter().map(|c| c.support).sum();
    let class_count = classes.len() as f64;

    let macro_avg = AverageMetrics {
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / class_count,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / class_count,
        f1_score: classes.iter().map(|c| c.f1_score).sum::<f64>() / class_count,
        support: total_support,
    };

    let weighted = |metric: fn(&ClassMetrics) -> f64| -> f64 {
        classes
            .iter()
            .map(|c| metric(c) * c.support as f64)
            .sum::<f64>()
            / total_support as f64
    };
    let weighted_avg = AverageMetrics {
        precision: weighted(|c: &ClassMetrics| c.precision),
        recall: weighted(|c: &ClassMetrics| c.recall),
        f1_score: weighted(|c: &ClassMetrics| c.f1_score),
        support: total_support,
    };

    ClassificationReport {
        accuracy: accuracy(turns, source),
        classes,
        macro_avg,
        weighted_avg,
    }
}

/// Counts per (true, predicted) pair; turns without a prediction are left out.
pub fn intent_comparison(turns: &[LabeledTurn], source: PredictionSource) -> Vec<IntentPair> {
    let mut pairs: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for turn in turns {
        if let Some(predicted) = turn.predicted(source) {
            *pairs.entry((turn.true_intent.as_str(), predicted)).or_insert(0) += 1;
        }
    }

    pairs
        .into_iter()
        .map(|((true_intent, predicted_intent), count)| IntentPair {
            true_intent: true_intent.to_string(),
            predicted_intent: predicted_intent.to_string(),
            count,
        })
        .collect()
}
