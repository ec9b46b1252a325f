use std::collections::BTreeMap;

use crate::config::{FallbackBasis, MetricsConfig};
use crate::models::{LabeledTurn, NpsGroup, TrueIntent, UserMetrics};

use super::types::{FallbackAnalysis, SatisfactionReport};

/// `fallback / total`, or 0 when the user has no messages.
pub fn fallback_ratio(fallback_messages: u64, total_messages: u64) -> f64 {
    if total_messages == 0 {
        return 0.0;
    }
    fallback_messages as f64 / total_messages as f64
}

/// Promoter below `promoter_threshold`, Passive below `passive_threshold`,
/// Detractor otherwise.
pub fn classify_nps(fallback_ratio: f64, config: &MetricsConfig) -> NpsGroup {
    if fallback_ratio < config.promoter_threshold {
        NpsGroup::Promoter
    } else if fallback_ratio < config.passive_threshold {
        NpsGroup::Passive
    } else {
        NpsGroup::Detractor
    }
}

/// (Promoters − Detractors) / users × 100. NaN with no users.
pub fn nps_score<I>(groups: I) -> f64
where
    I: IntoIterator<Item = NpsGroup>,
{
    let (mut total, mut promoters, mut detractors) = (0u64, 0u64, 0u64);
    for group in groups {
        total += 1;
        match group {
            NpsGroup::Promoter => promoters += 1,
            NpsGroup::Detractor => detractors += 1,
            NpsGroup::Passive => {}
        }
    }

    if total == 0 {
        return f64::NAN;
    }
    (promoters as f64 - detractors as f64) / total as f64 * 100.0
}

fn is_fallback(turn: &LabeledTurn, basis: FallbackBasis, config: &MetricsConfig) -> bool {
    match basis {
        FallbackBasis::RuleDerived => turn.true_intent == TrueIntent::NluFallback,
        FallbackBasis::SystemReported => {
            turn.predicted(config.prediction_source) == Some(config.fallback_intent.as_str())
        }
    }
}

/// One entry per sender, sorted by `sender_id`.
pub fn user_metrics(
    turns: &[LabeledTurn],
    basis: FallbackBasis,
    config: &MetricsConfig,
) -> Vec<UserMetrics> {
    let mut per_user: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for turn in turns {
        let entry = per_user.entry(turn.sender_id()).or_insert((0, 0));
        entry.0 += 1;
        if is_fallback(turn, basis, config) {
            entry.1 += 1;
        }
    }

    per_user
        .into_iter()
        .map(|(sender_id, (total_messages, fallback_messages))| {
            let ratio = fallback_ratio(fallback_messages, total_messages);
            UserMetrics {
                sender_id: sender_id.to_string(),
                total_messages,
                fallback_messages,
                fallback_ratio: ratio,
                conversion_rate: 1.0 - ratio,
                nps_group: classify_nps(ratio, config),
            }
        })
        .collect()
}

/// Unweighted mean of per-user conversion rates. NaN with no users.
pub fn mean_conversion_rate(users: &[UserMetrics]) -> f64 {
    if users.is_empty() {
        return f64::NAN;
    }
    users.iter().map(|u| u.conversion_rate).sum::<f64>() / users.len() as f64
}

/// Share of turns the keyword labeler sent to `nlu_fallback`.
pub fn rule_fallback_rate(turns: &[LabeledTurn]) -> f64 {
    share(turns, |t| t.true_intent == TrueIntent::NluFallback)
}

/// Share of turns the system itself labelled with the fallback intent.
pub fn reported_fallback_rate(turns: &[LabeledTurn], config: &MetricsConfig) -> f64 {
    share(turns, |t| is_fallback(t, FallbackBasis::SystemReported, config))
}

fn share<F>(turns: &[LabeledTurn], predicate: F) -> f64
where
    F: Fn(&LabeledTurn) -> bool,
{
    if turns.is_empty() {
        return f64::NAN;
    }
    turns.iter().filter(|t| predicate(*t)).count() as f64 / turns.len() as f64
}

pub fn fallback_analysis(turns: &[LabeledTurn], config: &MetricsConfig) -> FallbackAnalysis {
    FallbackAnalysis {
        rule_fallback_rate: rule_fallback_rate(turns),
        reported_fallback_rate: reported_fallback_rate(turns, config),
        by_user: user_metrics(turns, FallbackBasis::RuleDerived, config),
    }
}

pub fn satisfaction(turns: &[LabeledTurn], config: &MetricsConfig) -> SatisfactionReport {
    let basis = config.user_fallback_basis;
    let users = user_metrics(turns, basis, config);

    let count = |group: NpsGroup| users.iter().filter(|u| u.nps_group == group).count() as u64;

    SatisfactionReport {
        basis,
        overall_conversion_rate: mean_conversion_rate(&users),
        csat: 1.0 - reported_fallback_rate(turns, config),
        nps_score: nps_score(users.iter().map(|u| u.nps_group)),
        promoters: count(NpsGroup::Promoter),
        passives: count(NpsGroup::Passive),
        detractors: count(NpsGroup::Detractor),
        users,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserTurn;

    fn turn(sender: &str, true_intent: TrueIntent, reported: Option<&str>) -> LabeledTurn {
        LabeledTurn {
            turn: UserTurn {
                sender_id: sender.into(),
                timestamp: None,
                text: String::new(),
                predicted_intent: None,
                reported_intent: reported.map(str::to_string),
            },
            true_intent,
        }
    }

    #[test]
    fn zero_messages_gives_zero_ratio() {
        let ratio = fallback_ratio(0, 0);
        assert_eq!(ratio, 0.0);
        assert!(!ratio.is_nan());
        assert_eq!(fallback_ratio(1, 4), 0.25);
    }

    #[test]
    fn nps_thresholds_are_strict() {
        let config = MetricsConfig::default();
        assert_eq!(classify_nps(0.0, &config), NpsGroup::Promoter);
        assert_eq!(classify_nps(0.19, &config), NpsGroup::Promoter);
        assert_eq!(classify_nps(0.2, &config), NpsGroup::Passive);
        assert_eq!(classify_nps(0.49, &config), NpsGroup::Passive);
        assert_eq!(classify_nps(0.5, &config), NpsGroup::Detractor);
        assert_eq!(classify_nps(1.0, &config), NpsGroup::Detractor);
    }

    #[test]
    fn nps_ten_user_scenario() {
        let config = MetricsConfig::default();
        let ratios = [0.5, 0.9, 0.0, 0.1, 0.15, 0.2, 0.25, 0.3, 0.4, 0.45];
        let groups: Vec<_> = ratios.iter().map(|r| classify_nps(*r, &config)).collect();
        assert_eq!(groups.iter().filter(|g| **g == NpsGroup::Detractor).count(), 2);
        assert_eq!(groups.iter().filter(|g| **g == NpsGroup::Promoter).count(), 3);
        assert_eq!(nps_score(groups), 10.0);
    }

    #[test]
    fn nps_without_users_is_nan() {
        assert!(nps_score(Vec::<NpsGroup>::new()).is_nan());
    }

    #[test]
    fn user_metrics_by_basis() {
        let config = MetricsConfig::default();
        let turns = vec![
            turn("b", TrueIntent::NluFallback, Some("greet")),
            turn("a", TrueIntent::Greet, Some("nlu_fallback")),
            turn("a", TrueIntent::Greet, Some("greet")),
            turn("b", TrueIntent::Goodbye, None),
        ];

        let reported = user_metrics(&turns, FallbackBasis::SystemReported, &config);
        assert_eq!(reported.len(), 2);
        assert_eq!(reported[0].sender_id, "a");
        assert_eq!(reported[0].total_messages, 2);
        assert_eq!(reported[0].fallback_messages, 1);
        assert_eq!(reported[0].fallback_ratio, 0.5);
        assert_eq!(reported[0].conversion_rate, 0.5);
        assert_eq!(reported[0].nps_group, NpsGroup::Detractor);
        assert_eq!(reported[1].fallback_messages, 0);
        assert_eq!(reported[1].nps_group, NpsGroup::Promoter);

        let rule = user_metrics(&turns, FallbackBasis::RuleDerived, &config);
        assert_eq!(rule[0].fallback_messages, 0);
        assert_eq!(rule[1].fallback_messages, 1);
    }

    #[test]
    fn conversion_is_unweighted_across_users() {
        let config = MetricsConfig::default();
        // a: 1/4 fallback, b: 1/1 fallback
        let turns = vec![
            turn("a", TrueIntent::NluFallback, Some("nlu_fallback")),
            turn("a", TrueIntent::Greet, Some("greet")),
            turn("a", TrueIntent::Greet, Some("greet")),
            turn("a", TrueIntent::Greet, Some("greet")),
            turn("b", TrueIntent::NluFallback, Some("nlu_fallback")),
        ];
        let report = satisfaction(&turns, &config);

        // mean(0.75, 0.0), not 1 - 2/5
        assert_eq!(report.overall_conversion_rate, 0.375);
        assert!((report.csat - 0.6).abs() < 1e-12);
        assert_eq!(report.promoters, 0);
        assert_eq!(report.passives, 1);
        assert_eq!(report.detractors, 1);
        assert_eq!(report.nps_score, -50.0);
    }

    #[test]
    fn two_fallback_rates_stay_separate() {
        let config = MetricsConfig::default();
        let turns = vec![
            turn("a", TrueIntent::NluFallback, Some("greet")),
            turn("a", TrueIntent::NluFallback, Some("nlu_fallback")),
            turn("a", TrueIntent::Greet, Some("greet")),
            turn("a", TrueIntent::Greet, Some("greet")),
        ];
        let analysis = fallback_analysis(&turns, &config);
        assert_eq!(analysis.rule_fallback_rate, 0.5);
        assert_eq!(analysis.reported_fallback_rate, 0.25);
        assert_eq!(analysis.by_user[0].fallback_messages, 2);
    }

    #[test]
    fn empty_input_degenerates_without_panicking() {
        let config = MetricsConfig::default();
        let report = satisfaction(&[], &config);
        assert!(report.users.is_empty());
        assert!(report.overall_conversion_rate.is_nan());
        assert!(report.csat.is_nan());
        assert!(report.nps_score.is_nan());
        assert!(rule_fallback_rate(&[]).is_nan());
    }
}
