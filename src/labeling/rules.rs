use crate::models::{LabeledTurn, TrueIntent, UserTurn};

/// One keyword rule: any keyword contained in the lowercased text selects `intent`.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: TrueIntent,
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Evaluated top to bottom; the first match wins.
pub const INTENT_RULES: [IntentRule; 6] = [
    IntentRule {
        intent: TrueIntent::OrderStatus,
        keywords: &["order", "track", "status"],
    },
    IntentRule {
        intent: TrueIntent::ProductSearch,
        keywords: &["shoe", "jacket", "buy"],
    },
    IntentRule {
        intent: TrueIntent::ShippingInfo,
        keywords: &["ship", "delivery"],
    },
    IntentRule {
        intent: TrueIntent::ReturnRequest,
        keywords: &["return", "refund"],
    },
    IntentRule {
        intent: TrueIntent::Greet,
        keywords: &["hello", "hi"],
    },
    IntentRule {
        intent: TrueIntent::Goodbye,
        keywords: &["bye"],
    },
];

/// Map free text to its rule-derived intent. Plain substring containment, so
/// "this" counts as containing "hi".
pub fn assign_true_intent(text: &str) -> TrueIntent {
    let lowered = text.to_lowercase();

    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.intent)
        .unwrap_or(TrueIntent::NluFallback)
}

pub fn label_turns(turns: Vec<UserTurn>) -> Vec<LabeledTurn> {
    turns
        .into_iter()
        .map(|turn| {
            let true_intent = assign_true_intent(&turn.text);
            LabeledTurn { turn, true_intent }
        })
        .collect()
}
