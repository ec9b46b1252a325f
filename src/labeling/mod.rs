pub mod rules;

pub use rules::{assign_true_intent, label_turns, IntentRule, INTENT_RULES};
