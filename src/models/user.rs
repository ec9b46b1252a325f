use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NpsGroup {
    Promoter,
    Passive,
    Detractor,
}

impl NpsGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            NpsGroup::Promoter => "Promoter",
            NpsGroup::Passive => "Passive",
            NpsGroup::Detractor => "Detractor",
        }
    }
}

/// Per-sender satisfaction summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMetrics {
    pub sender_id: String,
    pub total_messages: u64,
    pub fallback_messages: u64,
    pub fallback_ratio: f64,
    pub conversion_rate: f64,
    pub nps_group: NpsGroup,
}
