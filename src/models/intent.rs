use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed vocabulary produced by the keyword labeler.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TrueIntent {
    OrderStatus,
    ProductSearch,
    ShippingInfo,
    ReturnRequest,
    Greet,
    Goodbye,
    NluFallback,
}

impl TrueIntent {
    pub const ALL: [TrueIntent; 7] = [
        TrueIntent::OrderStatus,
        TrueIntent::ProductSearch,
        TrueIntent::ShippingInfo,
        TrueIntent::ReturnRequest,
        TrueIntent::Greet,
        TrueIntent::Goodbye,
        TrueIntent::NluFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrueIntent::OrderStatus => "order_status",
            TrueIntent::ProductSearch => "product_search",
            TrueIntent::ShippingInfo => "shipping_info",
            TrueIntent::ReturnRequest => "return_request",
            TrueIntent::Greet => "greet",
            TrueIntent::Goodbye => "goodbye",
            TrueIntent::NluFallback => "nlu_fallback",
        }
    }

    /// True when a system-assigned label names this intent exactly.
    pub fn matches(&self, predicted: Option<&str>) -> bool {
        predicted == Some(self.as_str())
    }
}

impl fmt::Display for TrueIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
