use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// One trading day in a ticker's trailing price history (ascending by date).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}
