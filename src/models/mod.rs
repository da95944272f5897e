mod api_response;
mod group;
mod prediction;
mod price_point;
mod sentiment;
mod signal;
mod summary;

pub use api_response::{PredictionsResponse, ScreenerInfo, StockAnalysisResponse, TrainResult};
pub use group::Group;
pub use prediction::StockPrediction;
pub use price_point::PricePoint;
pub use sentiment::{NewsSentiment, SentimentDetail, SocialSentiment};
pub use signal::{IndicatorSet, Signal, SignalCounts, SignalType};
pub use summary::{ScanInfo, ScoreBand, SummaryStats, MODERATE_THRESHOLD, STRONG_THRESHOLD};

#[cfg(test)]
pub(crate) use prediction::sample_prediction;
