pub mod prediction_api;
pub mod surge_api;
