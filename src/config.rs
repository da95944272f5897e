use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::models::Group;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub bind_addr: String,
    pub prediction_limit: u32,
    pub min_score: f64,
    pub refresh_workers: u32,
    pub auto_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub refresh_timeout_secs: u64,
    pub default_group: Group,
}

/// The part of the configuration the dashboard service needs
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub prediction_limit: u32,
    pub min_score: f64,
    pub refresh_workers: u32,
    pub auto_refresh_period: Duration,
    pub initial_group: Group,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            prediction_limit: 50,
            min_score: 0.0,
            refresh_workers: 5,
            auto_refresh_period: Duration::from_secs(300),
            initial_group: Group::default(),
        }
    }
}

fn env_or<T: FromStr + Display>(key: &str, default: T) -> T {
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T: FromStr + Display>(key: &str, raw: Option<String>, default: T) -> T {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!("⚠️ Ignoring {}={:?}: not a valid value, using {}", key, raw, default);
            default
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: std::env::var("SURGE_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            prediction_limit: env_or("PREDICTION_LIMIT", 50),
            min_score: env_or("PREDICTION_MIN_SCORE", 0.0),
            refresh_workers: env_or("REFRESH_WORKERS", 5),
            auto_refresh_secs: env_or("AUTO_REFRESH_SECS", 300),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            refresh_timeout_secs: env_or("REFRESH_TIMEOUT_SECS", 600),
            default_group: env_or("DEFAULT_GROUP", Group::Sp500),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("SURGE_API_URL '{}' is not a valid URL: {}", self.api_base_url, e))?;

        if self.prediction_limit == 0 || self.prediction_limit > 200 {
            return Err("PREDICTION_LIMIT must be between 1 and 200".to_string());
        }
        if !(0.0..=100.0).contains(&self.min_score) {
            return Err("PREDICTION_MIN_SCORE must be between 0 and 100".to_string());
        }
        if self.refresh_workers == 0 || self.refresh_workers > 20 {
            return Err("REFRESH_WORKERS must be between 1 and 20".to_string());
        }
        if self.auto_refresh_secs == 0 {
            return Err("AUTO_REFRESH_SECS must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 || self.refresh_timeout_secs == 0 {
            return Err("Request timeouts must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            prediction_limit: self.prediction_limit,
            min_score: self.min_score,
            refresh_workers: self.refresh_workers,
            auto_refresh_period: Duration::from_secs(self.auto_refresh_secs),
            initial_group: self.default_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DashboardConfig {
        DashboardConfig {
            api_base_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            prediction_limit: 50,
            min_score: 0.0,
            refresh_workers: 5,
            auto_refresh_secs: 300,
            request_timeout_secs: 30,
            refresh_timeout_secs: 600,
            default_group: Group::Sp500,
        }
    }

    #[test]
    fn test_malformed_env_value_falls_back_to_default() {
        assert_eq!(parse_or("PREDICTION_LIMIT", Some("abc".into()), 50u32), 50);
        assert_eq!(parse_or("PREDICTION_LIMIT", Some(" 75 ".into()), 50u32), 75);
        assert_eq!(parse_or("PREDICTION_LIMIT", None, 50u32), 50);
        assert_eq!(parse_or("DEFAULT_GROUP", Some("dow".into()), Group::Sp500), Group::Sp500);
        assert_eq!(
            parse_or("DEFAULT_GROUP", Some("nasdaq100".into()), Group::Sp500),
            Group::Nasdaq100
        );
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = DashboardConfig { api_base_url: "not a url".into(), ..base() };
        assert!(config.validate().unwrap_err().contains("SURGE_API_URL"));
    }

    #[test]
    fn test_rejects_out_of_range_limit_and_workers() {
        assert!(DashboardConfig { prediction_limit: 0, ..base() }.validate().is_err());
        assert!(DashboardConfig { prediction_limit: 201, ..base() }.validate().is_err());
        assert!(DashboardConfig { refresh_workers: 21, ..base() }.validate().is_err());
        assert!(DashboardConfig { auto_refresh_secs: 0, ..base() }.validate().is_err());
    }

    #[test]
    fn test_refresh_timeout_is_much_longer_than_request_timeout() {
        let config = base();
        assert!(config.refresh_timeout() >= config.request_timeout() * 10);
        assert_eq!(config.settings().auto_refresh_period, Duration::from_secs(300));
    }
}
