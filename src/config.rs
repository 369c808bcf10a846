use dotenvy::dotenv;
use std::env;

use crate::pipeline::thresholds::ThresholdDefaults;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,
    pub api_prefix: String,

    /// Organizational badge prefix prepended to employee tokens that
    /// arrive without it.
    pub badge_prefix: String,

    /// Organization-wide compliance minimums, env-overridable.
    pub thresholds: ThresholdDefaults,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let base = ThresholdDefaults::default();
        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string()),
            badge_prefix: env::var("BADGE_PREFIX").unwrap_or_else(|_| "GCC".to_string()),
            thresholds: ThresholdDefaults {
                weekly_days: env_f64("WEEKLY_MIN_DAYS", base.weekly_days),
                weekly_hours: env_f64("WEEKLY_MIN_HOURS", base.weekly_hours),
                monthly_days: env_f64("MONTHLY_MIN_DAYS", base.monthly_days),
                monthly_hours: env_f64("MONTHLY_MIN_HOURS", base.monthly_hours),
                quarterly_days: env_f64("QUARTERLY_MIN_DAYS", base.quarterly_days),
                quarterly_hours: env_f64("QUARTERLY_MIN_HOURS", base.quarterly_hours),
            },
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
