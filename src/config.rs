//! 환경 변수 기반 설정
//! `.env` 파일이 있으면 먼저 읽는다.
// region:    --- Imports
use crate::scheduler::Latency;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub latency: Latency,
    /// 경매 상태 스케줄러 주기
    pub sweep_interval: Duration,
    /// 마감 임박(ending-soon)으로 바뀌는 남은 시간
    pub ending_soon_window: chrono::Duration,
    pub activity_capacity: usize,
}

impl Config {
    /// 환경 변수가 없으면 `Config::default()` 값을 쓴다.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let latency = Latency {
            place_bid: env_millis("PLACE_BID_LATENCY_MS", defaults.latency.place_bid)?,
            accept: env_millis("ACCEPT_LATENCY_MS", defaults.latency.accept)?,
            reject: env_millis("REJECT_LATENCY_MS", defaults.latency.reject)?,
            cancel: env_millis("CANCEL_LATENCY_MS", defaults.latency.cancel)?,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_or("PORT", defaults.port)?,
            latency,
            sweep_interval: Duration::from_secs(env_or(
                "SWEEP_INTERVAL_SECS",
                defaults.sweep_interval.as_secs(),
            )?),
            ending_soon_window: chrono::Duration::hours(env_or(
                "ENDING_SOON_HOURS",
                defaults.ending_soon_window.num_hours(),
            )?),
            activity_capacity: env_or("ACTIVITY_FEED_CAPACITY", defaults.activity_capacity)?,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            latency: Latency::default(),
            sweep_interval: Duration::from_secs(1),
            ending_soon_window: chrono::Duration::hours(24),
            activity_capacity: 50,
        }
    }
}

fn env_millis(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let millis = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    Ok(Duration::from_millis(env_or(key, millis)?))
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { key, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_latency_matches_simulated_round_trips() {
        let config = Config::default();
        assert_eq!(config.latency.place_bid, Duration::from_millis(1500));
        assert_eq!(config.latency.accept, Duration::from_millis(1000));
        assert_eq!(config.latency.reject, Duration::from_millis(500));
        assert_eq!(config.addr(), "0.0.0.0:3000");
    }

    #[test]
    fn env_values_override_defaults() {
        std::env::set_var("DIAMOND_TEST_LATENCY_MS", " 250 ");
        let latency = env_millis("DIAMOND_TEST_LATENCY_MS", Duration::from_millis(1500)).unwrap();
        assert_eq!(latency, Duration::from_millis(250));
        std::env::remove_var("DIAMOND_TEST_LATENCY_MS");

        let fallback = env_millis("DIAMOND_TEST_LATENCY_MS", Duration::from_millis(1500)).unwrap();
        assert_eq!(fallback, Duration::from_millis(1500));
    }

    #[test]
    fn rejects_non_numeric_values() {
        std::env::set_var("DIAMOND_TEST_PORT", "abc");
        let err = env_or::<u16>("DIAMOND_TEST_PORT", 1).unwrap_err();
        assert!(err.to_string().contains("DIAMOND_TEST_PORT"));
        std::env::remove_var("DIAMOND_TEST_PORT");
    }
}
