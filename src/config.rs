use crate::domain::TimeOfDay;
use crate::engine::SettlementEngine;
use chrono::FixedOffset;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub clock_api_url: String,
    pub clock_ttl_ms: u64,
    pub minimum_stay_days: i64,
    pub payout_delay_minutes: i64,
    pub reference_offset: FixedOffset,
    pub check_in_time: TimeOfDay,
    pub check_out_time: TimeOfDay,
    pub audit_retention: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let clock_api_url = env_map
            .get("CLOCK_API_URL")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("CLOCK_API_URL".to_string()))?;

        let clock_ttl_ms = env_map
            .get("CLOCK_TTL_MS")
            .map(|s| s.as_str())
            .unwrap_or("60000")
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "CLOCK_TTL_MS".to_string(),
                    "must be a valid u64".to_string(),
                )
            })?;

        let minimum_stay_days = env_map
            .get("MINIMUM_STAY_DAYS")
            .map(|s| s.as_str())
            .unwrap_or("7")
            .parse::<i64>()
            .ok()
            .filter(|d| *d >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MINIMUM_STAY_DAYS".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let payout_delay_minutes = env_map
            .get("PAYOUT_DELAY_MINUTES")
            .map(|s| s.as_str())
            .unwrap_or("0")
            .parse::<i64>()
            .ok()
            .filter(|m| *m >= 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "PAYOUT_DELAY_MINUTES".to_string(),
                    "must be a non-negative integer".to_string(),
                )
            })?;

        let reference_offset = env_map
            .get("REFERENCE_UTC_OFFSET_HOURS")
            .map(|s| s.as_str())
            .unwrap_or("7")
            .parse::<i32>()
            .ok()
            .and_then(|h| FixedOffset::east_opt(h * 3600))
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "REFERENCE_UTC_OFFSET_HOURS".to_string(),
                    "must be an integer between -23 and 23".to_string(),
                )
            })?;

        let check_in_time = TimeOfDay::parse(
            env_map
                .get("CHECK_IN_TIME")
                .map(|s| s.as_str())
                .unwrap_or("14:00"),
        )
        .map_err(|_| {
            ConfigError::InvalidValue("CHECK_IN_TIME".to_string(), "must be HH:mm".to_string())
        })?;

        let check_out_time = TimeOfDay::parse(
            env_map
                .get("CHECK_OUT_TIME")
                .map(|s| s.as_str())
                .unwrap_or("12:00"),
        )
        .map_err(|_| {
            ConfigError::InvalidValue("CHECK_OUT_TIME".to_string(), "must be HH:mm".to_string())
        })?;

        let audit_retention = env_map
            .get("AUDIT_RETENTION")
            .map(|s| s.as_str())
            .unwrap_or("500")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "AUDIT_RETENTION".to_string(),
                    "must be a valid usize".to_string(),
                )
            })?;

        Ok(Config {
            port,
            database_path,
            clock_api_url,
            clock_ttl_ms,
            minimum_stay_days,
            payout_delay_minutes,
            reference_offset,
            check_in_time,
            check_out_time,
            audit_retention,
        })
    }

    /// TTL for the server-clock cache.
    pub fn clock_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.clock_ttl_ms)
    }

    /// Settlement engine configured from this config.
    pub fn settlement_engine(&self) -> SettlementEngine {
        SettlementEngine::new(
            self.reference_offset,
            self.check_in_time,
            self.check_out_time,
            chrono::Duration::minutes(self.payout_delay_minutes),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map.insert(
            "CLOCK_API_URL".to_string(),
            "https://time.example.com/v1/now".to_string(),
        );
        map
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.clock_ttl_ms, 60000);
        assert_eq!(cfg.minimum_stay_days, 7);
        assert_eq!(cfg.payout_delay_minutes, 0);
        assert_eq!(cfg.reference_offset, FixedOffset::east_opt(7 * 3600).unwrap());
        assert_eq!(cfg.check_in_time.to_string(), "14:00");
        assert_eq!(cfg.check_out_time.to_string(), "12:00");
        assert_eq!(cfg.audit_retention, 500);
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_missing_clock_api_url() {
        let mut env_map = setup_required_env();
        env_map.remove("CLOCK_API_URL");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "CLOCK_API_URL"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_minimum_stay() {
        let mut env_map = setup_required_env();
        env_map.insert("MINIMUM_STAY_DAYS".to_string(), "0".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "MINIMUM_STAY_DAYS"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_reference_offset() {
        let mut env_map = setup_required_env();
        env_map.insert("REFERENCE_UTC_OFFSET_HOURS".to_string(), "30".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => {
                assert_eq!(k, "REFERENCE_UTC_OFFSET_HOURS")
            }
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_check_in_time() {
        let mut env_map = setup_required_env();
        env_map.insert("CHECK_IN_TIME".to_string(), "2pm".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "CHECK_IN_TIME"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_payout_delay_rejected() {
        let mut env_map = setup_required_env();
        env_map.insert("PAYOUT_DELAY_MINUTES".to_string(), "-5".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PAYOUT_DELAY_MINUTES"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
