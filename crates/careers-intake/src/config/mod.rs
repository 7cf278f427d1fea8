use std::env;
use std::fmt;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub submission: SubmissionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let delay_ms = env::var("APP_SUBMIT_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_SUBMIT_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidSubmitDelay)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            submission: SubmissionConfig { delay_ms },
        })
    }
}

const DEFAULT_SUBMIT_DELAY_MS: u64 = 400;

/// Settings controlling the simulated submission round trip.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub delay_ms: u64,
}

impl SubmissionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_SUBMIT_DELAY_MS,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSubmitDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSubmitDelay => {
                write!(f, "APP_SUBMIT_DELAY_MS must be a valid u64 millisecond count")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_SUBMIT_DELAY_MS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.submission.delay_ms, 400);
        assert_eq!(config.submission.delay(), Duration::from_millis(400));
    }

    #[test]
    fn rejects_non_numeric_submit_delay() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SUBMIT_DELAY_MS", "soon");
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidSubmitDelay)));
        reset_env();
    }

    #[test]
    fn recognizes_production_environment() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        reset_env();
    }
}
