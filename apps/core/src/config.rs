//! Runtime configuration for the assistant, read from environment variables.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::error::AppError;

pub const ENV_MIN_DELAY_MS: &str = "STORYASSIST_MIN_DELAY_MS";
pub const ENV_MAX_DELAY_MS: &str = "STORYASSIST_MAX_DELAY_MS";
pub const ENV_STORIES_PATH: &str = "STORYASSIST_STORIES_PATH";
pub const ENV_RESPONSE_TIMEOUT_SECS: &str = "STORYASSIST_RESPONSE_TIMEOUT_SECS";

/// Settings for the simulated chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_delay_window"))]
pub struct ChatConfig {
    /// Lower bound of the simulated "thinking" delay.
    #[validate(range(max = 10_000))]
    pub min_delay_ms: u64,
    /// Upper bound of the simulated "thinking" delay.
    #[validate(range(max = 10_000))]
    pub max_delay_ms: u64,
    /// JSON file holding the story collection.
    pub stories_path: Option<PathBuf>,
    /// How long a caller waits for the supervisor to answer.
    #[validate(range(min = 1, max = 300))]
    pub response_timeout_secs: u64,
}

fn validate_delay_window(config: &ChatConfig) -> Result<(), ValidationError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ValidationError::new("min_delay_exceeds_max_delay"));
    }
    // The thinking delay has to finish before callers give up on the supervisor.
    if config.max_delay_ms >= config.response_timeout_secs.saturating_mul(1000) {
        return Err(ValidationError::new("max_delay_exceeds_response_timeout"));
    }
    Ok(())
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 800,
            max_delay_ms: 2000,
            stories_path: None,
            response_timeout_secs: 30,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(AppError::Config(format!("{}: {}", key, e))),
    }
}

impl ChatConfig {
    /// Configuration without any artificial delay.
    pub fn instant() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Reads the `STORYASSIST_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let stories_path = env::var(ENV_STORIES_PATH)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let config = Self {
            min_delay_ms: parse_env(ENV_MIN_DELAY_MS, defaults.min_delay_ms)?,
            max_delay_ms: parse_env(ENV_MAX_DELAY_MS, defaults.max_delay_ms)?,
            stories_path,
            response_timeout_secs: parse_env(ENV_RESPONSE_TIMEOUT_SECS, defaults.response_timeout_secs)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Picks a random delay inside the configured window.
    pub fn thinking_delay(&self) -> Duration {
        if self.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let min = self.min_delay_ms.min(self.max_delay_ms);
        let ms = rand::thread_rng().gen_range(min..=self.max_delay_ms);
        Duration::from_millis(ms)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VARS: [&str; 4] = [
        ENV_MIN_DELAY_MS,
        ENV_MAX_DELAY_MS,
        ENV_STORIES_PATH,
        ENV_RESPONSE_TIMEOUT_SECS,
    ];

    #[test]
    fn test_defaults_when_unset() {
        temp_env::with_vars_unset(ALL_VARS, || {
            let config = ChatConfig::from_env().unwrap();
            assert_eq!(config, ChatConfig::default());
        });
    }

    #[test]
    fn test_reads_environment() {
        temp_env::with_vars(
            [
                (ENV_MIN_DELAY_MS, Some("10")),
                (ENV_MAX_DELAY_MS, Some("20")),
                (ENV_STORIES_PATH, Some("/tmp/stories.json")),
                (ENV_RESPONSE_TIMEOUT_SECS, Some("5")),
            ],
            || {
                let config = ChatConfig::from_env().unwrap();
                assert_eq!(config.min_delay_ms, 10);
                assert_eq!(config.max_delay_ms, 20);
                assert_eq!(config.stories_path, Some(PathBuf::from("/tmp/stories.json")));
                assert_eq!(config.response_timeout(), Duration::from_secs(5));
            },
        );
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        temp_env::with_vars([(ENV_MIN_DELAY_MS, Some("schnell"))], || {
            let err = ChatConfig::from_env().unwrap_err();
            assert!(matches!(err, AppError::Config(_)));
        });
    }

    #[test]
    fn test_inverted_window_is_rejected() {
        temp_env::with_vars(
            [(ENV_MIN_DELAY_MS, Some("500")), (ENV_MAX_DELAY_MS, Some("100"))],
            || {
                let err = ChatConfig::from_env().unwrap_err();
                assert!(matches!(err, AppError::Validation(_)));
            },
        );
    }

    #[test]
    fn test_thinking_delay_within_window() {
        let config = ChatConfig {
            min_delay_ms: 5,
            max_delay_ms: 15,
            ..ChatConfig::default()
        };
        for _ in 0..50 {
            let delay = config.thinking_delay();
            assert!(delay >= Duration::from_millis(5) && delay <= Duration::from_millis(15));
        }
        assert_eq!(ChatConfig::instant().thinking_delay(), Duration::ZERO);
    }

    #[test]
    fn test_thinking_delay_with_inverted_window() {
        let config = ChatConfig {
            min_delay_ms: 500,
            max_delay_ms: 100,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());
        for _ in 0..20 {
            assert!(config.thinking_delay() <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_delay_longer_than_timeout_is_rejected() {
        let config = ChatConfig {
            min_delay_ms: 1500,
            max_delay_ms: 1500,
            response_timeout_secs: 1,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());

        temp_env::with_vars(
            [
                (ENV_MIN_DELAY_MS, Some("1000")),
                (ENV_MAX_DELAY_MS, Some("1000")),
                (ENV_RESPONSE_TIMEOUT_SECS, Some("1")),
            ],
            || {
                let err = ChatConfig::from_env().unwrap_err();
                assert!(matches!(err, AppError::Validation(_)));
            },
        );

        assert!(ChatConfig::default().validate().is_ok());
        assert!(ChatConfig::instant().validate().is_ok());
    }
}
