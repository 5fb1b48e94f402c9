use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::effectiveness::DEFAULT_WINDOW;
use crate::assessment::session::DEFAULT_QUESTIONS_PER_SESSION;
use crate::difficulty::{DifficultyAdjuster, DEFAULT_UPPER_BOUND, MIN_LEVEL};

pub const DEFAULT_STYLE_EFFECTIVENESS_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Number of most recent observations the analyzer looks at.
    pub adaptation_window: usize,
    pub style_effectiveness_threshold: f64,
    /// Highest skill level. Both 5 and 10 are in use; 5 is the default.
    pub difficulty_upper_bound: u8,
    pub questions_per_session: usize,
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            adaptation_window: DEFAULT_WINDOW,
            style_effectiveness_threshold: DEFAULT_STYLE_EFFECTIVENESS_THRESHOLD,
            difficulty_upper_bound: DEFAULT_UPPER_BOUND,
            questions_per_session: DEFAULT_QUESTIONS_PER_SESSION,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("adaptation window must be at least 1")]
    ZeroWindow,
    #[error("style effectiveness threshold must be finite, got {0}")]
    InvalidThreshold(f64),
    #[error("difficulty upper bound must be at least 1, got {0}")]
    InvalidUpperBound(u8),
    #[error("questions per session must be at least 1")]
    NoQuestions,
}

impl EngineConfig {
    /// Reads overrides from the environment. Missing or unparsable values keep
    /// their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let adaptation_window = env_parse("ADAPTATION_WINDOW").unwrap_or(defaults.adaptation_window);
        let style_effectiveness_threshold = env_parse("STYLE_EFFECTIVENESS_THRESHOLD")
            .unwrap_or(defaults.style_effectiveness_threshold);
        let difficulty_upper_bound =
            env_parse("DIFFICULTY_UPPER_BOUND").unwrap_or(defaults.difficulty_upper_bound);
        let questions_per_session =
            env_parse("QUESTIONS_PER_SESSION").unwrap_or(defaults.questions_per_session);
        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        Self {
            adaptation_window,
            style_effectiveness_threshold,
            difficulty_upper_bound,
            questions_per_session,
            log_level,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.adaptation_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if !self.style_effectiveness_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.style_effectiveness_threshold));
        }
        if self.difficulty_upper_bound < MIN_LEVEL {
            return Err(ConfigError::InvalidUpperBound(self.difficulty_upper_bound));
        }
        if self.questions_per_session == 0 {
            return Err(ConfigError::NoQuestions);
        }
        Ok(())
    }

    pub fn difficulty_adjuster(&self) -> DifficultyAdjuster {
        DifficultyAdjuster::new(self.difficulty_upper_bound)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.trim().parse::<T>().ok())
}
