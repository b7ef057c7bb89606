//! Session configuration.
//!
//! Every field has a default, so a config file only names what it changes:
//!
//! ```rust
//! use calc_core::session::SessionConfig;
//!
//! let config = SessionConfig::from_toml_str("time_limit_secs = 90").unwrap();
//! assert_eq!(config.time_limit_secs, 90);
//! assert_eq!(config.question_count, 10);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::problem::ProblemPool;
use super::rank::RankThresholds;
use crate::errors::{CalcError, CalcResult};

fn default_time_limit() -> u64 {
    60
}

fn default_feedback_delay() -> u64 {
    2000
}

fn default_question_count() -> usize {
    10
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whole-session countdown
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,
    /// Pause on the feedback screen before the next question
    #[serde(default = "default_feedback_delay")]
    pub feedback_delay_ms: u64,
    /// Questions per session
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default)]
    pub ranks: RankThresholds,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit(),
            feedback_delay_ms: default_feedback_delay(),
            question_count: default_question_count(),
            ranks: RankThresholds::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(src: &str) -> CalcResult<Self> {
        let config: SessionConfig = toml::from_str(src).map_err(|e| CalcError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.time_limit_secs == 0 {
            return Err(CalcError::config("time_limit_secs must be at least 1"));
        }
        if self.question_count == 0 {
            return Err(CalcError::config("question_count must be at least 1"));
        }
        Ok(())
    }

    pub fn with_time_limit(mut self, secs: u64) -> Self {
        self.time_limit_secs = secs;
        self
    }

    pub fn with_feedback_delay(mut self, millis: u64) -> Self {
        self.feedback_delay_ms = millis;
        self
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    pub fn with_ranks(mut self, ranks: RankThresholds) -> Self {
        self.ranks = ranks;
        self
    }

    /// Apply a pool's own time limit and rank tiers, when it has them.
    pub fn for_pool(mut self, pool: &ProblemPool) -> Self {
        if let Some(secs) = pool.time_limit_secs {
            self.time_limit_secs = secs;
        }
        if let Some(ranks) = &pool.ranks {
            self.ranks = ranks.clone();
        }
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    pub fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::problem::Locale;
    use crate::session::rank::RankTier;

    #[test]
    fn test_defaults() {
        let c = SessionConfig::default();
        assert_eq!(c.time_limit(), Duration::from_secs(60));
        assert_eq!(c.feedback_delay(), Duration::from_millis(2000));
        assert_eq!(c.question_count, 10);
        assert_eq!(c.ranks.tiers().len(), 4);
    }

    #[test]
    fn test_from_toml_partial() {
        let c = SessionConfig::from_toml_str("question_count = 5\nfeedback_delay_ms = 500").unwrap();
        assert_eq!(c.question_count, 5);
        assert_eq!(c.feedback_delay_ms, 500);
        assert_eq!(c.time_limit_secs, 60);
    }

    #[test]
    fn test_from_toml_rejects_zero() {
        assert_eq!(
            SessionConfig::from_toml_str("time_limit_secs = 0").unwrap_err().error_code(),
            "CONFIG_ERROR"
        );
        assert!(SessionConfig::from_toml_str("question_count = 0").is_err());
        assert!(SessionConfig::from_toml_str("question_count = \"many\"").is_err());
    }

    #[test]
    fn test_builders() {
        let c = SessionConfig::default()
            .with_time_limit(30)
            .with_feedback_delay(0)
            .with_question_count(3);
        assert_eq!((c.time_limit_secs, c.feedback_delay_ms, c.question_count), (30, 0, 3));
    }

    #[test]
    fn test_pool_overrides() {
        let mut pool = ProblemPool::new("p", Locale::It, "P", vec![]);
        pool.time_limit_secs = Some(120);
        pool.ranks = Some(RankThresholds::new(vec![RankTier::new(0, "Tutti", "🙂")]).unwrap());
        let c = SessionConfig::default().for_pool(&pool);
        assert_eq!(c.time_limit_secs, 120);
        assert_eq!(c.ranks.tiers()[0].label, "Tutti");

        let plain = ProblemPool::new("q", Locale::It, "Q", vec![]);
        assert_eq!(SessionConfig::default().for_pool(&plain), SessionConfig::default());
    }
}
