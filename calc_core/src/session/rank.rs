//! Rank tiers awarded at the end of a session.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// One tier: reached when the score is at least `min_percent` of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub min_percent: u32,
    pub label: String,
    pub emoji: String,
}

impl RankTier {
    pub fn new(min_percent: u32, label: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            min_percent,
            label: label.into(),
            emoji: emoji.into(),
        }
    }
}

/// Ordered tiers, highest threshold first.
///
/// In TOML this is an array of tables:
///
/// ```toml
/// [[ranks]]
/// min_percent = 90
/// label = "Maestro"
/// emoji = "🏆"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RankTier>", into = "Vec<RankTier>")]
pub struct RankThresholds(Vec<RankTier>);

impl TryFrom<Vec<RankTier>> for RankThresholds {
    type Error = CalcError;

    fn try_from(tiers: Vec<RankTier>) -> CalcResult<Self> {
        Self::new(tiers)
    }
}

impl From<RankThresholds> for Vec<RankTier> {
    fn from(ranks: RankThresholds) -> Self {
        ranks.0
    }
}

impl RankThresholds {
    /// Build from tiers in any order.
    pub fn new(mut tiers: Vec<RankTier>) -> CalcResult<Self> {
        if tiers.is_empty() {
            return Err(CalcError::config("rank thresholds need at least one tier"));
        }
        if let Some(t) = tiers.iter().find(|t| t.min_percent > 100) {
            return Err(CalcError::config(format!(
                "rank '{}' requires {}%, above 100",
                t.label, t.min_percent
            )));
        }
        tiers.sort_by(|a, b| b.min_percent.cmp(&a.min_percent));
        Ok(Self(tiers))
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.0
    }

    /// Highest tier whose threshold the score reaches.
    ///
    /// A total of zero, or a score below every threshold, yields the lowest
    /// tier. Integer comparison (`score * 100 >= min_percent * total`) keeps
    /// boundaries exact.
    pub fn rank_for(&self, score: usize, total: usize) -> &RankTier {
        let lowest = self.lowest();
        if total == 0 {
            return lowest;
        }
        let score = score as u64;
        let total = total as u64;
        self.0
            .iter()
            .find(|t| score * 100 >= u64::from(t.min_percent) * total)
            .unwrap_or(lowest)
    }

    fn lowest(&self) -> &RankTier {
        // Constructors guarantee at least one tier
        &self.0[self.0.len() - 1]
    }
}

impl Default for RankThresholds {
    fn default() -> Self {
        Self(vec![
            RankTier::new(80, "¡Genio!", "🏆"),
            RankTier::new(60, "Muy bien", "🌟"),
            RankTier::new(40, "Aprendiz", "📚"),
            RankTier::new(0, "Sigue practicando", "💪"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tiers() {
        let ranks = RankThresholds::default();
        assert_eq!(ranks.rank_for(10, 10).min_percent, 80);
        assert_eq!(ranks.rank_for(8, 10).min_percent, 80);
        assert_eq!(ranks.rank_for(7, 10).min_percent, 60);
        assert_eq!(ranks.rank_for(4, 10).min_percent, 40);
        assert_eq!(ranks.rank_for(3, 10).label, "Sigue practicando");
    }

    #[test]
    fn test_zero_total_is_lowest() {
        let ranks = RankThresholds::default();
        assert_eq!(ranks.rank_for(0, 0).min_percent, 0);
    }

    #[test]
    fn test_boundaries_are_exact() {
        // 2/3 = 66.67% must not reach a 67% tier through float rounding
        let ranks = RankThresholds::new(vec![RankTier::new(67, "A", "a"), RankTier::new(0, "B", "b")]).unwrap();
        assert_eq!(ranks.rank_for(2, 3).label, "B");
        assert_eq!(ranks.rank_for(67, 100).label, "A");
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        #[derive(Deserialize)]
        struct Wrapper {
            ranks: RankThresholds,
        }
        let ok: Wrapper = toml::from_str(
            "[[ranks]]\nmin_percent = 0\nlabel = \"low\"\nemoji = \".\"\n\n[[ranks]]\nmin_percent = 50\nlabel = \"mid\"\nemoji = \"!\"\n",
        )
        .unwrap();
        assert_eq!(ok.ranks.tiers()[0].label, "mid");
        assert!(serde_json::from_str::<RankThresholds>("[]").is_err());
    }

    #[test]
    fn test_new_sorts_and_validates() {
        let ranks = RankThresholds::new(vec![RankTier::new(10, "low", "."), RankTier::new(90, "high", "!")]).unwrap();
        assert_eq!(ranks.tiers()[0].label, "high");
        // Below every threshold still gets the lowest tier
        assert_eq!(ranks.rank_for(0, 10).label, "low");
        assert!(RankThresholds::new(vec![]).is_err());
        assert!(RankThresholds::new(vec![RankTier::new(150, "x", "x")]).is_err());
    }
}
