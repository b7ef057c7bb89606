//! Shareable summary of a finished session.
//!
//! The controller only builds the payload. Posting it anywhere is the host's
//! job, through whatever [`ShareTarget`] it implements.

use serde::{Deserialize, Serialize};

use super::controller::FinalResult;
use super::problem::{Locale, ProblemPool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    pub pool_name: String,
    pub locale: Locale,
    pub title: String,
    pub score: usize,
    pub total: usize,
    pub rank_label: String,
    pub emoji: String,
    /// One-line message ready to post
    pub text: String,
}

impl SharePayload {
    pub fn from_result(pool: &ProblemPool, result: &FinalResult) -> Self {
        Self {
            pool_name: pool.name.clone(),
            locale: pool.locale,
            title: pool.title.clone(),
            score: result.score,
            total: result.total,
            rank_label: result.rank_label.clone(),
            emoji: result.emoji.clone(),
            text: format!(
                "{} {}: {}/{} · {}",
                result.emoji, pool.title, result.score, result.total, result.rank_label
            ),
        }
    }
}

/// Somewhere a result can be shared (clipboard, stdout, a web share sheet).
pub trait ShareTarget {
    type Error;

    fn share(&mut self, payload: &SharePayload) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::controller::FinishReason;

    struct Collect(Vec<String>);

    impl ShareTarget for Collect {
        type Error = std::convert::Infallible;

        fn share(&mut self, payload: &SharePayload) -> Result<(), Self::Error> {
            self.0.push(payload.text.clone());
            Ok(())
        }
    }

    #[test]
    fn test_payload_text() {
        let pool = ProblemPool::new("capitales_es", Locale::Es, "Capitales", vec![]);
        let result = FinalResult {
            score: 8,
            total: 10,
            answered: 10,
            rank_label: "¡Genio!".into(),
            emoji: "🏆".into(),
            reason: FinishReason::QuestionLimit,
        };
        let payload = SharePayload::from_result(&pool, &result);
        assert_eq!(payload.text, "🏆 Capitales: 8/10 · ¡Genio!");

        let mut target = Collect(Vec::new());
        target.share(&payload).unwrap();
        assert_eq!(target.0.len(), 1);
    }
}
