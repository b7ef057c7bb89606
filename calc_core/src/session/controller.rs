//! # Session Controller
//!
//! A timed multiple-choice quiz as a single-owner state machine:
//!
//! ```text
//! Introduction --start--> Active --answer--> Feedback --delay--> Active
//!                           |                   |
//!                           +--- time / pool ---+--> Finished
//! any --reset--> Introduction
//! ```
//!
//! The controller never reads a clock. Hosts call [`SessionController::tick`]
//! with the elapsed time and the epoch they were started under; a reset or a
//! new start bumps the epoch so ticks from an old timer are ignored.
//!
//! ```rust
//! use std::time::Duration;
//! use calc_core::session::{Phase, SessionConfig, SessionController};
//! use calc_core::session::arithmetic::generate_pool;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(3);
//! let pool = generate_pool(5, 10, &mut rng).unwrap();
//! let config = SessionConfig::default().with_question_count(5);
//! let mut session = SessionController::new(pool, config, rng);
//!
//! session.start();
//! let q = session.current_question().unwrap().clone();
//! let feedback = session.answer(q.correct).unwrap();
//! assert!(feedback.is_correct);
//! assert_eq!(session.phase(), Phase::Feedback);
//!
//! session.tick(session.epoch(), Duration::from_secs(2));
//! assert_eq!(session.phase(), Phase::Active);
//! ```

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::SessionConfig;
use super::problem::{ProblemPool, Question};
use super::shuffle::ShuffledDeck;

const ONE_SECOND: Duration = Duration::from_secs(1);

// ============================================================================
// Public Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Introduction,
    Active,
    Feedback,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    TimeExpired,
    PoolExhausted,
    QuestionLimit,
}

/// Grading of one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub question_id: String,
    pub chosen: usize,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalResult {
    pub score: usize,
    /// Questions the session set out to ask
    pub total: usize,
    pub answered: usize,
    pub rank_label: String,
    pub emoji: String,
    pub reason: FinishReason,
}

/// Everything a host can send the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    Answer(usize),
    Tick { epoch: u64, elapsed: Duration },
    Reset,
}

/// Read-only view for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    /// True while the countdown runs (Active or Feedback)
    pub is_active: bool,
    pub epoch: u64,
    pub time_left_secs: u64,
    pub score: usize,
    pub answered: usize,
    pub total: usize,
    pub current: Option<Question>,
    pub last_feedback: Option<AnswerFeedback>,
    pub explanation: Option<String>,
    pub result: Option<FinalResult>,
}

// ============================================================================
// Controller
// ============================================================================

pub struct SessionController<R: Rng> {
    pool: ProblemPool,
    config: SessionConfig,
    rng: R,

    phase: Phase,
    epoch: u64,
    time_left_secs: u64,
    /// Sub-second remainder not yet charged to the countdown
    tick_carry: Duration,
    feedback_remaining: Duration,

    deck: ShuffledDeck,
    current: Option<usize>,
    answered: HashSet<String>,
    score: usize,
    last_feedback: Option<AnswerFeedback>,
    result: Option<FinalResult>,
}

impl<R: Rng> SessionController<R> {
    /// A controller in `Introduction`. Pool overrides (time limit, ranks)
    /// take precedence over `config`.
    pub fn new(pool: ProblemPool, config: SessionConfig, rng: R) -> Self {
        let config = config.for_pool(&pool);
        Self {
            pool,
            time_left_secs: config.time_limit_secs,
            config,
            rng,
            phase: Phase::Introduction,
            epoch: 0,
            tick_carry: Duration::ZERO,
            feedback_remaining: Duration::ZERO,
            deck: ShuffledDeck::empty(),
            current: None,
            answered: HashSet::new(),
            score: 0,
            last_feedback: None,
            result: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Timer generation; ticks must carry the current value to count
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn pool(&self) -> &ProblemPool {
        &self.pool
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.and_then(|i| self.pool.questions.get(i))
    }

    pub fn result(&self) -> Option<&FinalResult> {
        self.result.as_ref()
    }

    /// Questions this session intends to ask
    pub fn planned_total(&self) -> usize {
        self.config.question_count.min(self.pool.len())
    }

    /// Begin a session. Only acts from `Introduction`.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Introduction {
            debug!("start ignored in {:?}", self.phase);
            return false;
        }
        if self.pool.len() < self.config.question_count {
            warn!(
                "pool '{}' has {} questions, fewer than the {} requested",
                self.pool.name,
                self.pool.len(),
                self.config.question_count
            );
        }

        self.epoch += 1;
        self.time_left_secs = self.config.time_limit_secs;
        self.tick_carry = Duration::ZERO;
        self.deck = ShuffledDeck::new(self.pool.len(), &mut self.rng);
        debug!("session '{}' started, epoch {}", self.pool.name, self.epoch);

        self.advance();
        true
    }

    /// Grade `choice` for the current question. Only acts in `Active`.
    pub fn answer(&mut self, choice: usize) -> Option<AnswerFeedback> {
        if self.phase != Phase::Active {
            debug!("answer ignored in {:?}", self.phase);
            return None;
        }
        let question = self.current_question()?;
        if choice >= question.options.len() {
            debug!("answer {} out of range for '{}'", choice, question.id);
            return None;
        }

        let feedback = AnswerFeedback {
            question_id: question.id.clone(),
            chosen: choice,
            correct_index: question.correct,
            is_correct: question.is_correct(choice),
            explanation: question.explanation.clone(),
        };

        if !self.answered.insert(feedback.question_id.clone()) {
            // Already graded; never count twice
            return None;
        }
        if feedback.is_correct {
            self.score += 1;
        }
        debug!(
            "answered '{}' ({}), score {}/{}",
            feedback.question_id,
            if feedback.is_correct { "correct" } else { "wrong" },
            self.score,
            self.answered.len()
        );

        self.last_feedback = Some(feedback.clone());
        self.feedback_remaining = self.config.feedback_delay();
        self.phase = Phase::Feedback;
        if self.feedback_remaining.is_zero() {
            self.advance();
        }
        Some(feedback)
    }

    /// Charge `elapsed` to the countdown and the feedback delay.
    ///
    /// Returns false when the tick was ignored (stale epoch, or no running
    /// session).
    pub fn tick(&mut self, epoch: u64, elapsed: Duration) -> bool {
        if epoch != self.epoch {
            debug!("stale tick from epoch {} (current {})", epoch, self.epoch);
            return false;
        }
        if !matches!(self.phase, Phase::Active | Phase::Feedback) {
            return false;
        }

        self.tick_carry += elapsed;
        while self.tick_carry >= ONE_SECOND && self.time_left_secs > 0 {
            self.tick_carry -= ONE_SECOND;
            self.time_left_secs -= 1;
        }
        if self.time_left_secs == 0 {
            self.finish(FinishReason::TimeExpired);
            return true;
        }

        if self.phase == Phase::Feedback {
            self.feedback_remaining = self.feedback_remaining.saturating_sub(elapsed);
            if self.feedback_remaining.is_zero() {
                self.advance();
            }
        }
        true
    }

    /// Back to `Introduction`, cancelling any running timer.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.phase = Phase::Introduction;
        self.time_left_secs = self.config.time_limit_secs;
        self.tick_carry = Duration::ZERO;
        self.feedback_remaining = Duration::ZERO;
        self.deck = ShuffledDeck::empty();
        self.current = None;
        self.answered.clear();
        self.score = 0;
        self.last_feedback = None;
        self.result = None;
        debug!("session '{}' reset, epoch {}", self.pool.name, self.epoch);
    }

    /// Single entry point for hosts that funnel every input through one queue.
    pub fn handle(&mut self, event: SessionEvent) -> SessionSnapshot {
        match event {
            SessionEvent::Start => {
                self.start();
            }
            SessionEvent::Answer(choice) => {
                self.answer(choice);
            }
            SessionEvent::Tick { epoch, elapsed } => {
                self.tick(epoch, elapsed);
            }
            SessionEvent::Reset => self.reset(),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let showing_feedback = self.phase == Phase::Feedback;
        SessionSnapshot {
            phase: self.phase,
            is_active: matches!(self.phase, Phase::Active | Phase::Feedback),
            epoch: self.epoch,
            time_left_secs: self.time_left_secs,
            score: self.score,
            answered: self.answered.len(),
            total: self.planned_total(),
            current: self.current_question().cloned(),
            last_feedback: self.last_feedback.clone(),
            explanation: if showing_feedback {
                self.last_feedback.as_ref().and_then(|f| f.explanation.clone())
            } else {
                None
            },
            result: self.result.clone(),
        }
    }

    /// Draw the next question, or finish when the session is done.
    fn advance(&mut self) {
        if self.answered.len() >= self.config.question_count {
            self.finish(FinishReason::QuestionLimit);
            return;
        }
        match self.deck.draw(&self.pool, &self.answered) {
            Some(idx) => {
                self.current = Some(idx);
                self.phase = Phase::Active;
                debug!("drew question '{}'", self.pool.questions[idx].id);
            }
            None => self.finish(FinishReason::PoolExhausted),
        }
    }

    fn finish(&mut self, reason: FinishReason) {
        let total = self.planned_total();
        let tier = self.config.ranks.rank_for(self.score, total);
        let result = FinalResult {
            score: self.score,
            total,
            answered: self.answered.len(),
            rank_label: tier.label.clone(),
            emoji: tier.emoji.clone(),
            reason,
        };
        debug!(
            "session '{}' finished ({:?}): {}/{} {}",
            self.pool.name, reason, result.score, result.total, result.rank_label
        );
        self.current = None;
        self.feedback_remaining = Duration::ZERO;
        self.phase = Phase::Finished;
        self.result = Some(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::problem::Locale;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(n: usize) -> ProblemPool {
        let questions = (0..n)
            .map(|i| Question {
                id: format!("q{}", i),
                prompt: format!("Question {}", i),
                options: vec!["right".into(), "wrong".into(), "also wrong".into()],
                correct: 0,
                explanation: Some(format!("Because {}", i)),
            })
            .collect();
        ProblemPool::new("test", Locale::Es, "Test", questions)
    }

    fn controller(n: usize, config: SessionConfig) -> SessionController<StdRng> {
        SessionController::new(pool(n), config, StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_start_only_from_introduction() {
        let mut s = controller(3, SessionConfig::default());
        assert!(s.start());
        assert_eq!(s.phase(), Phase::Active);
        let epoch = s.epoch();
        assert!(!s.start());
        assert_eq!(s.epoch(), epoch);
    }

    #[test]
    fn test_empty_pool_finishes_immediately() {
        let mut s = controller(0, SessionConfig::default());
        s.start();
        assert_eq!(s.phase(), Phase::Finished);
        let r = s.result().unwrap();
        assert_eq!((r.score, r.total, r.reason), (0, 0, FinishReason::PoolExhausted));
        assert_eq!(r.rank_label, "Sigue practicando");
    }

    #[test]
    fn test_answer_outside_active_is_noop() {
        let mut s = controller(3, SessionConfig::default());
        assert!(s.answer(0).is_none());
        s.start();
        assert!(s.answer(0).is_some());
        assert!(s.answer(0).is_none());
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn test_out_of_range_choice_ignored() {
        let mut s = controller(3, SessionConfig::default());
        s.start();
        assert!(s.answer(99).is_none());
        assert_eq!(s.phase(), Phase::Active);
    }

    #[test]
    fn test_feedback_delay_then_next() {
        let mut s = controller(3, SessionConfig::default().with_feedback_delay(1500));
        s.start();
        let first = s.current_question().unwrap().id.clone();
        s.answer(1);
        assert_eq!(s.snapshot().explanation.as_deref().map(|e| e.starts_with("Because")), Some(true));
        s.tick(s.epoch(), Duration::from_millis(1000));
        assert_eq!(s.phase(), Phase::Feedback);
        s.tick(s.epoch(), Duration::from_millis(500));
        assert_eq!(s.phase(), Phase::Active);
        assert_ne!(s.current_question().unwrap().id, first);
        assert!(s.snapshot().explanation.is_none());
    }

    #[test]
    fn test_sub_second_ticks_carry() {
        let mut s = controller(3, SessionConfig::default().with_time_limit(5));
        s.start();
        for _ in 0..4 {
            s.tick(s.epoch(), Duration::from_millis(250));
        }
        assert_eq!(s.time_left_secs(), 4);
        s.tick(s.epoch(), Duration::from_millis(900));
        assert_eq!(s.time_left_secs(), 4);
        s.tick(s.epoch(), Duration::from_millis(100));
        assert_eq!(s.time_left_secs(), 3);
    }

    #[test]
    fn test_time_expiry() {
        let mut s = controller(3, SessionConfig::default().with_time_limit(2));
        s.start();
        s.answer(0);
        s.tick(s.epoch(), Duration::from_secs(2));
        assert_eq!(s.phase(), Phase::Finished);
        let r = s.result().unwrap();
        assert_eq!(r.reason, FinishReason::TimeExpired);
        assert_eq!(r.score, 1);
    }

    #[test]
    fn test_question_limit() {
        let mut s = controller(5, SessionConfig::default().with_question_count(2).with_feedback_delay(0));
        s.start();
        s.answer(0);
        s.answer(0);
        assert_eq!(s.phase(), Phase::Finished);
        let r = s.result().unwrap();
        assert_eq!((r.score, r.total, r.reason), (2, 2, FinishReason::QuestionLimit));
        assert_eq!(r.emoji, "🏆");
    }

    #[test]
    fn test_reset_clears_and_bumps_epoch() {
        let mut s = controller(3, SessionConfig::default());
        s.start();
        s.answer(0);
        let old = s.epoch();
        s.reset();
        assert_eq!(s.phase(), Phase::Introduction);
        assert_eq!(s.score(), 0);
        assert!(s.current_question().is_none());
        assert!(!s.tick(old, Duration::from_secs(10)));
        assert_eq!(s.phase(), Phase::Introduction);
    }

    #[test]
    fn test_handle_returns_snapshot() {
        let mut s = controller(2, SessionConfig::default().with_feedback_delay(0));
        let snap = s.handle(SessionEvent::Start);
        assert!(snap.is_active);
        assert_eq!(snap.total, 2);
        let snap = s.handle(SessionEvent::Answer(0));
        assert_eq!(snap.score, 1);
        let snap = s.handle(SessionEvent::Tick {
            epoch: snap.epoch,
            elapsed: Duration::from_millis(10),
        });
        assert_eq!(snap.phase, Phase::Active);
        let snap = s.handle(SessionEvent::Reset);
        assert_eq!(snap.phase, Phase::Introduction);
    }
}
