//! # Interactive Sessions
//!
//! One generic timed quiz engine shared by every game page: a pool of
//! multiple-choice questions, a countdown, a feedback pause after each
//! answer, and a rank at the end.
//!
//! - [`problem`] - questions, pools, locales
//! - [`pools`] - pools embedded from `data/pools/`
//! - [`arithmetic`] - generated mental-math pools
//! - [`shuffle`] - draw order
//! - [`rank`] - end-of-session tiers
//! - [`config`] - time limit, feedback delay, question count
//! - [`controller`] - the state machine
//! - [`share`] - result payload for hosts that share scores

pub mod arithmetic;
pub mod config;
pub mod controller;
pub mod pools;
pub mod problem;
pub mod rank;
pub mod share;
pub mod shuffle;

pub use config::SessionConfig;
pub use controller::{
    AnswerFeedback, FinalResult, FinishReason, Phase, SessionController, SessionEvent, SessionSnapshot,
};
pub use pools::{available_pools, load_pool};
pub use problem::{Locale, ProblemPool, Question};
pub use rank::{RankThresholds, RankTier};
pub use share::{SharePayload, ShareTarget};
pub use shuffle::ShuffledDeck;
