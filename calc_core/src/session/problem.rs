//! Questions and the pools they come in.

use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use super::rank::RankThresholds;

/// Site locales a pool can be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    De,
    It,
    Pt,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Locale::Es => "es",
            Locale::De => "de",
            Locale::It => "it",
            Locale::Pt => "pt",
        };
        write!(f, "{}", code)
    }
}

/// A multiple-choice question. `correct` indexes into `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct).map(String::as_str)
    }

    /// Why the question cannot be asked, if anything
    fn defect(&self) -> Option<&'static str> {
        if self.id.trim().is_empty() {
            Some("empty id")
        } else if self.prompt.trim().is_empty() {
            Some("empty prompt")
        } else if self.options.len() < 2 {
            Some("fewer than two options")
        } else if self.correct >= self.options.len() {
            Some("correct index out of range")
        } else {
            None
        }
    }
}

/// An immutable set of questions plus optional per-pool overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPool {
    /// Pool key; filled from the file name when loaded from embedded data
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub locale: Locale,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    #[serde(default)]
    pub ranks: Option<RankThresholds>,
}

impl ProblemPool {
    pub fn new(name: impl Into<String>, locale: Locale, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            locale,
            title: title.into(),
            questions,
            time_limit_secs: None,
            ranks: None,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Drop questions that cannot be asked (bad options, duplicate ids).
    ///
    /// Never fails: a pool may shrink to nothing and the session will still
    /// end gracefully.
    pub fn sanitized(mut self) -> Self {
        let mut seen = HashSet::new();
        let name = self.name.clone();
        self.questions.retain(|q| {
            if let Some(defect) = q.defect() {
                warn!("pool '{}': dropping question '{}': {}", name, q.id, defect);
                return false;
            }
            if !seen.insert(q.id.clone()) {
                warn!("pool '{}': dropping duplicate question id '{}'", name, q.id);
                return false;
            }
            true
        });
        self
    }
}
