//! Uniform draw-without-replacement over a pool's questions.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::problem::ProblemPool;

/// A shuffled order of question indices, consumed front to back.
#[derive(Debug, Clone)]
pub struct ShuffledDeck {
    order: Vec<usize>,
    next: usize,
}

impl ShuffledDeck {
    /// Fisher-Yates shuffle of `0..len`.
    pub fn new<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self { order, next: 0 }
    }

    pub fn empty() -> Self {
        Self {
            order: Vec::new(),
            next: 0,
        }
    }

    /// Next question index whose id has not been answered yet.
    pub fn draw(&mut self, pool: &ProblemPool, answered: &HashSet<String>) -> Option<usize> {
        while let Some(&idx) = self.order.get(self.next) {
            self.next += 1;
            match pool.questions.get(idx) {
                Some(q) if !answered.contains(&q.id) => return Some(idx),
                _ => continue,
            }
        }
        None
    }

    /// Undrawn indices left, answered or not
    pub fn remaining(&self) -> usize {
        self.order.len() - self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::problem::{Locale, Question};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(n: usize) -> ProblemPool {
        let questions = (0..n)
            .map(|i| Question {
                id: format!("q{}", i),
                prompt: format!("Question {}", i),
                options: vec!["a".into(), "b".into()],
                correct: 0,
                explanation: None,
            })
            .collect();
        ProblemPool::new("deck", Locale::Es, "Deck", questions)
    }

    #[test]
    fn test_draws_each_once() {
        let pool = pool(20);
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = ShuffledDeck::new(pool.len(), &mut rng);
        let answered = HashSet::new();
        let mut seen = HashSet::new();
        while let Some(idx) = deck.draw(&pool, &answered) {
            assert!(seen.insert(idx));
        }
        assert_eq!(seen.len(), 20);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn test_skips_answered() {
        let pool = pool(5);
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = ShuffledDeck::new(pool.len(), &mut rng);
        let answered: HashSet<String> = ["q0", "q1", "q2"].iter().map(|s| s.to_string()).collect();
        let mut drawn = Vec::new();
        while let Some(idx) = deck.draw(&pool, &answered) {
            drawn.push(pool.questions[idx].id.clone());
        }
        drawn.sort();
        assert_eq!(drawn, vec!["q3", "q4"]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let pool = pool(10);
        let answered = HashSet::new();
        let order = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut deck = ShuffledDeck::new(pool.len(), &mut rng);
            std::iter::from_fn(|| deck.draw(&pool, &answered)).collect::<Vec<_>>()
        };
        assert_eq!(order(42), order(42));
    }

    #[test]
    fn test_empty() {
        let pool = pool(0);
        assert_eq!(ShuffledDeck::empty().draw(&pool, &HashSet::new()), None);
    }
}
