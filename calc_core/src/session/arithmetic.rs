//! Generated mental-arithmetic pools.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use super::problem::{Locale, ProblemPool, Question};
use crate::errors::{CalcError, CalcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    const ALL: [Op; 3] = [Op::Add, Op::Sub, Op::Mul];

    fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '×',
        }
    }

    fn apply(self, a: u32, b: u32) -> u32 {
        match self {
            Op::Add => a + b,
            Op::Sub => a - b,
            Op::Mul => a * b,
        }
    }
}

/// Three wrong answers near `answer`, never negative.
fn distractors<R: Rng>(answer: u32, rng: &mut R) -> Vec<u32> {
    let mut candidates: Vec<u32> = [-10i64, -5, -3, -2, -1, 1, 2, 3, 5, 10]
        .iter()
        .map(|d| i64::from(answer) + d)
        .filter(|v| *v >= 0)
        .map(|v| v as u32)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    candidates.shuffle(rng);
    candidates.truncate(3);
    candidates
}

/// `count` questions over operands in `1..=max_operand`, four options each.
///
/// Subtractions are ordered so the answer is never negative.
pub fn generate_pool<R: Rng>(count: usize, max_operand: u32, rng: &mut R) -> CalcResult<ProblemPool> {
    if max_operand == 0 || max_operand > 1000 {
        return Err(CalcError::invalid_input(
            "max_operand",
            max_operand.to_string(),
            "Operands must be between 1 and 1000",
        ));
    }

    let mut questions = Vec::with_capacity(count);
    for i in 0..count {
        let op = Op::ALL[rng.gen_range(0..Op::ALL.len())];
        let x = rng.gen_range(1..=max_operand);
        let y = rng.gen_range(1..=max_operand);
        let (a, b) = if op == Op::Sub && y > x { (y, x) } else { (x, y) };
        let answer = op.apply(a, b);

        let mut values = distractors(answer, rng);
        values.push(answer);
        values.shuffle(rng);
        let correct = values.iter().position(|v| *v == answer).unwrap_or(0);

        questions.push(Question {
            id: format!("arith-{}", i),
            prompt: format!("{} {} {} = ?", a, op.symbol(), b),
            options: values.iter().map(u32::to_string).collect(),
            correct,
            explanation: Some(format!("{} {} {} = {}", a, op.symbol(), b, answer)),
        });
    }

    Ok(ProblemPool::new("arithmetic", Locale::Es, "Cálculo mental", questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn eval_prompt(prompt: &str) -> u32 {
        let parts: Vec<&str> = prompt.split_whitespace().collect();
        let a: u32 = parts[0].parse().unwrap();
        let b: u32 = parts[2].parse().unwrap();
        match parts[1] {
            "+" => a + b,
            "-" => a - b,
            "×" => a * b,
            other => panic!("unknown operator {}", other),
        }
    }

    #[test]
    fn test_generated_questions_are_consistent() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = generate_pool(50, 12, &mut rng).unwrap();
        assert_eq!(pool.len(), 50);
        for q in &pool.questions {
            assert_eq!(q.options.len(), 4);
            let expected = eval_prompt(&q.prompt);
            assert_eq!(q.correct_option().unwrap(), expected.to_string());
            let unique: BTreeSet<&String> = q.options.iter().collect();
            assert_eq!(unique.len(), 4, "duplicate options in {:?}", q);
        }
    }

    #[test]
    fn test_survives_sanitize() {
        let mut rng = StdRng::seed_from_u64(2);
        let pool = generate_pool(20, 1, &mut rng).unwrap();
        assert_eq!(pool.clone().sanitized().len(), 20);
    }

    #[test]
    fn test_rejects_zero_operand() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_pool(5, 0, &mut rng).is_err());
        assert!(generate_pool(0, 5, &mut rng).unwrap().is_empty());
    }
}
