//! Balanced, de-duplicated arithmetic problem batches.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use crate::model::{Operator, Problem};

/// Attempts made per slot before the slot is abandoned.
pub const MAX_ATTEMPTS_PER_PROBLEM: u32 = 50;

/// Largest single-digit operand.
const OPERAND_MAX: i64 = 9;

/// Result of trying to fill one slot of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Filled(Problem),
    /// Every attempt produced an expression already in the batch.
    Abandoned { operator: Operator },
}

/// What a batch generation achieved, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub requested: usize,
    pub produced: usize,
    /// Slots planned per operator, indexed by [`Operator::index`].
    pub planned: [usize; 3],
    /// Slots abandoned per operator, indexed by [`Operator::index`].
    pub abandoned: [usize; 3],
}

impl GenerationReport {
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.produced)
    }
}

/// A generated batch along with its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemBatch {
    pub problems: Vec<Problem>,
    pub report: GenerationReport,
}

/// Produces batches of unique single-digit `+`, `-` and `*` problems.
#[derive(Debug, Clone, Copy)]
pub struct ProblemGenerator {
    max_attempts: u32,
}

impl Default for ProblemGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProblemGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS_PER_PROBLEM,
        }
    }

    /// Override the per-slot attempt cap (at least one attempt is always made).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Generate up to `count` problems using the thread-local RNG.
    #[must_use]
    pub fn generate(&self, count: usize) -> Vec<Problem> {
        self.generate_with_rng(count, &mut rand::rng())
    }

    /// Generate up to `count` problems from the given random source.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Problem> {
        self.generate_batch(count, rng).problems
    }

    /// Generate a batch and report how many slots could not be filled.
    ///
    /// The batch is shuffled before it is returned. A shortfall is logged and
    /// otherwise ignored; callers decide whether a short batch is usable.
    pub fn generate_batch<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> ProblemBatch {
        let planned = partition(count);
        let mut report = GenerationReport {
            requested: count,
            planned,
            ..GenerationReport::default()
        };
        let mut seen: HashSet<String> = HashSet::with_capacity(count);
        let mut problems = Vec::with_capacity(count);

        for operator in Operator::ALL {
            for _ in 0..planned[operator.index()] {
                match self.fill_slot(operator, &seen, rng) {
                    SlotOutcome::Filled(problem) => {
                        seen.insert(problem.expression().to_owned());
                        problems.push(problem);
                    }
                    SlotOutcome::Abandoned { operator } => {
                        report.abandoned[operator.index()] += 1;
                    }
                }
            }
        }

        problems.shuffle(rng);
        report.produced = problems.len();

        if report.shortfall() > 0 {
            tracing::warn!(
                requested = report.requested,
                produced = report.produced,
                abandoned = ?report.abandoned,
                "could not generate enough unique problems"
            );
        }

        ProblemBatch { problems, report }
    }

    /// Try up to `max_attempts` candidates for one slot.
    fn fill_slot<R: Rng + ?Sized>(
        &self,
        operator: Operator,
        seen: &HashSet<String>,
        rng: &mut R,
    ) -> SlotOutcome {
        for _ in 0..self.max_attempts {
            let candidate = candidate(operator, rng);
            if !seen.contains(candidate.expression()) {
                return SlotOutcome::Filled(candidate);
            }
        }
        SlotOutcome::Abandoned { operator }
    }
}

/// Split `count` across operators as evenly as possible, remainder going
/// to the earlier operators first.
#[must_use]
pub fn partition(count: usize) -> [usize; 3] {
    let base = count / Operator::ALL.len();
    let remainder = count % Operator::ALL.len();
    let mut planned = [base; 3];
    for slot in planned.iter_mut().take(remainder) {
        *slot += 1;
    }
    planned
}

fn candidate<R: Rng + ?Sized>(operator: Operator, rng: &mut R) -> Problem {
    let a = rng.random_range(0..=OPERAND_MAX);
    let b = rng.random_range(0..=OPERAND_MAX);
    match operator {
        Operator::Add => Problem::addition(a, b),
        // `a` is the target result here, so the answer is never negative.
        Operator::Subtract => Problem::subtraction(a, b),
        Operator::Multiply => Problem::multiplication(a, b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn evaluate(expression: &str) -> i64 {
        let parts: Vec<&str> = expression.split(' ').collect();
        assert_eq!(parts.len(), 3, "unexpected expression {expression}");
        let a: i64 = parts[0].parse().unwrap();
        let b: i64 = parts[2].parse().unwrap();
        match parts[1] {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            other => panic!("unknown operator {other}"),
        }
    }

    #[test]
    fn partition_spreads_remainder_left_to_right() {
        assert_eq!(partition(0), [0, 0, 0]);
        assert_eq!(partition(1), [1, 0, 0]);
        assert_eq!(partition(2), [1, 1, 0]);
        assert_eq!(partition(10), [4, 3, 3]);
        assert_eq!(partition(12), [4, 4, 4]);
    }

    #[test]
    fn zero_count_yields_empty_batch() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(ProblemGenerator::new().generate_with_rng(0, &mut rng).is_empty());
    }

    #[test]
    fn batches_are_unique_and_correct() {
        let generator = ProblemGenerator::new();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            for count in [1, 3, 10, 31, 100] {
                let problems = generator.generate_with_rng(count, &mut rng);
                assert!(problems.len() <= count);

                let distinct: HashSet<&str> = problems.iter().map(Problem::expression).collect();
                assert_eq!(distinct.len(), problems.len());

                for p in &problems {
                    assert_eq!(evaluate(p.expression()), p.answer(), "{p}");
                    if p.operator() == Operator::Subtract {
                        assert!(p.answer() >= 0);
                    }
                }
            }
        }
    }

    #[test]
    fn small_batches_are_balanced() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = ProblemGenerator::new().generate_batch(9, &mut rng);
        assert_eq!(batch.report.shortfall(), 0);
        for operator in Operator::ALL {
            let n = batch
                .problems
                .iter()
                .filter(|p| p.operator() == operator)
                .count();
            assert_eq!(n, 3);
        }
    }

    #[test]
    fn batches_are_shuffled_across_operators() {
        let generator = ProblemGenerator::new();
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let operators: Vec<Operator> = generator
                .generate_with_rng(30, &mut rng)
                .iter()
                .map(Problem::operator)
                .collect();
            assert_eq!(operators.len(), 30);

            // Unshuffled output is every `+`, then every `-`, then every `*`.
            let grouped = operators.windows(2).all(|pair| pair[0] <= pair[1]);
            assert!(!grouped, "seed {seed} left operators grouped: {operators:?}");
        }
    }

    #[test]
    fn oversized_requests_fall_short_instead_of_looping() {
        // Only 100 distinct expressions exist per operator.
        let mut rng = StdRng::seed_from_u64(42);
        let batch = ProblemGenerator::new().generate_batch(450, &mut rng);
        assert!(batch.problems.len() <= 300);
        assert!(batch.report.shortfall() >= 150);
        assert_eq!(
            batch.report.abandoned.iter().sum::<usize>(),
            batch.report.shortfall()
        );
    }

    #[test]
    fn single_attempt_cap_still_terminates() {
        let mut rng = StdRng::seed_from_u64(3);
        let batch = ProblemGenerator::new()
            .with_max_attempts(0)
            .generate_batch(60, &mut rng);
        assert!(batch.problems.len() <= 60);
        assert_eq!(batch.report.produced + batch.report.shortfall(), 60);
    }
}
