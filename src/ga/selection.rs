//! Selection strategies for the GA.
//!
//! Selection determines which candidates are chosen as parents for
//! crossover. Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::types::Individual;
use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies assume **minimization** (lower fitness = better).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Uniform draw from the better half of a population **sorted by
    /// fitness**: indices `0..max(1, n / 2)`.
    ///
    /// # Complexity
    /// O(1) per selection
    #[default]
    BetterHalf,

    /// Tournament selection: pick `k` candidates at random, select the best.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// [`BetterHalf`](Selection::BetterHalf) requires `population` to be
    /// sorted ascending by fitness, which the runner guarantees.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<I: Individual, R: Rng>(&self, population: &[I], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::BetterHalf => better_half(population.len(), rng),
            Selection::Tournament(k) => tournament(population, *k, rng),
        }
    }
}

fn better_half<R: Rng>(n: usize, rng: &mut R) -> usize {
    let half = (n / 2).max(1);
    rng.random_range(0..half)
}

/// Tournament selection: pick k random candidates, return best.
fn tournament<I: Individual, R: Rng>(population: &[I], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].fitness() < population[best_idx].fitness() {
            best_idx = idx;
        }
    }
    best_idx
}
