//! Core types shared by the GA operators, selection and runner.
//!
//! [`Individual`] is the contract selection relies on; [`CandidateSolution`]
//! is the spring-design individual the optimizer evolves.

use crate::constraints::ConstraintViolations;
use crate::design::DesignVariables;
use crate::properties::SpringProperties;

/// Anything carrying a scalar fitness. Lower fitness is better.
pub trait Individual: Clone {
    fn fitness(&self) -> f64;
}

/// One fully evaluated point in design space.
///
/// Built only by [`Evaluator::evaluate`](crate::evaluator::Evaluator::evaluate),
/// so properties, violations, feasibility and fitness always agree with
/// `variables`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateSolution {
    pub variables: DesignVariables,
    pub properties: SpringProperties,
    pub constraint_violations: ConstraintViolations,
    /// True iff every constraint violation is `<= 0`.
    pub is_feasible: bool,
    pub fitness: f64,
}

impl Individual for CandidateSolution {
    fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Sorts ascending by fitness (best first).
pub fn sort_by_fitness<I: Individual>(population: &mut [I]) {
    population.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
}

/// Statistics of one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceRecord {
    /// Zero-based generation index.
    pub generation: usize,
    /// Best fitness observed up to and including this generation.
    pub best_fitness: f64,
    /// Mean fitness of this generation's population.
    pub average_fitness: f64,
}
