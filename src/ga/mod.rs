//! Genetic Algorithm over spring design variables.
//!
//! A real-coded, single-objective GA: every candidate is a
//! [`DesignVariables`](crate::design::DesignVariables) point, evaluated by an
//! [`Evaluator`](crate::evaluator::Evaluator) into a [`CandidateSolution`]
//! whose scalar fitness is minimized.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, selection, presets)
//! - [`EvolutionController`]: Generation-by-generation state machine
//! - [`EvolutionOutcome`]: Final population, best-ever candidate and history
//!
//! # Submodules
//!
//! - [`operators`]: Uniform initialization, arithmetic crossover, bounded mutation
//! - [`multi_objective`]: Pareto non-dominated sorting and crowding distance
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
pub mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::GaConfig;
pub use runner::{EvolutionController, EvolutionOutcome, EvolutionState, Termination};
pub use selection::Selection;
pub use types::{sort_by_fitness, CandidateSolution, ConvergenceRecord, Individual};
