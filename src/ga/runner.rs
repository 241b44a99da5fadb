//! GA evolutionary loop execution.
//!
//! [`EvolutionController`] drives the generation state machine:
//!
//! ```text
//! Initialized → Evolving ─┬─→ Converged
//!                         └─→ MaxGenerationsReached
//! ```
//!
//! Each [`step`](EvolutionController::step) processes one generation: sort,
//! track the best-ever candidate, record history, update the stagnation
//! counter, then either terminate or breed the next generation.

use super::config::GaConfig;
use super::operators::{crossover, mutate, random_variables};
use super::types::{sort_by_fitness, CandidateSolution, ConvergenceRecord};
use crate::design::DesignVariableBounds;
use crate::error::OptimizeError;
use crate::evaluator::Evaluator;
use rand::Rng;
use std::fmt;

/// Phase of the evolution state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionState {
    /// Initial population evaluated, no generation processed yet.
    Initialized,
    Evolving,
    Converged,
    MaxGenerationsReached,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Best fitness stagnated for longer than the stagnation limit.
    Converged,
    /// The configured generation budget was exhausted.
    MaxGenerationsReached,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Converged => f.write_str("converged"),
            Termination::MaxGenerationsReached => f.write_str("generation limit reached"),
        }
    }
}

/// Final state handed to result synthesis.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// Final population, sorted ascending by fitness.
    pub population: Vec<CandidateSolution>,
    /// Best candidate ever observed (a copy, not a population member).
    pub best: CandidateSolution,
    pub history: Vec<ConvergenceRecord>,
    /// Number of generations processed.
    pub generations: usize,
    pub termination: Termination,
}

/// Owns the population, history and best-ever record of one run.
pub struct EvolutionController<'a, R: Rng> {
    evaluator: &'a Evaluator,
    bounds: &'a DesignVariableBounds,
    config: &'a GaConfig,
    rng: &'a mut R,
    population: Vec<CandidateSolution>,
    best: CandidateSolution,
    history: Vec<ConvergenceRecord>,
    generation: usize,
    stagnation: usize,
    previous_top: Option<f64>,
    state: EvolutionState,
}

impl<'a, R: Rng> EvolutionController<'a, R> {
    /// Validates `config` and `bounds`, then draws and evaluates the initial
    /// population.
    pub fn new(
        evaluator: &'a Evaluator,
        bounds: &'a DesignVariableBounds,
        config: &'a GaConfig,
        rng: &'a mut R,
    ) -> Result<Self, OptimizeError> {
        config.validate()?;
        bounds.validate()?;

        let population: Vec<CandidateSolution> = (0..config.population_size)
            .map(|_| evaluator.evaluate(random_variables(bounds, &mut *rng)))
            .collect();

        let best = population
            .iter()
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .cloned()
            .ok_or_else(|| OptimizeError::InvalidConfig("population is empty".into()))?;

        Ok(Self {
            evaluator,
            bounds,
            config,
            rng,
            population,
            best,
            history: Vec::with_capacity(config.max_generations),
            generation: 0,
            stagnation: 0,
            previous_top: None,
            state: EvolutionState::Initialized,
        })
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    pub fn population(&self) -> &[CandidateSolution] {
        &self.population
    }

    pub fn best(&self) -> &CandidateSolution {
        &self.best
    }

    pub fn history(&self) -> &[ConvergenceRecord] {
        &self.history
    }

    /// Generations processed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn stagnation_counter(&self) -> usize {
        self.stagnation
    }

    fn termination(&self) -> Option<Termination> {
        match self.state {
            EvolutionState::Converged => Some(Termination::Converged),
            EvolutionState::MaxGenerationsReached => Some(Termination::MaxGenerationsReached),
            _ => None,
        }
    }

    /// Processes one generation. Returns the termination reason once the run
    /// has stopped; further calls are no-ops returning the same reason.
    pub fn step(&mut self) -> Option<Termination> {
        if let Some(done) = self.termination() {
            return Some(done);
        }
        self.state = EvolutionState::Evolving;

        sort_by_fitness(&mut self.population);
        let top = self.population[0].fitness;
        if top < self.best.fitness {
            self.best = self.population[0].clone();
        }

        let average =
            self.population.iter().map(|c| c.fitness).sum::<f64>() / self.population.len() as f64;
        self.history.push(ConvergenceRecord {
            generation: self.generation,
            best_fitness: self.best.fitness,
            average_fitness: average,
        });

        if let Some(previous) = self.previous_top {
            if (top - previous).abs() < self.config.convergence_tolerance {
                self.stagnation += 1;
            } else {
                self.stagnation = 0;
            }
        }
        self.previous_top = Some(top);
        self.generation += 1;

        tracing::debug!(
            generation = self.generation - 1,
            best_fitness = self.best.fitness,
            average_fitness = average,
            stagnation = self.stagnation,
            "generation complete"
        );

        if self.stagnation > self.config.stagnation_limit {
            self.state = EvolutionState::Converged;
            return Some(Termination::Converged);
        }
        if self.generation >= self.config.max_generations {
            self.state = EvolutionState::MaxGenerationsReached;
            return Some(Termination::MaxGenerationsReached);
        }

        self.breed();
        None
    }

    /// Replaces the (sorted) population with the next generation: elites
    /// first, then evaluated offspring of selected parents.
    fn breed(&mut self) {
        let n = self.config.population_size;
        let elite_count = self.config.elite_count();

        let mut next = Vec::with_capacity(n);
        next.extend_from_slice(&self.population[..elite_count]);

        while next.len() < n {
            let i = self.config.selection.select(&self.population, &mut *self.rng);
            let j = self.config.selection.select(&self.population, &mut *self.rng);

            let child = crossover(
                &self.population[i].variables,
                &self.population[j].variables,
                self.bounds,
                &mut *self.rng,
            );
            let child = mutate(
                &child,
                self.bounds,
                self.config.mutation_rate,
                self.config.mutation_scale,
                &mut *self.rng,
            );
            next.push(self.evaluator.evaluate(child));
        }

        self.population = next;
    }

    /// Steps until termination and returns the final state.
    pub fn run(mut self) -> EvolutionOutcome {
        let termination = loop {
            if let Some(t) = self.step() {
                break t;
            }
        };

        tracing::info!(
            generations = self.generation,
            best_fitness = self.best.fitness,
            feasible = self.best.is_feasible,
            termination = ?termination,
            "evolution finished"
        );

        EvolutionOutcome {
            population: self.population,
            best: self.best,
            history: self.history,
            generations: self.generation,
            termination,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::OptimizationConstraints;
    use crate::ga::Selection;
    use crate::material::Material;
    use crate::objective::ObjectiveMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn evaluator(objective: ObjectiveMode) -> Evaluator {
        Evaluator::new(
            Material::music_wire(),
            10.0,
            OptimizationConstraints::default(),
            objective,
        )
    }

    #[test]
    fn test_initial_state() {
        let ev = evaluator(ObjectiveMode::MinimizeMass);
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default().with_population_size(12);
        let mut rng = StdRng::seed_from_u64(42);

        let controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        assert_eq!(controller.state(), EvolutionState::Initialized);
        assert_eq!(controller.population().len(), 12);
        assert!(controller.history().is_empty());
        let min = controller
            .population()
            .iter()
            .map(|c| c.fitness)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(controller.best().fitness, min);
    }

    #[test]
    fn test_invalid_bounds_rejected_before_initialization() {
        let ev = evaluator(ObjectiveMode::MinimizeMass);
        let bounds = DesignVariableBounds::new((3.0, 1.0), (10.0, 30.0), (2.0, 6.0), (5.0, 15.0));
        let config = GaConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        let result = EvolutionController::new(&ev, &bounds, &config, &mut rng);
        assert!(matches!(result, Err(OptimizeError::InvalidBounds { .. })));
    }

    #[test]
    fn test_population_size_is_invariant() {
        let ev = evaluator(ObjectiveMode::MinimizeMaxStress);
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(23)
            .with_max_generations(30);
        let mut rng = StdRng::seed_from_u64(1);

        let mut controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        while controller.step().is_none() {
            assert_eq!(controller.population().len(), 23);
            assert_eq!(controller.state(), EvolutionState::Evolving);
        }
        assert_eq!(controller.population().len(), 23);
    }

    #[test]
    fn test_best_fitness_never_regresses() {
        let ev = evaluator(ObjectiveMode::MaximizeSafetyFactor);
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(20)
            .with_max_generations(60)
            .with_seed(9);
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = EvolutionController::new(&ev, &bounds, &config, &mut rng)
            .unwrap()
            .run();

        for window in outcome.history.windows(2) {
            assert!(
                window[1].best_fitness <= window[0].best_fitness,
                "best fitness regressed: {} > {}",
                window[1].best_fitness,
                window[0].best_fitness
            );
        }
        assert_eq!(outcome.history.len(), outcome.generations);
        assert_eq!(
            outcome.history.last().unwrap().best_fitness,
            outcome.best.fitness
        );
    }

    #[test]
    fn test_single_candidate_single_generation() {
        let ev = evaluator(ObjectiveMode::MinimizeMass);
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(1)
            .with_max_generations(1);
        let mut rng = StdRng::seed_from_u64(5);

        let controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        let only = controller.population()[0].clone();
        let outcome = controller.run();

        assert_eq!(outcome.generations, 1);
        assert_eq!(outcome.termination, Termination::MaxGenerationsReached);
        assert_eq!(outcome.best, only);
        assert_eq!(outcome.population, vec![only]);
        assert_eq!(outcome.history.len(), 1);
    }

    #[test]
    fn test_converges_when_fitness_is_flat() {
        // Zero deflection: every candidate has zero stress, so the objective
        // is constant and the run must stagnate.
        let ev = Evaluator::new(
            Material::music_wire(),
            0.0,
            OptimizationConstraints::default(),
            ObjectiveMode::MinimizeMaxStress,
        );
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(10)
            .with_max_generations(500)
            .with_stagnation_limit(20);
        let mut rng = StdRng::seed_from_u64(3);

        let mut controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        assert_eq!(controller.step(), None);
        assert_eq!(controller.stagnation_counter(), 0);
        assert_eq!(controller.step(), None);
        assert_eq!(controller.stagnation_counter(), 1);
        let outcome = controller.run();

        assert_eq!(outcome.termination, Termination::Converged);
        // first generation has no predecessor, then 21 stagnating generations
        assert_eq!(outcome.generations, 22);
    }

    #[test]
    fn test_step_after_termination_is_noop() {
        let ev = evaluator(ObjectiveMode::MinimizeMass);
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(4)
            .with_max_generations(2);
        let mut rng = StdRng::seed_from_u64(8);

        let mut controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        assert_eq!(controller.step(), None);
        assert_eq!(controller.step(), Some(Termination::MaxGenerationsReached));
        assert_eq!(controller.step(), Some(Termination::MaxGenerationsReached));
        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    fn test_candidates_stay_in_bounds() {
        let ev = evaluator(ObjectiveMode::MinimizeBucklingRisk);
        let bounds = DesignVariableBounds::new((0.5, 1.5), (8.0, 12.0), (1.0, 9.0), (3.0, 25.0));
        let config = GaConfig::default()
            .with_population_size(30)
            .with_max_generations(40)
            .with_mutation_rate(0.8)
            .with_mutation_scale(0.5)
            .with_selection(Selection::Tournament(3));
        let mut rng = StdRng::seed_from_u64(21);

        let mut controller = EvolutionController::new(&ev, &bounds, &config, &mut rng).unwrap();
        loop {
            for c in controller.population() {
                assert!(bounds.contains(&c.variables), "out of bounds: {:?}", c.variables);
            }
            if controller.step().is_some() {
                break;
            }
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let ev = evaluator(ObjectiveMode::WeightedMultiObjective(Default::default()));
        let bounds = DesignVariableBounds::default();
        let config = GaConfig::default()
            .with_population_size(16)
            .with_max_generations(25);

        let mut rng_a = StdRng::seed_from_u64(77);
        let a = EvolutionController::new(&ev, &bounds, &config, &mut rng_a)
            .unwrap()
            .run();
        let mut rng_b = StdRng::seed_from_u64(77);
        let b = EvolutionController::new(&ev, &bounds, &config, &mut rng_b)
            .unwrap()
            .run();

        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }
}
