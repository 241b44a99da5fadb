//! Optimizer entry points.
//!
//! An [`OptimizationRun`] describes one search. [`optimize_with_rng`]
//! validates it, resolves the material once, drives the
//! [`EvolutionController`] to termination and synthesizes the result.
//! [`optimize`] does the same with a generator seeded from
//! [`GaConfig::seed`].

use crate::constraints::OptimizationConstraints;
use crate::design::DesignVariableBounds;
use crate::error::OptimizeError;
use crate::evaluator::Evaluator;
use crate::ga::{EvolutionController, GaConfig};
use crate::material::{self, MaterialPolicy, MaterialStore};
use crate::objective::ObjectiveMode;
use crate::synthesis::{OptimizationResult, ResultSynthesizer};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::Instant;
use tracing::instrument;

/// Search strategies a run can request.
///
/// Only [`GeneticAlgorithm`](SearchMethod::GeneticAlgorithm) has an
/// implementation; the others fail with
/// [`OptimizeError::NotImplemented`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMethod {
    #[default]
    GeneticAlgorithm,
    SimulatedAnnealing,
    GradientDescent,
    ParticleSwarm,
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchMethod::GeneticAlgorithm => "genetic algorithm",
            SearchMethod::SimulatedAnnealing => "simulated annealing",
            SearchMethod::GradientDescent => "gradient descent",
            SearchMethod::ParticleSwarm => "particle swarm",
        };
        f.write_str(name)
    }
}

/// Complete description of one optimization run. Never mutated by the
/// optimizer.
///
/// ```
/// use u_springopt::ga::GaConfig;
/// use u_springopt::objective::ObjectiveMode;
/// use u_springopt::optimizer::OptimizationRun;
///
/// let run = OptimizationRun::new(ObjectiveMode::MinimizeMass)
///     .with_material("chrome_silicon")
///     .with_working_deflection(12.0)
///     .with_ga_config(GaConfig::fast().with_seed(1));
/// assert!(run.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationRun {
    pub objective: ObjectiveMode,
    pub method: SearchMethod,
    pub bounds: DesignVariableBounds,
    pub constraints: OptimizationConstraints,
    /// Key looked up in the [`MaterialStore`].
    pub material_id: String,
    pub material_policy: MaterialPolicy,
    /// Deflection at which load and stress are evaluated (mm).
    pub working_deflection: f64,
    pub ga: GaConfig,
    /// Maximum size of the feasible sample and of the Pareto front.
    pub front_size: usize,
}

impl Default for OptimizationRun {
    fn default() -> Self {
        Self {
            objective: ObjectiveMode::default(),
            method: SearchMethod::default(),
            bounds: DesignVariableBounds::default(),
            constraints: OptimizationConstraints::default(),
            material_id: "music_wire".to_string(),
            material_policy: MaterialPolicy::default(),
            working_deflection: 10.0,
            ga: GaConfig::default(),
            front_size: 10,
        }
    }
}

impl OptimizationRun {
    /// A run with default settings for `objective`.
    pub fn new(objective: ObjectiveMode) -> Self {
        Self {
            objective,
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: SearchMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_bounds(mut self, bounds: DesignVariableBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_constraints(mut self, constraints: OptimizationConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_material(mut self, id: impl Into<String>) -> Self {
        self.material_id = id.into();
        self
    }

    pub fn with_material_policy(mut self, policy: MaterialPolicy) -> Self {
        self.material_policy = policy;
        self
    }

    pub fn with_working_deflection(mut self, deflection: f64) -> Self {
        self.working_deflection = deflection;
        self
    }

    pub fn with_ga_config(mut self, ga: GaConfig) -> Self {
        self.ga = ga;
        self
    }

    pub fn with_front_size(mut self, n: usize) -> Self {
        self.front_size = n;
        self
    }

    /// Checks every parameter of the run. Does not touch the material store.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        self.bounds.validate()?;
        self.constraints.validate()?;
        self.ga.validate()?;
        if let ObjectiveMode::WeightedMultiObjective(weights) = &self.objective {
            weights.validate()?;
        }
        if !(self.working_deflection.is_finite() && self.working_deflection >= 0.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "working_deflection must be non-negative and finite, got {}",
                self.working_deflection
            )));
        }
        if self.front_size == 0 {
            return Err(OptimizeError::InvalidConfig(
                "front_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Runs `run` with a generator seeded from `run.ga.seed`, or from a random
/// seed when none is set.
pub fn optimize<S: MaterialStore + ?Sized>(
    run: &OptimizationRun,
    store: &S,
) -> Result<OptimizationResult, OptimizeError> {
    let mut rng = match run.ga.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    };
    optimize_with_rng(run, store, &mut rng)
}

/// Runs `run` drawing all randomness from `rng`.
///
/// # Errors
///
/// Fails before any evaluation if the run is invalid, the method is not
/// implemented, or the material is missing under
/// [`MaterialPolicy::Strict`].
#[instrument(
    level = "debug",
    skip_all,
    fields(objective = %run.objective, method = %run.method, material = %run.material_id)
)]
pub fn optimize_with_rng<S: MaterialStore + ?Sized, R: Rng>(
    run: &OptimizationRun,
    store: &S,
    rng: &mut R,
) -> Result<OptimizationResult, OptimizeError> {
    run.validate()?;
    match run.method {
        SearchMethod::GeneticAlgorithm => {}
        other => return Err(OptimizeError::NotImplemented(other)),
    }

    let (material, source) = material::resolve(store, &run.material_id, run.material_policy)?;
    let evaluator = Evaluator::new(
        material,
        run.working_deflection,
        run.constraints.clone(),
        run.objective,
    );

    tracing::info!(
        population_size = run.ga.population_size,
        max_generations = run.ga.max_generations,
        material = %evaluator.material().name,
        "optimization started"
    );

    let start = Instant::now();
    let outcome = EvolutionController::new(&evaluator, &run.bounds, &run.ga, rng)?.run();
    let elapsed = start.elapsed();

    let result = ResultSynthesizer::new(&evaluator, &run.bounds, run.front_size).synthesize(
        outcome,
        &run.material_id,
        source,
        elapsed,
    );

    tracing::info!(
        generations = result.generations,
        feasible = result.best.is_feasible,
        improvement_percent = result.improvement_percent,
        elapsed_ms = elapsed.as_millis() as u64,
        "optimization finished"
    );

    Ok(result)
}

/// Runs independent optimizations in parallel, one generator per run.
///
/// Results are returned in the order of `runs`.
#[cfg(feature = "parallel")]
pub fn optimize_many<S: MaterialStore + Sync + ?Sized>(
    runs: &[OptimizationRun],
    store: &S,
) -> Vec<Result<OptimizationResult, OptimizeError>> {
    use rayon::prelude::*;

    runs.par_iter().map(|run| optimize(run, store)).collect()
}
