//! Turns the final GA state into an [`OptimizationResult`].
//!
//! The baseline is the centre of the search box, evaluated through the same
//! pipeline as every candidate, so improvement percentages compare like with
//! like.

use crate::design::DesignVariableBounds;
use crate::evaluator::Evaluator;
use crate::ga::multi_objective::pareto_front;
use crate::ga::{CandidateSolution, ConvergenceRecord, EvolutionOutcome, Termination};
use crate::material::MaterialSource;
use crate::objective::ObjectiveMode;
use std::fmt::Write as _;
use std::time::Duration;

/// Everything a run produces.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    /// Best candidate ever observed. May be infeasible if no feasible design
    /// was found.
    pub best: CandidateSolution,

    /// Midpoint design the improvement is measured against.
    pub baseline: CandidateSolution,

    /// Up to `front_size` feasible members of the final population, best
    /// fitness first.
    ///
    /// This is a convenience sample, not a Pareto set; see
    /// [`pareto_front`](Self::pareto_front).
    pub feasible_sample: Vec<CandidateSolution>,

    /// Non-dominated feasible designs of the final population over stress,
    /// mass, safety factor, fatigue life and buckling risk.
    pub pareto_front: Vec<CandidateSolution>,

    pub history: Vec<ConvergenceRecord>,
    pub generations: usize,
    pub termination: Termination,
    pub elapsed: Duration,

    /// Improvement of `best` over `baseline` in percent; positive is better.
    pub improvement_percent: f64,

    pub objective: ObjectiveMode,
    pub material_source: MaterialSource,

    /// Human-readable report of the run.
    pub summary: String,
}

/// Builds results for one run.
pub struct ResultSynthesizer<'a> {
    evaluator: &'a Evaluator,
    bounds: &'a DesignVariableBounds,
    front_size: usize,
}

impl<'a> ResultSynthesizer<'a> {
    pub fn new(evaluator: &'a Evaluator, bounds: &'a DesignVariableBounds, front_size: usize) -> Self {
        Self {
            evaluator,
            bounds,
            front_size,
        }
    }

    /// Assembles the result. `material_id` is the identifier the run asked
    /// for, reported in the summary when the fallback material was used.
    pub fn synthesize(
        &self,
        outcome: EvolutionOutcome,
        material_id: &str,
        material_source: MaterialSource,
        elapsed: Duration,
    ) -> OptimizationResult {
        let objective = self.evaluator.objective();
        let baseline = self.evaluator.evaluate(self.bounds.midpoint());
        let improvement_percent = objective.improvement_percent(
            &baseline.properties,
            &outcome.best.properties,
            self.evaluator.constraints(),
        );

        let feasible_sample = feasible_sample(&outcome.population, self.front_size);
        let pareto_front = pareto_candidates(&outcome.population, self.front_size);

        let mut result = OptimizationResult {
            best: outcome.best,
            baseline,
            feasible_sample,
            pareto_front,
            history: outcome.history,
            generations: outcome.generations,
            termination: outcome.termination,
            elapsed,
            improvement_percent,
            objective,
            material_source,
            summary: String::new(),
        };
        result.summary = summary(&result, material_id);
        result
    }
}

/// Feasible candidates ordered by fitness, at most `limit`.
pub fn feasible_sample(population: &[CandidateSolution], limit: usize) -> Vec<CandidateSolution> {
    let mut feasible: Vec<&CandidateSolution> =
        population.iter().filter(|c| c.is_feasible).collect();
    feasible.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
    feasible.into_iter().take(limit).cloned().collect()
}

/// Trade-off vector of a candidate, every entry minimized.
fn trade_offs(c: &CandidateSolution) -> Vec<f64> {
    let p = &c.properties;
    vec![
        p.max_stress,
        p.mass,
        -p.safety_factor,
        -p.fatigue_life.log10(),
        p.buckling_risk,
    ]
}

/// Non-dominated feasible candidates with distinct design variables, thinned
/// to `limit` by crowding distance.
pub fn pareto_candidates(
    population: &[CandidateSolution],
    limit: usize,
) -> Vec<CandidateSolution> {
    let mut unique: Vec<&CandidateSolution> = Vec::new();
    for c in population.iter().filter(|c| c.is_feasible) {
        if !unique.iter().any(|u| u.variables == c.variables) {
            unique.push(c);
        }
    }

    let objectives: Vec<Vec<f64>> = unique.iter().map(|c| trade_offs(c)).collect();
    pareto_front(&objectives, limit)
        .into_iter()
        .map(|i| unique[i].clone())
        .collect()
}

fn summary(result: &OptimizationResult, material_id: &str) -> String {
    let best = &result.best;
    let mut s = String::new();

    let _ = writeln!(s, "Objective: {}", result.objective);
    let _ = writeln!(s, "Best design: {}", best.variables);
    let _ = writeln!(
        s,
        "Stress {:.1} MPa, safety factor {:.2}, fatigue life {:.3e} cycles, mass {:.2} g",
        best.properties.max_stress,
        best.properties.safety_factor,
        best.properties.fatigue_life,
        best.properties.mass
    );
    if best.is_feasible {
        let _ = writeln!(s, "Feasible: yes");
    } else {
        let violated = best.constraint_violations.iter().filter(|v| *v > 0.0).count();
        let _ = writeln!(s, "Feasible: no ({violated} constraint(s) violated)");
    }
    let _ = writeln!(
        s,
        "Improvement over baseline: {:+.2}%",
        result.improvement_percent
    );
    let _ = write!(
        s,
        "Generations: {} ({})",
        result.generations, result.termination
    );
    if result.material_source == MaterialSource::Fallback {
        let _ = write!(
            s,
            "\nWarning: material '{material_id}' was not found; results use generic spring steel constants"
        );
    }
    s
}
