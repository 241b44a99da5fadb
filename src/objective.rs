//! Objective modes and the fitness model.
//!
//! Every objective is converted to a minimization score here, once. The GA
//! only ever compares fitness values, and improvement percentages are
//! computed from [`ObjectiveMode::metric`] and [`ObjectiveMode::sense`], so no
//! other module branches on the objective direction.

use crate::constraints::OptimizationConstraints;
use crate::error::OptimizeError;
use crate::properties::SpringProperties;
use std::fmt;

/// Additive penalty applied to the score of an infeasible candidate.
///
/// Large enough that any feasible candidate ranks ahead of any infeasible
/// one while keeping fitness totally ordered.
pub const INFEASIBLE_PENALTY: f64 = 1e6;

/// Mass normalization used by the weighted objective when no mass limit is
/// set (g).
pub const DEFAULT_MASS_SCALE: f64 = 100.0;

/// Relative importance of each term in
/// [`ObjectiveMode::WeightedMultiObjective`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveWeights {
    pub safety_factor: f64,
    pub fatigue_life: f64,
    pub mass: f64,
    pub max_stress: f64,
    pub buckling_risk: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            safety_factor: 0.2,
            fatigue_life: 0.2,
            mass: 0.2,
            max_stress: 0.2,
            buckling_risk: 0.2,
        }
    }
}

impl ObjectiveWeights {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        let weights = [
            self.safety_factor,
            self.fatigue_life,
            self.mass,
            self.max_stress,
            self.buckling_risk,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(OptimizeError::InvalidConfig(
                "objective weights must be non-negative and finite".into(),
            ));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(OptimizeError::InvalidConfig(
                "at least one objective weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Whether larger or smaller raw metric values are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    /// Percentage by which `optimized` improves on `baseline`.
    ///
    /// Positive means better. Returns 0 when the baseline is ~0 and no
    /// meaningful ratio exists.
    pub fn improvement_percent(self, baseline: f64, optimized: f64) -> f64 {
        if baseline.abs() < 1e-12 {
            return 0.0;
        }
        let gain = match self {
            Sense::Minimize => baseline - optimized,
            Sense::Maximize => optimized - baseline,
        };
        gain / baseline.abs() * 100.0
    }
}

/// What the optimizer is trying to achieve.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveMode {
    #[default]
    MaximizeSafetyFactor,
    MaximizeFatigueLife,
    MinimizeMass,
    MinimizeBucklingRisk,
    MinimizeMaxStress,
    WeightedMultiObjective(ObjectiveWeights),
}

impl fmt::Display for ObjectiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectiveMode::MaximizeSafetyFactor => "maximize safety factor",
            ObjectiveMode::MaximizeFatigueLife => "maximize fatigue life",
            ObjectiveMode::MinimizeMass => "minimize mass",
            ObjectiveMode::MinimizeBucklingRisk => "minimize buckling risk",
            ObjectiveMode::MinimizeMaxStress => "minimize max stress",
            ObjectiveMode::WeightedMultiObjective(_) => "weighted multi-objective",
        };
        f.write_str(name)
    }
}

impl ObjectiveMode {
    pub fn sense(&self) -> Sense {
        match self {
            ObjectiveMode::MaximizeSafetyFactor | ObjectiveMode::MaximizeFatigueLife => {
                Sense::Maximize
            }
            _ => Sense::Minimize,
        }
    }

    /// The raw, unsigned quantity the objective is about (e.g. grams for
    /// [`MinimizeMass`](Self::MinimizeMass)). For the weighted mode this is
    /// the composite score.
    pub fn metric(&self, props: &SpringProperties, constraints: &OptimizationConstraints) -> f64 {
        match self {
            ObjectiveMode::MaximizeSafetyFactor => props.safety_factor,
            ObjectiveMode::MaximizeFatigueLife => props.fatigue_life,
            ObjectiveMode::MinimizeMass => props.mass,
            ObjectiveMode::MinimizeBucklingRisk => props.buckling_risk,
            ObjectiveMode::MinimizeMaxStress => props.max_stress,
            ObjectiveMode::WeightedMultiObjective(w) => weighted_score(w, props, constraints),
        }
    }

    /// Minimization-sense score. Lower is better for every mode.
    pub fn score(&self, props: &SpringProperties, constraints: &OptimizationConstraints) -> f64 {
        match self {
            ObjectiveMode::MaximizeSafetyFactor => -props.safety_factor,
            // log scale keeps the score comparable across decades of life
            ObjectiveMode::MaximizeFatigueLife => -props.fatigue_life.log10(),
            ObjectiveMode::MinimizeMass => props.mass,
            ObjectiveMode::MinimizeBucklingRisk => props.buckling_risk,
            ObjectiveMode::MinimizeMaxStress => props.max_stress,
            ObjectiveMode::WeightedMultiObjective(w) => weighted_score(w, props, constraints),
        }
    }

    /// Score plus [`INFEASIBLE_PENALTY`] when the candidate is infeasible.
    pub fn fitness(
        &self,
        props: &SpringProperties,
        constraints: &OptimizationConstraints,
        is_feasible: bool,
    ) -> f64 {
        let score = self.score(props, constraints);
        if is_feasible {
            score
        } else {
            score + INFEASIBLE_PENALTY
        }
    }

    /// Percentage improvement of `optimized` over `baseline` in this
    /// objective's natural direction.
    pub fn improvement_percent(
        &self,
        baseline: &SpringProperties,
        optimized: &SpringProperties,
        constraints: &OptimizationConstraints,
    ) -> f64 {
        self.sense().improvement_percent(
            self.metric(baseline, constraints),
            self.metric(optimized, constraints),
        )
    }
}

/// Weighted sum of terms normalized by the constraint limits.
fn weighted_score(
    w: &ObjectiveWeights,
    props: &SpringProperties,
    constraints: &OptimizationConstraints,
) -> f64 {
    let mass_scale = constraints.max_mass.unwrap_or(DEFAULT_MASS_SCALE);
    let life_scale = constraints.min_fatigue_life.log10().max(1.0);

    -w.safety_factor * props.safety_factor / constraints.min_safety_factor
        - w.fatigue_life * props.fatigue_life.log10() / life_scale
        + w.mass * props.mass / mass_scale
        + w.max_stress * props.max_stress / constraints.max_stress
        + w.buckling_risk * props.buckling_risk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::DesignVariables;
    use crate::material::Material;

    fn props(d: f64, big_d: f64, n: u32) -> SpringProperties {
        SpringProperties::evaluate(
            &DesignVariables::new(d, big_d, 4.0, n),
            &Material::fallback(),
            10.0,
        )
    }

    #[test]
    fn test_maximize_modes_are_negated() {
        let c = OptimizationConstraints::default();
        let p = props(2.0, 20.0, 10);
        assert_eq!(ObjectiveMode::MaximizeSafetyFactor.score(&p, &c), -p.safety_factor);
        assert_eq!(
            ObjectiveMode::MaximizeFatigueLife.score(&p, &c),
            -p.fatigue_life.log10()
        );
        assert_eq!(ObjectiveMode::MinimizeMass.score(&p, &c), p.mass);
        assert_eq!(ObjectiveMode::MinimizeMaxStress.score(&p, &c), p.max_stress);
    }

    #[test]
    fn test_penalty() {
        let c = OptimizationConstraints::default();
        let p = props(2.0, 20.0, 10);
        let mode = ObjectiveMode::MinimizeMass;
        assert_eq!(mode.fitness(&p, &c, true), p.mass);
        assert_eq!(mode.fitness(&p, &c, false), p.mass + INFEASIBLE_PENALTY);
    }

    #[test]
    fn test_lower_score_is_better() {
        let c = OptimizationConstraints::default();
        // Thicker wire on the same coil: stiffer, more stress at the same
        // deflection, lower safety factor.
        let soft = props(1.5, 20.0, 10);
        let stiff = props(2.5, 20.0, 10);
        let mode = ObjectiveMode::MaximizeSafetyFactor;
        assert!(mode.score(&soft, &c) < mode.score(&stiff, &c));
        let mode = ObjectiveMode::MinimizeMaxStress;
        assert!(mode.score(&soft, &c) < mode.score(&stiff, &c));
    }

    #[test]
    fn test_improvement_direction() {
        assert!((Sense::Maximize.improvement_percent(2.0, 3.0) - 50.0).abs() < 1e-12);
        assert!((Sense::Minimize.improvement_percent(10.0, 8.0) - 20.0).abs() < 1e-12);
        assert!(Sense::Minimize.improvement_percent(10.0, 12.0) < 0.0);
        assert_eq!(Sense::Minimize.improvement_percent(0.0, 1.0), 0.0);
        // negative baseline (weighted scores) still reports gains as positive
        assert!((Sense::Minimize.improvement_percent(-2.0, -3.0) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_single_term_matches_scaled_objective() {
        let c = OptimizationConstraints::default();
        let p = props(2.0, 20.0, 10);
        let weights = ObjectiveWeights {
            safety_factor: 0.0,
            fatigue_life: 0.0,
            mass: 0.0,
            max_stress: 1.0,
            buckling_risk: 0.0,
        };
        let score = ObjectiveMode::WeightedMultiObjective(weights).score(&p, &c);
        assert!((score - p.max_stress / c.max_stress).abs() < 1e-12);
    }

    #[test]
    fn test_weights_validate() {
        assert!(ObjectiveWeights::default().validate().is_ok());
        let zero = ObjectiveWeights {
            safety_factor: 0.0,
            fatigue_life: 0.0,
            mass: 0.0,
            max_stress: 0.0,
            buckling_risk: 0.0,
        };
        assert!(zero.validate().is_err());
        let negative = ObjectiveWeights {
            mass: -1.0,
            ..ObjectiveWeights::default()
        };
        assert!(negative.validate().is_err());
    }
}
