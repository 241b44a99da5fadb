//! The evaluation pipeline: properties → constraints → objective.

use crate::constraints::OptimizationConstraints;
use crate::design::DesignVariables;
use crate::ga::CandidateSolution;
use crate::material::Material;
use crate::objective::ObjectiveMode;
use crate::properties::SpringProperties;

/// Everything needed to turn design variables into a [`CandidateSolution`].
///
/// Built once per run after the material has been resolved, so
/// [`evaluate`](Self::evaluate) is a pure computation.
#[derive(Debug, Clone)]
pub struct Evaluator {
    material: Material,
    working_deflection: f64,
    constraints: OptimizationConstraints,
    objective: ObjectiveMode,
}

impl Evaluator {
    pub fn new(
        material: Material,
        working_deflection: f64,
        constraints: OptimizationConstraints,
        objective: ObjectiveMode,
    ) -> Self {
        Self {
            material,
            working_deflection,
            constraints,
            objective,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn working_deflection(&self) -> f64 {
        self.working_deflection
    }

    pub fn constraints(&self) -> &OptimizationConstraints {
        &self.constraints
    }

    pub fn objective(&self) -> ObjectiveMode {
        self.objective
    }

    pub fn properties(&self, variables: &DesignVariables) -> SpringProperties {
        SpringProperties::evaluate(variables, &self.material, self.working_deflection)
    }

    pub fn evaluate(&self, variables: DesignVariables) -> CandidateSolution {
        let properties = self.properties(&variables);
        let constraint_violations = self.constraints.check(&properties);
        let is_feasible = constraint_violations.is_feasible();
        let fitness = self
            .objective
            .fitness(&properties, &self.constraints, is_feasible);

        CandidateSolution {
            variables,
            properties,
            constraint_violations,
            is_feasible,
            fitness,
        }
    }
}
