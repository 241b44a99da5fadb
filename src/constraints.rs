//! Engineering constraints and feasibility checking.

use crate::error::OptimizeError;
use crate::properties::SpringProperties;

/// Constraint set for one run.
///
/// # Examples
///
/// ```
/// use u_springopt::constraints::OptimizationConstraints;
///
/// let constraints = OptimizationConstraints::new(800.0, 1.2, 1e6)
///     .with_max_mass(25.0)
///     .with_target_spring_rate(2.0, 15.0);
/// assert!(constraints.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationConstraints {
    /// Maximum corrected shear stress (MPa).
    pub max_stress: f64,

    /// Minimum allowable-to-actual stress ratio.
    pub min_safety_factor: f64,

    /// Minimum fatigue life (cycles).
    pub min_fatigue_life: f64,

    /// Maximum wire mass (g).
    pub max_mass: Option<f64>,

    /// Target spring rate (N/mm).
    pub target_spring_rate: Option<f64>,

    /// Accepted deviation from `target_spring_rate`, in percent.
    pub spring_rate_tolerance: f64,

    /// Minimum free length (mm).
    pub min_free_length: Option<f64>,

    /// Maximum free length (mm).
    pub max_free_length: Option<f64>,
}

impl Default for OptimizationConstraints {
    fn default() -> Self {
        Self::new(800.0, 1.2, 1e6)
    }
}

impl OptimizationConstraints {
    pub fn new(max_stress: f64, min_safety_factor: f64, min_fatigue_life: f64) -> Self {
        Self {
            max_stress,
            min_safety_factor,
            min_fatigue_life,
            max_mass: None,
            target_spring_rate: None,
            spring_rate_tolerance: 10.0,
            min_free_length: None,
            max_free_length: None,
        }
    }

    pub fn with_max_mass(mut self, grams: f64) -> Self {
        self.max_mass = Some(grams);
        self
    }

    /// Requires the stiffness to lie within `tolerance_percent` of `rate`.
    pub fn with_target_spring_rate(mut self, rate: f64, tolerance_percent: f64) -> Self {
        self.target_spring_rate = Some(rate);
        self.spring_rate_tolerance = tolerance_percent;
        self
    }

    pub fn with_free_length_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_free_length = min;
        self.max_free_length = max;
        self
    }

    pub fn validate(&self) -> Result<(), OptimizeError> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(OptimizeError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };

        positive("max_stress", self.max_stress)?;
        positive("min_safety_factor", self.min_safety_factor)?;
        positive("min_fatigue_life", self.min_fatigue_life)?;
        if let Some(m) = self.max_mass {
            positive("max_mass", m)?;
        }
        if let Some(k) = self.target_spring_rate {
            positive("target_spring_rate", k)?;
        }
        if !(self.spring_rate_tolerance.is_finite() && self.spring_rate_tolerance >= 0.0) {
            return Err(OptimizeError::InvalidConfig(format!(
                "spring_rate_tolerance must be non-negative, got {}",
                self.spring_rate_tolerance
            )));
        }
        if let Some(l) = self.min_free_length {
            positive("min_free_length", l)?;
        }
        if let Some(l) = self.max_free_length {
            positive("max_free_length", l)?;
        }
        if let (Some(lo), Some(hi)) = (self.min_free_length, self.max_free_length) {
            if lo > hi {
                return Err(OptimizeError::InvalidConfig(format!(
                    "min_free_length {lo} > max_free_length {hi}"
                )));
            }
        }
        Ok(())
    }

    /// Computes the violation of every active constraint.
    pub fn check(&self, props: &SpringProperties) -> ConstraintViolations {
        ConstraintViolations {
            stress: excess(props.max_stress, self.max_stress),
            safety_factor: excess(self.min_safety_factor, props.safety_factor),
            fatigue_life: excess(self.min_fatigue_life, props.fatigue_life),
            mass: self.max_mass.map(|limit| excess(props.mass, limit)),
            spring_rate: self.target_spring_rate.map(|target| {
                let band = target * self.spring_rate_tolerance / 100.0;
                excess((props.stiffness - target).abs(), band)
            }),
            min_free_length: self
                .min_free_length
                .map(|limit| excess(limit, props.free_length)),
            max_free_length: self
                .max_free_length
                .map(|limit| excess(props.free_length, limit)),
        }
    }
}

/// `max(0, value - limit)`
fn excess(value: f64, limit: f64) -> f64 {
    (value - limit).max(0.0)
}

/// Violation magnitude per constraint: 0 when satisfied, the positive
/// excess otherwise. `None` marks an inactive optional constraint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintViolations {
    /// MPa above `max_stress`
    pub stress: f64,
    /// Shortfall below `min_safety_factor`
    pub safety_factor: f64,
    /// Cycles below `min_fatigue_life`
    pub fatigue_life: f64,
    /// Grams above `max_mass`
    pub mass: Option<f64>,
    /// N/mm outside the spring-rate tolerance band
    pub spring_rate: Option<f64>,
    /// mm below `min_free_length`
    pub min_free_length: Option<f64>,
    /// mm above `max_free_length`
    pub max_free_length: Option<f64>,
}

impl ConstraintViolations {
    /// Active violations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = f64> {
        [
            Some(self.stress),
            Some(self.safety_factor),
            Some(self.fatigue_life),
            self.mass,
            self.spring_rate,
            self.min_free_length,
            self.max_free_length,
        ]
        .into_iter()
        .flatten()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// True iff every active violation is `<= 0`.
    pub fn is_feasible(&self) -> bool {
        self.iter().all(|v| v <= 0.0)
    }

    /// Sum of all violation magnitudes.
    pub fn total(&self) -> f64 {
        self.iter().sum()
    }
}
