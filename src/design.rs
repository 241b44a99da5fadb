//! Design variables and their bounds.
//!
//! A spring geometry is described by four variables: wire diameter, mean
//! coil diameter and pitch (continuous, mm) and the number of active coils
//! (integer). [`DesignVariableBounds`] is validated once before a run;
//! afterwards every generated value is clamped into it.

use crate::error::OptimizeError;
use std::fmt;

/// Identifies one of the four design variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DesignVariable {
    WireDiameter,
    MeanDiameter,
    Pitch,
    ActiveCoils,
}

impl fmt::Display for DesignVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DesignVariable::WireDiameter => "wire diameter",
            DesignVariable::MeanDiameter => "mean diameter",
            DesignVariable::Pitch => "pitch",
            DesignVariable::ActiveCoils => "active coils",
        };
        f.write_str(name)
    }
}

/// Closed interval `[min, max]` for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableBounds {
    pub min: f64,
    pub max: f64,
}

impl VariableBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `max - min`
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Smallest and largest integers inside the interval.
    pub fn integer_range(&self) -> (u32, u32) {
        (self.min.ceil() as u32, self.max.floor() as u32)
    }

    fn validate(&self, variable: DesignVariable) -> Result<(), OptimizeError> {
        let invalid = |reason: String| OptimizeError::InvalidBounds { variable, reason };

        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(invalid(format!(
                "bounds must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.min <= 0.0 {
            return Err(invalid(format!("min must be positive, got {}", self.min)));
        }
        if self.min > self.max {
            return Err(invalid(format!("min {} > max {}", self.min, self.max)));
        }
        Ok(())
    }
}

/// Per-variable search bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignVariableBounds {
    /// Wire diameter d (mm)
    pub wire_diameter: VariableBounds,
    /// Mean coil diameter D (mm)
    pub mean_diameter: VariableBounds,
    /// Coil pitch p (mm)
    pub pitch: VariableBounds,
    /// Active coil count n; only integer values inside the interval are used
    pub active_coils: VariableBounds,
}

impl Default for DesignVariableBounds {
    fn default() -> Self {
        Self {
            wire_diameter: VariableBounds::new(1.0, 3.0),
            mean_diameter: VariableBounds::new(10.0, 30.0),
            pitch: VariableBounds::new(2.0, 6.0),
            active_coils: VariableBounds::new(5.0, 15.0),
        }
    }
}

impl DesignVariableBounds {
    pub fn new(
        wire_diameter: (f64, f64),
        mean_diameter: (f64, f64),
        pitch: (f64, f64),
        active_coils: (f64, f64),
    ) -> Self {
        Self {
            wire_diameter: VariableBounds::new(wire_diameter.0, wire_diameter.1),
            mean_diameter: VariableBounds::new(mean_diameter.0, mean_diameter.1),
            pitch: VariableBounds::new(pitch.0, pitch.1),
            active_coils: VariableBounds::new(active_coils.0, active_coils.1),
        }
    }

    /// Checks every pre-flight invariant.
    ///
    /// Besides `0 < min <= max`, the coil interval must contain an integer
    /// and the smallest mean diameter must exceed the largest wire diameter,
    /// so every sampled spring has an index above 1.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        self.wire_diameter.validate(DesignVariable::WireDiameter)?;
        self.mean_diameter.validate(DesignVariable::MeanDiameter)?;
        self.pitch.validate(DesignVariable::Pitch)?;
        self.active_coils.validate(DesignVariable::ActiveCoils)?;

        let (lo, hi) = self.active_coils.integer_range();
        if lo > hi {
            return Err(OptimizeError::InvalidBounds {
                variable: DesignVariable::ActiveCoils,
                reason: format!(
                    "[{}, {}] contains no whole coil count",
                    self.active_coils.min, self.active_coils.max
                ),
            });
        }

        if self.mean_diameter.min <= self.wire_diameter.max {
            return Err(OptimizeError::InvalidBounds {
                variable: DesignVariable::MeanDiameter,
                reason: format!(
                    "min {} must exceed the largest wire diameter {}",
                    self.mean_diameter.min, self.wire_diameter.max
                ),
            });
        }
        Ok(())
    }

    /// Rounds `coils` to the nearest whole count inside the coil bounds.
    ///
    /// On unvalidated bounds whose coil interval holds no integer, the
    /// result is the integer just below the interval.
    pub fn clamp_coils(&self, coils: f64) -> u32 {
        let (lo, hi) = self.active_coils.integer_range();
        (coils.round().max(0.0) as u32).max(lo).min(hi)
    }

    /// Clamps every variable into its bounds.
    pub fn clamp(&self, vars: &DesignVariables) -> DesignVariables {
        DesignVariables {
            wire_diameter: self.wire_diameter.clamp(vars.wire_diameter),
            mean_diameter: self.mean_diameter.clamp(vars.mean_diameter),
            pitch: self.pitch.clamp(vars.pitch),
            active_coils: self.clamp_coils(vars.active_coils as f64),
        }
    }

    pub fn contains(&self, vars: &DesignVariables) -> bool {
        let (lo, hi) = self.active_coils.integer_range();
        self.wire_diameter.contains(vars.wire_diameter)
            && self.mean_diameter.contains(vars.mean_diameter)
            && self.pitch.contains(vars.pitch)
            && (lo..=hi).contains(&vars.active_coils)
    }

    /// The centre of the search box, used as the comparison baseline.
    pub fn midpoint(&self) -> DesignVariables {
        DesignVariables {
            wire_diameter: self.wire_diameter.midpoint(),
            mean_diameter: self.mean_diameter.midpoint(),
            pitch: self.pitch.midpoint(),
            active_coils: self.clamp_coils(self.active_coils.midpoint()),
        }
    }
}

/// One point in design space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DesignVariables {
    /// d (mm)
    pub wire_diameter: f64,
    /// D (mm)
    pub mean_diameter: f64,
    /// p (mm)
    pub pitch: f64,
    /// n
    pub active_coils: u32,
}

impl DesignVariables {
    pub fn new(wire_diameter: f64, mean_diameter: f64, pitch: f64, active_coils: u32) -> Self {
        Self {
            wire_diameter,
            mean_diameter,
            pitch,
            active_coils,
        }
    }
}

impl fmt::Display for DesignVariables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d = {:.3} mm, D = {:.3} mm, p = {:.3} mm, n = {}",
            self.wire_diameter, self.mean_diameter, self.pitch, self.active_coils
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds_are_valid() {
        assert!(DesignVariableBounds::default().validate().is_ok());
    }

    #[test]
    fn test_clamp_coils_without_whole_count() {
        let bounds = DesignVariableBounds::new((1.0, 3.0), (10.0, 30.0), (2.0, 6.0), (5.2, 5.8));
        assert!(bounds.validate().is_err());
        assert_eq!(bounds.clamp_coils(5.5), 5);
        assert_eq!(bounds.midpoint().active_coils, 5);
    }

    #[test]
    fn test_min_greater_than_max() {
        let bounds = DesignVariableBounds::new((1.0, 3.0), (10.0, 30.0), (6.0, 2.0), (5.0, 15.0));
        match bounds.validate() {
            Err(OptimizeError::InvalidBounds { variable, .. }) => {
                assert_eq!(variable, DesignVariable::Pitch)
            }
            other => panic!("expected InvalidBounds, got {other:?}"),
        }
    }

    #[test]
    fn test_non_positive_bound() {
        let bounds = DesignVariableBounds::new((0.0, 3.0), (10.0, 30.0), (2.0, 6.0), (5.0, 15.0));
        assert!(matches!(
            bounds.validate(),
            Err(OptimizeError::InvalidBounds {
                variable: DesignVariable::WireDiameter,
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_bound() {
        let bounds =
            DesignVariableBounds::new((1.0, 3.0), (10.0, f64::INFINITY), (2.0, 6.0), (5.0, 15.0));
        assert!(bounds.validate().is_err());
    }

    #[test]
    fn test_coil_range_without_integer() {
        let bounds = DesignVariableBounds::new((1.0, 3.0), (10.0, 30.0), (2.0, 6.0), (5.2, 5.8));
        assert!(matches!(
            bounds.validate(),
            Err(OptimizeError::InvalidBounds {
                variable: DesignVariable::ActiveCoils,
                ..
            })
        ));
    }

    #[test]
    fn test_mean_diameter_must_exceed_wire() {
        let bounds = DesignVariableBounds::new((1.0, 5.0), (4.0, 30.0), (2.0, 6.0), (5.0, 15.0));
        assert!(matches!(
            bounds.validate(),
            Err(OptimizeError::InvalidBounds {
                variable: DesignVariable::MeanDiameter,
                ..
            })
        ));
    }

    #[test]
    fn test_midpoint() {
        let mid = DesignVariableBounds::default().midpoint();
        assert_eq!(mid, DesignVariables::new(2.0, 20.0, 4.0, 10));
    }

    #[test]
    fn test_clamp() {
        let bounds = DesignVariableBounds::default();
        let clamped = bounds.clamp(&DesignVariables::new(0.2, 45.0, 4.0, 40));
        assert_eq!(clamped, DesignVariables::new(1.0, 30.0, 4.0, 15));
        assert!(bounds.contains(&clamped));
    }

    #[test]
    fn test_clamp_coils_rounds() {
        let bounds = DesignVariableBounds::default();
        assert_eq!(bounds.clamp_coils(7.4), 7);
        assert_eq!(bounds.clamp_coils(7.6), 8);
        assert_eq!(bounds.clamp_coils(-3.0), 5);
        assert_eq!(bounds.clamp_coils(99.0), 15);
    }

    #[test]
    fn test_fractional_coil_bounds() {
        let bounds = DesignVariableBounds::new((1.0, 3.0), (10.0, 30.0), (2.0, 6.0), (4.5, 9.5));
        assert_eq!(bounds.active_coils.integer_range(), (5, 9));
        assert_eq!(bounds.clamp_coils(4.6), 5);
        assert_eq!(bounds.clamp_coils(9.5), 9);
    }
}
