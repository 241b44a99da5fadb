//! Physical properties of a helical compression spring.
//!
//! [`SpringProperties::evaluate`] is a pure function of the design
//! variables, the material and the working deflection. Ends are assumed
//! squared and ground, with two inactive end coils.
//!
//! # References
//!
//! - Wahl (1963), *Mechanical Springs*, 2nd ed.
//! - Shigley & Mischke, *Mechanical Engineering Design*, ch. 10

use crate::design::DesignVariables;
use crate::material::Material;
use std::f64::consts::PI;

/// Inactive coils added to the active count for squared-and-ground ends.
pub const INACTIVE_COILS: f64 = 2.0;

/// Upper bound reported for the safety factor (also used at zero stress).
pub const SAFETY_FACTOR_CEILING: f64 = 100.0;

/// Fatigue life reported as "infinite" (cycles).
pub const FATIGUE_LIFE_CEILING: f64 = 1e9;

/// Life at which the stress equals the endurance limit (cycles).
pub const FATIGUE_REFERENCE_CYCLES: f64 = 1e6;

/// Exponent of the inverse power-law S-N relation.
pub const FATIGUE_EXPONENT: f64 = 9.0;

/// Free-length to mean-diameter ratio above which buckling risk rises.
pub const CRITICAL_SLENDERNESS: f64 = 2.63;

/// Derived properties of one spring geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringProperties {
    /// C = D / d
    pub spring_index: f64,
    /// Wahl stress-correction factor
    pub wahl_factor: f64,
    /// k (N/mm)
    pub stiffness: f64,
    /// Load at the working deflection (N)
    pub working_load: f64,
    /// Corrected maximum shear stress at the working deflection (MPa)
    pub max_stress: f64,
    /// Wire mass including end coils (g)
    pub mass: f64,
    /// L0 (mm)
    pub free_length: f64,
    /// Fully compressed length (mm)
    pub solid_length: f64,
    /// L0 / D
    pub slenderness: f64,
    /// Allowable stress / max stress
    pub safety_factor: f64,
    /// Estimated cycles to failure
    pub fatigue_life: f64,
    /// 0 below the critical slenderness, growing linearly above it
    pub buckling_risk: f64,
}

impl SpringProperties {
    /// Evaluates a geometry.
    ///
    /// Callers guarantee `wire_diameter`, `mean_diameter` and `pitch` are
    /// positive and `active_coils >= 1`; bound validation enforces this
    /// before any run starts.
    ///
    /// ```
    /// use u_springopt::design::DesignVariables;
    /// use u_springopt::material::Material;
    /// use u_springopt::properties::SpringProperties;
    ///
    /// let vars = DesignVariables::new(2.0, 20.0, 4.0, 10);
    /// let props = SpringProperties::evaluate(&vars, &Material::fallback(), 10.0);
    /// assert!((props.spring_index - 10.0).abs() < 1e-12);
    /// assert!(props.stiffness > 0.0);
    /// ```
    pub fn evaluate(vars: &DesignVariables, material: &Material, working_deflection: f64) -> Self {
        let d = vars.wire_diameter;
        let big_d = vars.mean_diameter;
        let n = vars.active_coils as f64;

        let spring_index = big_d / d;
        let wahl_factor = wahl_factor(spring_index);

        let stiffness = material.shear_modulus * d.powi(4) / (8.0 * big_d.powi(3) * n);
        let working_load = stiffness * working_deflection;
        let max_stress = wahl_factor * 8.0 * working_load * big_d / (PI * d.powi(3));

        let total_coils = n + INACTIVE_COILS;
        let wire_length = PI * big_d * total_coils;
        let volume_mm3 = 0.25 * PI * d * d * wire_length;
        let mass = volume_mm3 * material.density / 1000.0;

        let free_length = n * vars.pitch + 2.0 * d;
        let solid_length = total_coils * d;
        let slenderness = free_length / big_d;

        Self {
            spring_index,
            wahl_factor,
            stiffness,
            working_load,
            max_stress,
            mass,
            free_length,
            solid_length,
            slenderness,
            safety_factor: safety_factor(material.allowable_stress, max_stress),
            fatigue_life: fatigue_life(material.endurance_limit, max_stress),
            buckling_risk: buckling_risk(slenderness),
        }
    }
}

/// Kw = (4C − 1)/(4C − 4) + 0.615/C; 1.0 for C <= 1.
pub fn wahl_factor(spring_index: f64) -> f64 {
    if spring_index > 1.0 {
        (4.0 * spring_index - 1.0) / (4.0 * spring_index - 4.0) + 0.615 / spring_index
    } else {
        1.0
    }
}

fn safety_factor(allowable_stress: f64, stress: f64) -> f64 {
    if stress > 0.0 {
        (allowable_stress / stress).min(SAFETY_FACTOR_CEILING)
    } else {
        SAFETY_FACTOR_CEILING
    }
}

/// N = N_ref · (S_e / τ)^m, capped at [`FATIGUE_LIFE_CEILING`].
fn fatigue_life(endurance_limit: f64, stress: f64) -> f64 {
    if stress > 0.0 {
        (FATIGUE_REFERENCE_CYCLES * (endurance_limit / stress).powf(FATIGUE_EXPONENT))
            .min(FATIGUE_LIFE_CEILING)
    } else {
        FATIGUE_LIFE_CEILING
    }
}

fn buckling_risk(slenderness: f64) -> f64 {
    ((slenderness - CRITICAL_SLENDERNESS) / CRITICAL_SLENDERNESS).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline() -> DesignVariables {
        DesignVariables::new(2.0, 20.0, 4.0, 10)
    }

    #[test]
    fn test_wahl_factor() {
        // C = 10: (39/36) + 0.0615
        assert!((wahl_factor(10.0) - (39.0 / 36.0 + 0.0615)).abs() < 1e-12);
        assert_eq!(wahl_factor(1.0), 1.0);
        assert_eq!(wahl_factor(0.5), 1.0);
    }

    #[test]
    fn test_stiffness_and_stress() {
        let material = Material::fallback();
        let props = SpringProperties::evaluate(&baseline(), &material, 10.0);

        // k = 79000 * 16 / (8 * 8000 * 10) = 1.975 N/mm
        assert!((props.stiffness - 1.975).abs() < 1e-9);
        assert!((props.working_load - 19.75).abs() < 1e-9);

        let expected = wahl_factor(10.0) * 8.0 * 19.75 * 20.0 / (PI * 8.0);
        assert!((props.max_stress - expected).abs() < 1e-9);
        assert!((props.safety_factor - 700.0 / expected).abs() < 1e-9);
    }

    #[test]
    fn test_geometry() {
        let props = SpringProperties::evaluate(&baseline(), &Material::fallback(), 10.0);
        assert!((props.free_length - 44.0).abs() < 1e-12);
        assert!((props.solid_length - 24.0).abs() < 1e-12);
        assert!((props.slenderness - 2.2).abs() < 1e-12);
        assert_eq!(props.buckling_risk, 0.0);

        // volume = π/4 · 4 · π · 20 · 12 mm³
        let volume = PI * PI * 240.0;
        assert!((props.mass - volume * 7.85 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_slender_spring_buckles() {
        let vars = DesignVariables::new(1.0, 10.0, 6.0, 15);
        let props = SpringProperties::evaluate(&vars, &Material::fallback(), 10.0);
        // L0 = 92, L0/D = 9.2
        assert!((props.slenderness - 9.2).abs() < 1e-12);
        assert!((props.buckling_risk - (9.2 - 2.63) / 2.63).abs() < 1e-12);
    }

    #[test]
    fn test_zero_deflection_hits_ceilings() {
        let props = SpringProperties::evaluate(&baseline(), &Material::fallback(), 0.0);
        assert_eq!(props.max_stress, 0.0);
        assert_eq!(props.safety_factor, SAFETY_FACTOR_CEILING);
        assert_eq!(props.fatigue_life, FATIGUE_LIFE_CEILING);
    }

    #[test]
    fn test_fatigue_life_at_endurance_limit() {
        assert!((fatigue_life(480.0, 480.0) - FATIGUE_REFERENCE_CYCLES).abs() < 1e-6);
        // Above the endurance limit life drops below the reference
        assert!(fatigue_life(480.0, 600.0) < FATIGUE_REFERENCE_CYCLES);
        // Far below it, the ceiling applies
        assert_eq!(fatigue_life(480.0, 10.0), FATIGUE_LIFE_CEILING);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let material = Material::music_wire();
        let a = SpringProperties::evaluate(&baseline(), &material, 12.5);
        let b = SpringProperties::evaluate(&baseline(), &material, 12.5);
        assert_eq!(a, b);
    }
}
