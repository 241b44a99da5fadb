//! Genetic operators over spring design variables.
//!
//! All operators return [`DesignVariables`] already clamped into the bounds;
//! the runner evaluates every product before admitting it.
//!
//! # Operators
//!
//! - [`random_variables`]: uniform sample inside the bounds
//! - [`blend_crossover`] / [`crossover`]: arithmetic crossover with one shared
//!   weight for all variables
//! - [`mutate`]: independent bounded perturbation per variable
//!
//! # References
//!
//! - Michalewicz (1996), *Genetic Algorithms + Data Structures = Evolution
//!   Programs*, ch. 6 (arithmetic crossover, uniform mutation)

use crate::design::{DesignVariableBounds, DesignVariables, VariableBounds};
use rand::Rng;

/// Samples every variable uniformly inside its bounds. The coil count is
/// rounded from a continuous draw.
pub fn random_variables<R: Rng>(bounds: &DesignVariableBounds, rng: &mut R) -> DesignVariables {
    let coils = sample(&bounds.active_coils, rng);
    DesignVariables {
        wire_diameter: sample(&bounds.wire_diameter, rng),
        mean_diameter: sample(&bounds.mean_diameter, rng),
        pitch: sample(&bounds.pitch, rng),
        active_coils: bounds.clamp_coils(coils),
    }
}

fn sample<R: Rng>(b: &VariableBounds, rng: &mut R) -> f64 {
    rng.random_range(b.min..=b.max)
}

/// Arithmetic crossover with weight `alpha`: every continuous variable is
/// `alpha·a + (1 − alpha)·b`, the coil count is rounded from the same blend.
///
/// `alpha = 1` reproduces `a`, `alpha = 0` reproduces `b`.
///
/// ```
/// use u_springopt::design::{DesignVariableBounds, DesignVariables};
/// use u_springopt::ga::operators::blend_crossover;
///
/// let bounds = DesignVariableBounds::default();
/// let a = DesignVariables::new(1.0, 10.0, 2.0, 5);
/// let b = DesignVariables::new(3.0, 30.0, 6.0, 15);
/// let child = blend_crossover(&a, &b, 0.5, &bounds);
/// assert_eq!(child, DesignVariables::new(2.0, 20.0, 4.0, 10));
/// ```
pub fn blend_crossover(
    a: &DesignVariables,
    b: &DesignVariables,
    alpha: f64,
    bounds: &DesignVariableBounds,
) -> DesignVariables {
    let mix = |x: f64, y: f64| alpha * x + (1.0 - alpha) * y;
    let child = DesignVariables {
        wire_diameter: mix(a.wire_diameter, b.wire_diameter),
        mean_diameter: mix(a.mean_diameter, b.mean_diameter),
        pitch: mix(a.pitch, b.pitch),
        active_coils: bounds.clamp_coils(mix(a.active_coils as f64, b.active_coils as f64)),
    };
    bounds.clamp(&child)
}

/// [`blend_crossover`] with `alpha` drawn uniformly from `[0, 1)`.
pub fn crossover<R: Rng>(
    a: &DesignVariables,
    b: &DesignVariables,
    bounds: &DesignVariableBounds,
    rng: &mut R,
) -> DesignVariables {
    let alpha: f64 = rng.random();
    blend_crossover(a, b, alpha, bounds)
}

/// Perturbs each variable independently with probability `rate`.
///
/// A perturbed continuous variable moves by a uniform offset within
/// `±scale × range`; a perturbed coil count moves by ±1. Results are clamped.
pub fn mutate<R: Rng>(
    vars: &DesignVariables,
    bounds: &DesignVariableBounds,
    rate: f64,
    scale: f64,
    rng: &mut R,
) -> DesignVariables {
    let mut out = *vars;

    out.wire_diameter = perturb(out.wire_diameter, &bounds.wire_diameter, rate, scale, rng);
    out.mean_diameter = perturb(out.mean_diameter, &bounds.mean_diameter, rate, scale, rng);
    out.pitch = perturb(out.pitch, &bounds.pitch, rate, scale, rng);

    if rng.random_bool(rate) {
        let step = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        out.active_coils = bounds.clamp_coils(out.active_coils as f64 + step);
    }

    out
}

fn perturb<R: Rng>(value: f64, b: &VariableBounds, rate: f64, scale: f64, rng: &mut R) -> f64 {
    if !rng.random_bool(rate) {
        return value;
    }
    let reach = scale * b.span();
    b.clamp(value + rng.random_range(-reach..=reach))
}
