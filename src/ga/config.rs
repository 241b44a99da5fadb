//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::selection::Selection;
use crate::error::OptimizeError;

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use u_springopt::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 50);
/// assert_eq!(config.max_generations, 100);
/// assert_eq!(config.stagnation_limit, 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_springopt::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(80)
///     .with_selection(Selection::Tournament(3))
///     .with_elite_ratio(0.05)
///     .with_seed(7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of candidates in the population. Constant across generations.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Fraction of the population copied unchanged into the next
    /// generation (0.0–1.0). At least one elite is always kept.
    pub elite_ratio: f64,

    /// Per-variable probability of perturbation during mutation (0.0–1.0).
    pub mutation_rate: f64,

    /// Half-width of a continuous mutation offset, as a fraction of the
    /// variable's range.
    pub mutation_scale: f64,

    /// Number of consecutive stagnating generations tolerated. The run
    /// converges once the counter exceeds this value.
    pub stagnation_limit: usize,

    /// Absolute change in best fitness below which a generation counts as
    /// stagnating.
    pub convergence_tolerance: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            selection: Selection::default(),
            elite_ratio: 0.1,
            mutation_rate: 0.1,
            mutation_scale: 0.1,
            stagnation_limit: 20,
            convergence_tolerance: 1e-6,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-variable mutation probability.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation offset half-width as a fraction of each range.
    pub fn with_mutation_scale(mut self, scale: f64) -> Self {
        self.mutation_scale = scale.max(0.0);
        self
    }

    /// Sets the stagnation patience.
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Preset for quick interactive feedback.
    ///
    /// - Population: 30, Generations: 50, Stagnation limit: 10
    pub fn fast() -> Self {
        Self {
            population_size: 30,
            max_generations: 50,
            stagnation_limit: 10,
            ..Self::default()
        }
    }

    /// Preset for a thorough search.
    ///
    /// - Population: 120, Generations: 400, Stagnation limit: 40
    pub fn quality() -> Self {
        Self {
            population_size: 120,
            max_generations: 400,
            stagnation_limit: 40,
            convergence_tolerance: 1e-9,
            ..Self::default()
        }
    }

    /// Number of elites carried over each generation: `round(N × ratio)`,
    /// at least one, at most `N`.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f64 * self.elite_ratio).round() as usize)
            .clamp(1, self.population_size.max(1))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        let invalid = |msg: String| Err(OptimizeError::InvalidConfig(msg));

        if self.population_size == 0 {
            return invalid("population_size must be at least 1".into());
        }
        if self.max_generations == 0 {
            return invalid("max_generations must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.elite_ratio) {
            return invalid(format!("elite_ratio must be in [0, 1], got {}", self.elite_ratio));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return invalid(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            ));
        }
        if !(self.mutation_scale.is_finite() && self.mutation_scale >= 0.0) {
            return invalid(format!(
                "mutation_scale must be non-negative, got {}",
                self.mutation_scale
            ));
        }
        if !(self.convergence_tolerance.is_finite() && self.convergence_tolerance >= 0.0) {
            return invalid(format!(
                "convergence_tolerance must be non-negative, got {}",
                self.convergence_tolerance
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return invalid("tournament size must be at least 1".into());
        }
        Ok(())
    }
}
