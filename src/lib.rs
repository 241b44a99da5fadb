//! Constrained design optimization for helical compression springs.
//!
//! Searches wire diameter, mean coil diameter, pitch and active coil count
//! for a spring that best meets an engineering objective while respecting
//! stress, safety-factor, fatigue-life and optional mass, spring-rate and
//! free-length constraints.
//!
//! - **Properties**: closed-form spring mechanics (Wahl-corrected stress,
//!   stiffness, mass, fatigue life, buckling risk).
//! - **Genetic Algorithm**: real-coded GA with elitism, pluggable parent
//!   selection, arithmetic crossover and bounded mutation, driven by an
//!   explicit generation state machine.
//! - **Result synthesis**: best-ever design, midpoint baseline, improvement
//!   percentage, feasible sample, Pareto front over the engineering
//!   trade-offs and a text summary.
//!
//! # Example
//!
//! ```
//! use u_springopt::ga::GaConfig;
//! use u_springopt::material::MaterialLibrary;
//! use u_springopt::objective::ObjectiveMode;
//! use u_springopt::optimizer::{optimize, OptimizationRun};
//!
//! let run = OptimizationRun::new(ObjectiveMode::MinimizeMaxStress)
//!     .with_ga_config(GaConfig::fast().with_seed(42));
//! let result = optimize(&run, &MaterialLibrary::builtin()).unwrap();
//! assert!(result.best.is_feasible);
//! println!("{}", result.summary);
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` on configuration and result types
//! - `parallel`: [`optimizer::optimize_many`] over a rayon pool

pub mod constraints;
pub mod design;
pub mod error;
pub mod evaluator;
pub mod ga;
pub mod material;
pub mod objective;
pub mod optimizer;
pub mod properties;
pub mod synthesis;

pub use constraints::{ConstraintViolations, OptimizationConstraints};
pub use design::{DesignVariable, DesignVariableBounds, DesignVariables};
pub use error::OptimizeError;
pub use material::{Material, MaterialLibrary, MaterialPolicy, MaterialSource, MaterialStore};
pub use objective::ObjectiveMode;
pub use optimizer::{optimize, optimize_with_rng, OptimizationRun, SearchMethod};
pub use properties::SpringProperties;
pub use synthesis::OptimizationResult;
