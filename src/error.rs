//! Error type for the optimizer.
//!
//! Every variant is a pre-flight failure: once a run has started, the
//! evolutionary loop has no failure mode. An infeasible best design is a
//! normal result, not an error.

use crate::design::DesignVariable;
use crate::optimizer::SearchMethod;

/// Errors returned before a run starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptimizeError {
    /// A design-variable bound is malformed or would make the
    /// stress/mass formulas degenerate.
    #[error("invalid bounds for {variable}: {reason}")]
    InvalidBounds {
        variable: DesignVariable,
        reason: String,
    },

    /// A run, GA or constraint parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The material identifier could not be resolved and the run uses
    /// [`MaterialPolicy::Strict`](crate::material::MaterialPolicy::Strict).
    #[error("material '{0}' not found in the material store")]
    MissingMaterial(String),

    /// The requested search method has no implementation.
    #[error("search method {0} is not implemented")]
    NotImplemented(SearchMethod),
}
