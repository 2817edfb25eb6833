use super::config::ConfigError;
use crate::core::fit::FitError;
use crate::core::io::columns::DataError;
use crate::core::polymer::WlcError;
use crate::core::quadrature::QuadratureError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStage {
    Marginal,
    Gradient,
    Observables,
}

impl fmt::Display for SolverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marginal => write!(f, "marginal"),
            Self::Gradient => write!(f, "gradient"),
            Self::Observables => write!(f, "observables"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid parameter '{name}': {value} is not finite")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Orientation grid construction failed: {0}")]
    Quadrature(#[from] QuadratureError),

    #[error(
        "The {stage} iteration failed to converge after {iterations} iterations (last residual {residual:e})"
    )]
    NonConvergence {
        stage: SolverStage,
        iterations: usize,
        residual: f64,
    },

    #[error(
        "The {stage} stage produced a non-finite or non-positive normalization at iteration {iteration}"
    )]
    NonFinite {
        stage: SolverStage,
        iteration: usize,
    },

    #[error("Domain error computing {quantity}: {reason}")]
    Domain {
        quantity: &'static str,
        reason: String,
    },

    #[error("Continuum model error: {0}")]
    Wlc(#[from] WlcError),

    #[error("Fit failed: {0}")]
    Fit(#[from] FitError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),
}
