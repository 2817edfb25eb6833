//! # Continuum Worm-Like Chain
//!
//! Closed-form and variational results for an inextensible worm-like chain of
//! persistence length `lpb` pulled by a force `F` along its end-to-end axis.
//!
//! ## Units
//!
//! Forces are in kT/nm and lengths in nm, so `F * lpb` is dimensionless. The
//! [`units`] module converts forces to and from piconewtons at a given temperature.
//!
//! ## Model Families
//!
//! - **Exact** ([`exact`]) - the variational free energy of Marko and Siggia,
//!   minimized numerically, and the force-extension relation derived from it
//! - **Interpolation** ([`interpolation`]) - the Marko-Siggia interpolation formula
//! - **High force** ([`high_force`]) - the asymptotic expansion valid for `F * lpb >> 1`
//!
//! Relative extensions `rho = z / L` at or beyond full extension map to the
//! saturating force [`F_MAX`].

pub mod exact;
pub mod high_force;
pub mod interpolation;
pub mod units;

use crate::core::numerics::NumericsError;
use thiserror::Error;

/// Force returned for relative extensions `rho >= 1`.
pub const F_MAX: f64 = 255.9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WlcError {
    #[error("Persistence length must be positive and finite, got {0}")]
    InvalidPersistenceLength(f64),

    #[error("Force must be finite and non-negative, got {0}")]
    InvalidForce(f64),

    #[error("Relative extension must be finite and non-negative, got {0}")]
    InvalidExtension(f64),

    #[error("Could not bracket the free-energy minimum at F = {force} after {attempts} adjustments")]
    MinimumBracket { force: f64, attempts: usize },

    #[error("Could not bracket the force for rho = {rho} after {attempts} expansions")]
    ForceBracket { rho: f64, attempts: usize },

    #[error("Numerical solver failed: {0}")]
    Numerics(#[from] NumericsError),
}

pub(crate) fn check_persistence_length(lpb: f64) -> Result<(), WlcError> {
    if lpb.is_finite() && lpb > 0.0 {
        Ok(())
    } else {
        Err(WlcError::InvalidPersistenceLength(lpb))
    }
}

pub(crate) fn check_force(force: f64) -> Result<(), WlcError> {
    if force.is_finite() && force >= 0.0 {
        Ok(())
    } else {
        Err(WlcError::InvalidForce(force))
    }
}
