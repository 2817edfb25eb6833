//! Exact worm-like chain relations from the variational free energy
//! (Marko and Siggia, Macromolecules 1995, eq. 14).
//!
//! The free energy per unit length is
//!
//! ```text
//! g(F) = min_x (x / (2 lpb) - F) (coth(4x) - 1 / (2x))
//! ```
//!
//! and the relative extension is `rho = -dg/dF`. Because `g` is a minimum over `x`,
//! the envelope theorem gives `rho = coth(4x*) - 1 / (2x*)` at the minimizer `x*`,
//! so no numerical differentiation of `g` is needed.

use super::{F_MAX, WlcError, check_force, check_persistence_length, interpolation};
use crate::core::numerics::{SolverConfig, brent, golden_section};
use tracing::trace;

const X_LOWER: f64 = 1e-10;
const X_UPPER: f64 = 10.0;
const MAX_BRACKET_ADJUSTMENTS: usize = 100;
const MAX_FORCE_EXPANSIONS: usize = 60;

/// Location and value of the variational minimum at a given force.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationalMinimum {
    pub x: f64,
    pub free_energy: f64,
}

/// Free energy per unit length `g(F)` in kT/nm.
///
/// At zero force the minimizer sits at `x -> 0`, where `g` tends to `-1 / (8 lpb)`.
pub fn free_energy(force: f64, lpb: f64) -> Result<f64, WlcError> {
    check_persistence_length(lpb)?;
    check_force(force)?;
    if force == 0.0 {
        return Ok(-1.0 / (8.0 * lpb));
    }
    Ok(minimize(force, lpb)?.free_energy)
}

/// Relative extension `rho(F) = -dg/dF`.
pub fn elongation(force: f64, lpb: f64) -> Result<f64, WlcError> {
    check_persistence_length(lpb)?;
    check_force(force)?;
    if force == 0.0 {
        return Ok(0.0);
    }
    let minimum = minimize(force, lpb)?;
    Ok(extension_factor(minimum.x))
}

/// Force needed to reach relative extension `rho`, inverting [`elongation`].
///
/// The root is bracketed around the interpolation-formula estimate; `rho >= 1`
/// saturates at [`F_MAX`].
pub fn force(rho: f64, lpb: f64) -> Result<f64, WlcError> {
    check_persistence_length(lpb)?;
    if rho.is_nan() || rho < 0.0 {
        return Err(WlcError::InvalidExtension(rho));
    }
    if rho >= 1.0 {
        return Ok(F_MAX);
    }
    if rho == 0.0 {
        return Ok(0.0);
    }

    // Solver failures inside the residual surface as non-finite values.
    let residual = |f: f64| elongation(f, lpb).map_or(f64::NAN, |r| r - rho);

    let guess = interpolation::force(rho, lpb)?;
    let (mut lower, mut upper) = (0.5 * guess, 2.0 * guess);
    let mut attempts = 0;
    while residual(lower) * residual(upper) > 0.0 {
        attempts += 1;
        if attempts > MAX_FORCE_EXPANSIONS {
            return Err(WlcError::ForceBracket { rho, attempts });
        }
        lower *= 0.5;
        upper *= 2.0;
    }
    trace!(rho, lower, upper, attempts, "Bracketed exact force.");

    let root = brent(residual, lower, upper, &root_config())?;
    Ok(root.x)
}

/// Helmholtz free energy per unit length, `f(rho) = g(F(rho)) + F(rho) rho`.
pub fn helmholtz_free_energy(rho: f64, lpb: f64) -> Result<f64, WlcError> {
    let f = force(rho, lpb)?;
    Ok(free_energy(f, lpb)? + f * rho)
}

/// Minimizes the variational free energy over `x` at a positive force.
pub fn minimize(force: f64, lpb: f64) -> Result<VariationalMinimum, WlcError> {
    let objective = |x: f64| (x / (2.0 * lpb) - force) * extension_factor(x);
    let (lower, upper) = bracket_minimum(&objective, force)?;
    let minimum = golden_section(objective, lower, upper, &minimizer_config())?;
    Ok(VariationalMinimum {
        x: minimum.x,
        free_energy: minimum.f_x,
    })
}

/// `coth(4x) - 1 / (2x)`.
#[inline]
fn extension_factor(x: f64) -> f64 {
    1.0 / (4.0 * x).tanh() - 1.0 / (2.0 * x)
}

/// Grows or shrinks the upper end of `[X_LOWER, X_UPPER]` until the midpoint lies
/// below both ends.
fn bracket_minimum<F>(objective: &F, force: f64) -> Result<(f64, f64), WlcError>
where
    F: Fn(f64) -> f64,
{
    let lower = X_LOWER;
    let f_lower = objective(lower);
    let mut upper = X_UPPER;

    for _ in 0..MAX_BRACKET_ADJUSTMENTS {
        let mid = lower + 0.5 * (upper - lower);
        let (f_mid, f_upper) = (objective(mid), objective(upper));
        if f_mid <= f_lower && f_mid <= f_upper {
            return Ok((lower, upper));
        }
        if f_mid > f_upper {
            upper = lower + 2.0 * (upper - lower);
        } else {
            upper = lower + 0.5 * (upper - lower);
        }
    }

    Err(WlcError::MinimumBracket {
        force,
        attempts: MAX_BRACKET_ADJUSTMENTS,
    })
}

fn minimizer_config() -> SolverConfig {
    SolverConfig::new(300, 1e-12, 1e-10).unwrap_or_default()
}

fn root_config() -> SolverConfig {
    SolverConfig::new(200, 1e-14, 1e-10).unwrap_or_default()
}
