use super::{F_MAX, WlcError, check_force, check_persistence_length};
use crate::core::numerics::{SolverConfig, brent};

/// Upper end of the extension bracket; the formula diverges at `rho = 1`.
const RHO_UPPER: f64 = 1.0 - 1e-7;

/// Marko-Siggia interpolation, `F lpb = rho + ((1 - rho)^-2 - 1) / 4`.
///
/// Saturates at [`F_MAX`] for `rho >= 1`.
pub fn force(rho: f64, lpb: f64) -> Result<f64, WlcError> {
    check_persistence_length(lpb)?;
    if rho.is_nan() {
        return Err(WlcError::InvalidExtension(rho));
    }
    if rho >= 1.0 {
        return Ok(F_MAX);
    }
    Ok(reduced_force(rho) / lpb)
}

/// Inverts [`force`] by root finding on `[0, 1 - 1e-7]`.
pub fn elongation(force: f64, lpb: f64) -> Result<f64, WlcError> {
    check_persistence_length(lpb)?;
    check_force(force)?;
    if force == 0.0 {
        return Ok(0.0);
    }

    let target = force * lpb;
    let root = brent(
        |rho| reduced_force(rho) - target,
        0.0,
        RHO_UPPER,
        &solver_config(),
    )?;
    Ok(root.x)
}

/// `F lpb` as a function of `rho`.
#[inline]
pub(crate) fn reduced_force(rho: f64) -> f64 {
    let slack = 1.0 - rho;
    rho + (1.0 / (slack * slack) - 1.0) / 4.0
}

fn solver_config() -> SolverConfig {
    SolverConfig::new(200, 1e-14, 1e-12).unwrap_or_default()
}
