use thiserror::Error;

/// Iteration cap and interval tolerances shared by the bracketing solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    max_iters: usize,
    x_abs_tol: f64,
    x_rel_tol: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("x_abs_tol must be finite and non-negative")]
    XAbs,

    #[error("x_rel_tol must be finite and non-negative")]
    XRel,

    #[error("at least one of x_abs_tol and x_rel_tol must be positive")]
    ZeroTolerance,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            x_abs_tol: 1e-12,
            x_rel_tol: 1e-12,
        }
    }
}

impl SolverConfig {
    /// Creates a config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero, if either tolerance is negative or
    /// non-finite, or if both tolerances are zero.
    pub fn new(max_iters: usize, x_abs_tol: f64, x_rel_tol: f64) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if !x_abs_tol.is_finite() || x_abs_tol < 0.0 {
            return Err(ConfigError::XAbs);
        }
        if !x_rel_tol.is_finite() || x_rel_tol < 0.0 {
            return Err(ConfigError::XRel);
        }
        if x_abs_tol == 0.0 && x_rel_tol == 0.0 {
            return Err(ConfigError::ZeroTolerance);
        }

        Ok(Self {
            max_iters,
            x_abs_tol,
            x_rel_tol,
        })
    }

    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    #[must_use]
    pub fn x_abs_tol(&self) -> f64 {
        self.x_abs_tol
    }

    #[must_use]
    pub fn x_rel_tol(&self) -> f64 {
        self.x_rel_tol
    }

    /// Interval half-width below which a solve around `x` is considered converged.
    #[inline]
    pub(super) fn tolerance_at(&self, x: f64) -> f64 {
        self.x_abs_tol + self.x_rel_tol * x.abs()
    }
}
