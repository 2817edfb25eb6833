use thiserror::Error;

/// Errors that can occur while solving or minimizing a scalar function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericsError {
    #[error("invalid bracket [{lower}, {upper}]: bounds must be finite and distinct")]
    InvalidBracket { lower: f64, upper: f64 },

    #[error(
        "bracket [{lower}, {upper}] does not enclose a root (f = {f_lower:e} and {f_upper:e})"
    )]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },

    #[error("function returned a non-finite value at x = {x}")]
    NonFinite { x: f64 },

    #[error("no convergence after {iterations} iterations (interval width {width:e})")]
    NonConvergence { iterations: usize, width: f64 },
}

#[inline]
pub(super) fn evaluate<F>(f: &F, x: f64) -> Result<f64, NumericsError>
where
    F: Fn(f64) -> f64,
{
    let value = f(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericsError::NonFinite { x })
    }
}
