use super::config::SolverConfig;
use super::error::{NumericsError, evaluate};

/// The inverse golden ratio, `(√5 - 1) / 2`.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimum {
    pub x: f64,
    pub f_x: f64,
    pub iterations: usize,
}

/// Minimizes a unimodal `f` on `[lower, upper]` by golden section search.
///
/// The two interior points divide the interval in the golden ratio so that one of
/// them is reused after every shrink. The search stops when the interval half-width
/// is below `x_abs_tol + x_rel_tol * |x|` at the interval midpoint.
///
/// # Errors
///
/// Returns [`NumericsError::InvalidBracket`] for non-finite or equal bounds,
/// [`NumericsError::NonFinite`] if `f` returns NaN or infinity, and
/// [`NumericsError::NonConvergence`] when the iteration cap is reached.
pub fn golden_section<F>(
    f: F,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> Result<Minimum, NumericsError>
where
    F: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower == upper {
        return Err(NumericsError::InvalidBracket { lower, upper });
    }

    let (mut left, mut right) = if lower < upper {
        (lower, upper)
    } else {
        (upper, lower)
    };
    let mut inner_left = left + (1.0 - INV_PHI) * (right - left);
    let mut inner_right = left + INV_PHI * (right - left);
    let mut f_inner_left = evaluate(&f, inner_left)?;
    let mut f_inner_right = evaluate(&f, inner_right)?;

    for iteration in 1..=config.max_iters() {
        let mid = 0.5 * (left + right);
        if 0.5 * (right - left) <= config.tolerance_at(mid) {
            let (x, f_x) = if f_inner_left < f_inner_right {
                (inner_left, f_inner_left)
            } else {
                (inner_right, f_inner_right)
            };
            return Ok(Minimum {
                x,
                f_x,
                iterations: iteration,
            });
        }

        if f_inner_left < f_inner_right {
            right = inner_right;
            inner_right = inner_left;
            f_inner_right = f_inner_left;
            inner_left = left + (1.0 - INV_PHI) * (right - left);
            f_inner_left = evaluate(&f, inner_left)?;
        } else {
            left = inner_left;
            inner_left = inner_right;
            f_inner_left = f_inner_right;
            inner_right = left + INV_PHI * (right - left);
            f_inner_right = evaluate(&f, inner_right)?;
        }
    }

    Err(NumericsError::NonConvergence {
        iterations: config.max_iters(),
        width: right - left,
    })
}
