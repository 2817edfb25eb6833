use super::config::SolverConfig;
use super::error::{NumericsError, evaluate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// Finds a root of `f` inside `[lower, upper]` with the Brent-Dekker method.
///
/// Each step takes an inverse quadratic (or secant) interpolation step when it stays
/// well inside the current bracket and falls back to bisection otherwise, so the
/// bracket always shrinks. The solve stops once the bracket half-width drops below
/// `x_abs_tol + x_rel_tol * |x|` or `f` vanishes exactly.
///
/// # Errors
///
/// Returns [`NumericsError::InvalidBracket`] for non-finite or equal bounds,
/// [`NumericsError::NoSignChange`] if `f` has the same sign at both bounds,
/// [`NumericsError::NonFinite`] if `f` returns NaN or infinity, and
/// [`NumericsError::NonConvergence`] when the iteration cap is reached.
pub fn brent<F>(f: F, lower: f64, upper: f64, config: &SolverConfig) -> Result<Root, NumericsError>
where
    F: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower == upper {
        return Err(NumericsError::InvalidBracket { lower, upper });
    }

    let (mut a, mut b) = (lower, upper);
    let mut fa = evaluate(&f, a)?;
    let mut fb = evaluate(&f, b)?;

    if fa == 0.0 {
        return Ok(Root {
            x: a,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(Root {
            x: b,
            residual: 0.0,
            iterations: 0,
        });
    }
    if fa.signum() == fb.signum() {
        return Err(NumericsError::NoSignChange {
            lower,
            upper,
            f_lower: fa,
            f_upper: fb,
        });
    }

    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iters() {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + config.tolerance_at(b);
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return Ok(Root {
                x: b,
                residual: fb,
                iterations: iteration,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }

            let interpolation_limit = (3.0 * m * q - (tol * q).abs()).min((e * q).abs());
            if 2.0 * p < interpolation_limit {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = evaluate(&f, b)?;
    }

    Err(NumericsError::NonConvergence {
        iterations: config.max_iters(),
        width: (c - b).abs(),
    })
}
