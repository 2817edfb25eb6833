use std::f64::consts::PI;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuadratureError {
    #[error("Quadrature requires at least one point")]
    ZeroPoints,

    #[error("Invalid integration interval [{low}, {high}]: bounds must be finite and increasing")]
    InvalidInterval { low: f64, high: f64 },

    #[error("Invalid quadrature options: {0}")]
    InvalidOptions(&'static str),

    #[error(
        "Newton iteration for Legendre root {root_index} did not converge after {iterations} iterations (last step {last_step:e})"
    )]
    NonConvergence {
        root_index: usize,
        iterations: usize,
        last_step: f64,
    },
}

/// Controls the Newton polishing of the Legendre roots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureOptions {
    /// Newton steps at or below this magnitude end the polishing of a root.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraturePoint {
    pub abscissa: f64,
    pub weight: f64,
}

/// An `N`-point Gauss-Legendre rule mapped onto `[low, high]`.
///
/// Abscissae are stored in increasing order and paired index-for-index with their
/// weights. The rule integrates polynomials of degree up to `2N - 1` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussLegendre {
    low: f64,
    high: f64,
    abscissae: Vec<f64>,
    weights: Vec<f64>,
}

impl GaussLegendre {
    /// Computes the rule by Newton iteration on the Legendre polynomial `P_N`.
    ///
    /// Only the first `ceil(N/2)` roots are polished; the remaining half follows from
    /// the symmetry of `P_N` about the interval midpoint.
    ///
    /// # Errors
    ///
    /// Returns [`QuadratureError::ZeroPoints`] for `n == 0`,
    /// [`QuadratureError::InvalidInterval`] unless `low < high` with both finite,
    /// [`QuadratureError::InvalidOptions`] for a non-positive tolerance or a zero
    /// iteration cap, and [`QuadratureError::NonConvergence`] if a root cannot be
    /// polished within the iteration cap.
    pub fn compute(
        low: f64,
        high: f64,
        n: usize,
        options: &QuadratureOptions,
    ) -> Result<Self, QuadratureError> {
        if n == 0 {
            return Err(QuadratureError::ZeroPoints);
        }
        if !low.is_finite() || !high.is_finite() || high <= low {
            return Err(QuadratureError::InvalidInterval { low, high });
        }
        if !options.tolerance.is_finite() || options.tolerance <= 0.0 {
            return Err(QuadratureError::InvalidOptions(
                "tolerance must be positive and finite",
            ));
        }
        if options.max_iterations == 0 {
            return Err(QuadratureError::InvalidOptions(
                "max_iterations must be at least 1",
            ));
        }

        let mid = 0.5 * (high + low);
        let range = 0.5 * (high - low);
        let mut abscissae = vec![0.0; n];
        let mut weights = vec![0.0; n];

        for i in 0..n.div_ceil(2) {
            let mut v = polish_root(n, i, options)?;
            if n % 2 == 1 && i == n / 2 {
                v = 0.0;
            }

            let (_, derivative) = legendre(n, v);
            let weight = 2.0 * range / ((1.0 - v * v) * derivative * derivative);

            abscissae[i] = mid - range * v;
            abscissae[n - 1 - i] = mid + range * v;
            weights[i] = weight;
            weights[n - 1 - i] = weight;
        }

        Ok(Self {
            low,
            high,
            abscissae,
            weights,
        })
    }

    pub fn len(&self) -> usize {
        self.abscissae.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abscissae.is_empty()
    }

    pub fn interval(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn abscissae(&self) -> &[f64] {
        &self.abscissae
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn points(&self) -> impl Iterator<Item = QuadraturePoint> + '_ {
        self.abscissae
            .iter()
            .zip(&self.weights)
            .map(|(&abscissa, &weight)| QuadraturePoint { abscissa, weight })
    }

    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.points().map(|p| p.weight * f(p.abscissa)).sum()
    }
}

fn polish_root(n: usize, i: usize, options: &QuadratureOptions) -> Result<f64, QuadratureError> {
    let mut v = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
    let mut last_step = f64::INFINITY;

    for _ in 0..options.max_iterations {
        let (value, derivative) = legendre(n, v);
        let step = value / derivative;
        v -= step;
        last_step = step.abs();
        if last_step <= options.tolerance {
            return Ok(v);
        }
    }

    Err(QuadratureError::NonConvergence {
        root_index: i,
        iterations: options.max_iterations,
        last_step,
    })
}

/// Returns `(P_n(v), P_n'(v))` from the three-term recurrence.
#[inline]
fn legendre(n: usize, v: f64) -> (f64, f64) {
    let mut current = 1.0;
    let mut previous = 0.0;
    for j in 0..n {
        let jf = j as f64;
        let next = ((2.0 * jf + 1.0) * v * current - jf * previous) / (jf + 1.0);
        previous = current;
        current = next;
    }
    let derivative = n as f64 * (v * current - previous) / (v * v - 1.0);
    (current, derivative)
}
