use crate::core::io::columns::Dataset;
use nalgebra::{DMatrix, DVector};
use std::error::Error as StdError;
use thiserror::Error;
use tracing::{debug, trace};

const INITIAL_DAMPING: f64 = 1e-3;
const MAX_DAMPING: f64 = 1e20;

/// A model `y = f(x; p)` with an analytic gradient in its parameters.
pub trait FitModel {
    type Error: StdError + Send + Sync + 'static;

    fn parameter_count(&self) -> usize;

    fn value(&self, x: f64, params: &DVector<f64>) -> Result<f64, Self::Error>;

    /// Partial derivatives `df/dp_j` at `x`, one per parameter.
    fn gradient(&self, x: f64, params: &DVector<f64>) -> Result<DVector<f64>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum FitError {
    #[error("Invalid fit configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("Expected {expected} initial parameters, got {found}")]
    ParameterCount { expected: usize, found: usize },

    #[error("{points} data points cannot constrain {parameters} parameters")]
    TooFewPoints { points: usize, parameters: usize },

    #[error("Model evaluation failed at x = {x}: {source}")]
    Model {
        x: f64,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Model produced a non-finite residual or gradient at x = {x}")]
    NonFinite { x: f64 },

    #[error("Normal equations are singular; parameters are not identifiable from the data")]
    Singular,
}

/// Stopping criteria of the Levenberg-Marquardt iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitConfig {
    pub max_iterations: usize,
    /// A step is negligible when `|dp_i| < eps_abs + eps_rel * |p_i|` for every `i`.
    pub eps_abs: f64,
    pub eps_rel: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iterations: 400,
            eps_abs: 1e-4,
            eps_rel: 1e-4,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.max_iterations == 0 {
            return Err(FitError::InvalidConfig("max_iterations must be at least 1"));
        }
        if !self.eps_abs.is_finite() || self.eps_abs < 0.0 {
            return Err(FitError::InvalidConfig("eps_abs must be finite and non-negative"));
        }
        if !self.eps_rel.is_finite() || self.eps_rel < 0.0 {
            return Err(FitError::InvalidConfig("eps_rel must be finite and non-negative"));
        }
        if self.eps_abs == 0.0 && self.eps_rel == 0.0 {
            return Err(FitError::InvalidConfig(
                "at least one of eps_abs and eps_rel must be positive",
            ));
        }
        Ok(())
    }

    fn step_is_negligible(&self, step: &DVector<f64>, params: &DVector<f64>) -> bool {
        step.iter()
            .zip(params.iter())
            .all(|(dp, p)| dp.abs() < self.eps_abs + self.eps_rel * p.abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStatus {
    Converged,
    /// The iteration cap was reached; the parameters are the best found so far.
    MaxIterations,
    /// No damping level reduced chi-squared any further.
    NoProgress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub parameters: DVector<f64>,
    /// Standard errors, scaled by `max(1, sqrt(chi2 / dof))`.
    pub errors: DVector<f64>,
    /// `(J^T J)^-1` at the final parameters, unscaled.
    pub covariance: DMatrix<f64>,
    pub chi_squared: f64,
    pub degrees_of_freedom: usize,
    pub iterations: usize,
    pub status: FitStatus,
}

impl FitResult {
    pub fn reduced_chi_squared(&self) -> f64 {
        if self.degrees_of_freedom == 0 {
            f64::NAN
        } else {
            self.chi_squared / self.degrees_of_freedom as f64
        }
    }
}

struct Linearization {
    residuals: DVector<f64>,
    jacobian: DMatrix<f64>,
}

impl Linearization {
    fn chi_squared(&self) -> f64 {
        self.residuals.norm_squared()
    }
}

/// Fits `model` to `data` by minimizing `sum(((f(x_i) - y_i) / sigma_i)^2)`.
///
/// Each iteration solves the damped normal equations
/// `(J^T J + lambda diag(J^T J)) dp = -J^T r`; the damping `lambda` shrinks tenfold
/// after an accepted step and grows tenfold after a rejected one. Trial points where
/// the model fails are treated as rejected steps.
pub fn fit<M>(
    model: &M,
    data: &Dataset,
    initial: &[f64],
    config: &FitConfig,
) -> Result<FitResult, FitError>
where
    M: FitModel,
{
    config.validate()?;
    let parameter_count = model.parameter_count();
    if initial.len() != parameter_count {
        return Err(FitError::ParameterCount {
            expected: parameter_count,
            found: initial.len(),
        });
    }
    if data.len() < parameter_count {
        return Err(FitError::TooFewPoints {
            points: data.len(),
            parameters: parameter_count,
        });
    }

    let mut params = DVector::from_column_slice(initial);
    let mut current = linearize(model, data, &params)?;
    let mut chi_squared = current.chi_squared();
    let mut damping = INITIAL_DAMPING;
    let mut status = FitStatus::MaxIterations;
    let mut iterations = 0;

    'outer: for iteration in 1..=config.max_iterations {
        iterations = iteration;
        let jtj = current.jacobian.transpose() * &current.jacobian;
        let descent = -(current.jacobian.transpose() * &current.residuals);

        let step = loop {
            let mut damped = jtj.clone();
            for i in 0..parameter_count {
                let diagonal = jtj[(i, i)];
                damped[(i, i)] = diagonal + damping * diagonal.max(f64::EPSILON);
            }

            let Some(step) = damped.cholesky().map(|c| c.solve(&descent)) else {
                damping *= 10.0;
                if damping > MAX_DAMPING {
                    return Err(FitError::Singular);
                }
                continue;
            };

            let trial_params = &params + &step;
            if let Ok(trial) = linearize(model, data, &trial_params) {
                let trial_chi_squared = trial.chi_squared();
                if trial_chi_squared < chi_squared {
                    params = trial_params;
                    current = trial;
                    chi_squared = trial_chi_squared;
                    damping = (damping / 10.0).max(f64::EPSILON);
                    break step;
                }
            }

            if config.step_is_negligible(&step, &params) {
                status = FitStatus::Converged;
                break 'outer;
            }
            damping *= 10.0;
            if damping > MAX_DAMPING {
                status = FitStatus::NoProgress;
                break 'outer;
            }
        };

        trace!(iteration, chi_squared, damping, "Accepted Levenberg-Marquardt step.");

        if config.step_is_negligible(&step, &params) {
            status = FitStatus::Converged;
            break;
        }
    }

    let jtj = current.jacobian.transpose() * &current.jacobian;
    let covariance = jtj.try_inverse().ok_or(FitError::Singular)?;
    let degrees_of_freedom = data.len() - parameter_count;
    let scale = if degrees_of_freedom > 0 {
        (chi_squared / degrees_of_freedom as f64).sqrt().max(1.0)
    } else {
        1.0
    };
    let errors = DVector::from_iterator(
        parameter_count,
        (0..parameter_count).map(|i| scale * covariance[(i, i)].max(0.0).sqrt()),
    );

    debug!(
        ?status,
        iterations,
        chi_squared,
        degrees_of_freedom,
        "Levenberg-Marquardt fit finished."
    );

    Ok(FitResult {
        parameters: params,
        errors,
        covariance,
        chi_squared,
        degrees_of_freedom,
        iterations,
        status,
    })
}

fn linearize<M>(model: &M, data: &Dataset, params: &DVector<f64>) -> Result<Linearization, FitError>
where
    M: FitModel,
{
    let n = data.len();
    let p = model.parameter_count();
    let mut residuals = DVector::zeros(n);
    let mut jacobian = DMatrix::zeros(n, p);

    for i in 0..n {
        let (x, y, sigma) = (data.x[i], data.y[i], data.sigma[i]);
        let model_error = |e: M::Error| FitError::Model {
            x,
            source: Box::new(e),
        };

        let value = model.value(x, params).map_err(model_error)?;
        let gradient = model.gradient(x, params).map_err(model_error)?;

        residuals[i] = (value - y) / sigma;
        for j in 0..p {
            jacobian[(i, j)] = gradient[j] / sigma;
        }
        if !residuals[i].is_finite() || jacobian.row(i).iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFinite { x });
        }
    }

    Ok(Linearization {
        residuals,
        jacobian,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct Exponential;

    impl FitModel for Exponential {
        type Error = Infallible;

        fn parameter_count(&self) -> usize {
            2
        }

        fn value(&self, x: f64, params: &DVector<f64>) -> Result<f64, Infallible> {
            Ok(params[0] * (-params[1] * x).exp())
        }

        fn gradient(&self, x: f64, params: &DVector<f64>) -> Result<DVector<f64>, Infallible> {
            let e = (-params[1] * x).exp();
            Ok(DVector::from_vec(vec![e, -params[0] * x * e]))
        }
    }

    fn exponential_data(amplitude: f64, rate: f64) -> Dataset {
        let mut data = Dataset::new();
        for i in 0..20 {
            let x = i as f64 * 0.25;
            data.push(x, amplitude * (-rate * x).exp(), 0.1);
        }
        data
    }

    #[test]
    fn recovers_parameters_of_noise_free_data() {
        let data = exponential_data(3.0, 0.7);
        let config = FitConfig {
            eps_abs: 1e-10,
            eps_rel: 1e-10,
            ..FitConfig::default()
        };

        let result = fit(&Exponential, &data, &[1.0, 0.2], &config).unwrap();

        assert_eq!(result.status, FitStatus::Converged);
        assert!((result.parameters[0] - 3.0).abs() < 1e-6);
        assert!((result.parameters[1] - 0.7).abs() < 1e-6);
        assert!(result.chi_squared < 1e-10);
        assert_eq!(result.degrees_of_freedom, 18);
    }

    #[test]
    fn errors_come_from_covariance_diagonal() {
        let mut data = exponential_data(2.0, 0.5);
        for (i, y) in data.y.iter_mut().enumerate() {
            *y += if i % 2 == 0 { 0.05 } else { -0.05 };
        }

        let result = fit(&Exponential, &data, &[2.0, 0.5], &FitConfig::default()).unwrap();

        let scale = result.reduced_chi_squared().sqrt().max(1.0);
        for i in 0..2 {
            let expected = scale * result.covariance[(i, i)].sqrt();
            assert!((result.errors[i] - expected).abs() < 1e-15);
        }
        assert!(result.chi_squared > 0.0);
    }

    #[test]
    fn wrong_number_of_initial_parameters_is_rejected() {
        let data = exponential_data(1.0, 1.0);
        let result = fit(&Exponential, &data, &[1.0], &FitConfig::default());
        assert!(matches!(
            result,
            Err(FitError::ParameterCount {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn too_few_points_are_rejected() {
        let mut data = Dataset::new();
        data.push(0.0, 1.0, 1.0);
        let result = fit(&Exponential, &data, &[1.0, 1.0], &FitConfig::default());
        assert!(matches!(result, Err(FitError::TooFewPoints { .. })));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let data = exponential_data(1.0, 1.0);
        let config = FitConfig {
            max_iterations: 0,
            ..FitConfig::default()
        };
        assert!(matches!(
            fit(&Exponential, &data, &[1.0, 1.0], &config),
            Err(FitError::InvalidConfig(_))
        ));
    }
}
