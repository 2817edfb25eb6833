use crate::core::quadrature::QuadratureOptions;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Grid dimension '{0}' must be at least 1")]
    ZeroGridDimension(&'static str),

    #[error("Tolerance '{name}' must be positive and finite, got {value}")]
    InvalidTolerance { name: &'static str, value: f64 },

    #[error("Iteration cap '{0}' must be at least 1")]
    ZeroIterations(&'static str),
}

/// Resolution of the orientation grid and polishing of its quadrature nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub n_theta: usize,
    pub n_phi: usize,
    pub quadrature_tolerance: f64,
    pub quadrature_max_iterations: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n_theta: 15,
            n_phi: 15,
            quadrature_tolerance: 1e-14,
            quadrature_max_iterations: 100,
        }
    }
}

impl GridConfig {
    pub fn quadrature_options(&self) -> QuadratureOptions {
        QuadratureOptions {
            tolerance: self.quadrature_tolerance,
            max_iterations: self.quadrature_max_iterations,
        }
    }
}

/// Stopping criteria of the marginal fixed-point iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceConfig {
    /// Upper bound on the L1 change between successive iterates.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CavityConfig {
    pub grid: GridConfig,
    pub convergence: ConvergenceConfig,
}

impl CavityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.n_theta == 0 {
            return Err(ConfigError::ZeroGridDimension("n_theta"));
        }
        if self.grid.n_phi == 0 {
            return Err(ConfigError::ZeroGridDimension("n_phi"));
        }
        check_tolerance("quadrature_tolerance", self.grid.quadrature_tolerance)?;
        if self.grid.quadrature_max_iterations == 0 {
            return Err(ConfigError::ZeroIterations("quadrature_max_iterations"));
        }
        check_tolerance("tolerance", self.convergence.tolerance)?;
        if self.convergence.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations("max_iterations"));
        }
        Ok(())
    }
}

fn check_tolerance(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTolerance { name, value })
    }
}

/// Builds a validated [`CavityConfig`]; unset fields keep their defaults.
#[derive(Default)]
pub struct CavityConfigBuilder {
    n_theta: Option<usize>,
    n_phi: Option<usize>,
    quadrature_tolerance: Option<f64>,
    quadrature_max_iterations: Option<usize>,
    tolerance: Option<f64>,
    max_iterations: Option<usize>,
}

impl CavityConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_theta(mut self, n: usize) -> Self {
        self.n_theta = Some(n);
        self
    }
    pub fn n_phi(mut self, n: usize) -> Self {
        self.n_phi = Some(n);
        self
    }
    pub fn quadrature_tolerance(mut self, tolerance: f64) -> Self {
        self.quadrature_tolerance = Some(tolerance);
        self
    }
    pub fn quadrature_max_iterations(mut self, iterations: usize) -> Self {
        self.quadrature_max_iterations = Some(iterations);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<CavityConfig, ConfigError> {
        let grid_defaults = GridConfig::default();
        let convergence_defaults = ConvergenceConfig::default();

        let config = CavityConfig {
            grid: GridConfig {
                n_theta: self.n_theta.unwrap_or(grid_defaults.n_theta),
                n_phi: self.n_phi.unwrap_or(grid_defaults.n_phi),
                quadrature_tolerance: self
                    .quadrature_tolerance
                    .unwrap_or(grid_defaults.quadrature_tolerance),
                quadrature_max_iterations: self
                    .quadrature_max_iterations
                    .unwrap_or(grid_defaults.quadrature_max_iterations),
            },
            convergence: ConvergenceConfig {
                tolerance: self.tolerance.unwrap_or(convergence_defaults.tolerance),
                max_iterations: self
                    .max_iterations
                    .unwrap_or(convergence_defaults.max_iterations),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
