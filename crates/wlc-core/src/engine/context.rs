use super::config::ConvergenceConfig;
use super::error::{EngineError, SolverStage};
use super::progress::ProgressReporter;
use super::state::CavityParams;
use super::workspace::{CavityWorkspace, CouplingKernel};

/// Everything a solver task reads during one cavity query.
///
/// The kernel and the field factors are derived from the parameters once, so every
/// fixed-point iteration only performs matrix-vector products.
pub struct SolveContext<'a> {
    pub workspace: &'a CavityWorkspace,
    pub params: CavityParams,
    pub convergence: &'a ConvergenceConfig,
    pub reporter: &'a ProgressReporter<'a>,
    kernel: CouplingKernel,
    field: Vec<f64>,
}

impl<'a> SolveContext<'a> {
    pub fn new(
        workspace: &'a CavityWorkspace,
        params: CavityParams,
        convergence: &'a ConvergenceConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Result<Self, EngineError> {
        params.validate()?;

        let kernel = workspace.coupling_kernel(params.jb);
        let field = workspace.field_factors(params.force, params.bb);
        if !kernel.is_finite() || field.iter().any(|e| !e.is_finite()) {
            return Err(EngineError::NonFinite {
                stage: SolverStage::Marginal,
                iteration: 0,
            });
        }

        Ok(Self {
            workspace,
            params,
            convergence,
            reporter,
            kernel,
            field,
        })
    }

    pub fn kernel(&self) -> &CouplingKernel {
        &self.kernel
    }

    /// `exp(f cos(theta_i) bB)` per grid point.
    pub fn field(&self) -> &[f64] {
        &self.field
    }

    pub fn len(&self) -> usize {
        self.workspace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspace.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        self.workspace.grid().weights()
    }

    pub fn cos_thetas(&self) -> &[f64] {
        self.workspace.grid().cos_thetas()
    }
}
