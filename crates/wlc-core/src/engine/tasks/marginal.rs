use super::{cavity_step, report_iteration};
use crate::engine::context::SolveContext;
use crate::engine::error::{EngineError, SolverStage};
use crate::engine::progress::Progress;
use crate::engine::state::{DoubleBuffer, Marginal};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct MarginalSolution {
    pub marginal: Marginal,
    pub iterations: usize,
    pub residual: f64,
}

#[instrument(skip_all, name = "marginal_task")]
pub fn run(context: &SolveContext) -> Result<MarginalSolution, EngineError> {
    let n = context.len();
    let max_iterations = context.convergence.max_iterations;
    let tolerance = context.convergence.tolerance;

    context.reporter.report(Progress::TaskStart {
        total: max_iterations as u64,
    });

    let mut marginals = DoubleBuffer::new(Marginal::uniform(n));
    let mut integrals = vec![0.0; n];
    let mut residual = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let (previous, next) = marginals.split();
        cavity_step(
            context,
            previous.values(),
            &mut integrals,
            next.values_mut(),
            SolverStage::Marginal,
            iteration,
        )?;
        residual = next.l1_distance(previous);
        marginals.swap();

        trace!(iteration, residual, "Marginal iteration.");
        report_iteration(context, SolverStage::Marginal, iteration, residual);

        if residual <= tolerance {
            context.reporter.report(Progress::TaskFinish);
            debug!(iterations = iteration, residual, "Marginal iteration converged.");
            return Ok(MarginalSolution {
                marginal: marginals.into_current(),
                iterations: iteration,
                residual,
            });
        }
    }

    context.reporter.report(Progress::TaskFinish);
    Err(EngineError::NonConvergence {
        stage: SolverStage::Marginal,
        iterations: max_iterations,
        residual,
    })
}
