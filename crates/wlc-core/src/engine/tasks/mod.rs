//! Fixed-point solver tasks of the cavity method.
//!
//! [`marginal`] iterates the orientation marginal alone, [`gradient`] additionally
//! carries its derivatives with respect to `bB` and `JB`, and [`observables`] reduces
//! a converged state to the elongation, its gradient and the correlation length.

pub mod gradient;
pub mod marginal;
pub mod observables;

use super::context::SolveContext;
use super::error::{EngineError, SolverStage};
use super::progress::Progress;
use super::state::weighted_sum;

const STATUS_INTERVAL: usize = 10;

/// One cavity update: `next(i) = E(i) I(i) / Z` with `I = M previous`.
///
/// Leaves the unnormalized cavity integrals in `integrals` and returns `Z`.
fn cavity_step(
    context: &SolveContext,
    previous: &[f64],
    integrals: &mut [f64],
    next: &mut [f64],
    stage: SolverStage,
    iteration: usize,
) -> Result<f64, EngineError> {
    context.kernel().apply(previous, integrals);

    for ((n, &e), &i) in next.iter_mut().zip(context.field()).zip(integrals.iter()) {
        *n = e * i;
    }

    let z = weighted_sum(context.weights(), next);
    if !z.is_finite() || z <= 0.0 {
        return Err(EngineError::NonFinite { stage, iteration });
    }
    for n in next.iter_mut() {
        *n /= z;
    }
    Ok(z)
}

fn report_iteration(context: &SolveContext, stage: SolverStage, iteration: usize, residual: f64) {
    context.reporter.report(Progress::TaskIncrement { amount: 1 });
    if context.reporter.is_active() && iteration % STATUS_INTERVAL == 0 {
        context.reporter.report(Progress::StatusUpdate {
            text: format!("{stage} iteration {iteration}, residual {residual:.3e}"),
        });
    }
}
