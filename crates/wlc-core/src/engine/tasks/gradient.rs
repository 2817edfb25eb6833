use super::{cavity_step, report_iteration};
use crate::engine::context::SolveContext;
use crate::engine::error::{EngineError, SolverStage};
use crate::engine::progress::Progress;
use crate::engine::state::{DoubleBuffer, Marginal, MarginalGradient, weighted_sum};
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct GradientSolution {
    pub marginal: Marginal,
    pub gradient: MarginalGradient,
    pub iterations: usize,
    pub residual: f64,
}

/// Scratch vectors for the three cavity integrals of one iteration.
struct Integrals {
    value: Vec<f64>,
    d_bb: Vec<f64>,
    d_jb: Vec<f64>,
    scratch: Vec<f64>,
}

impl Integrals {
    fn new(n: usize) -> Self {
        Self {
            value: vec![0.0; n],
            d_bb: vec![0.0; n],
            d_jb: vec![0.0; n],
            scratch: vec![0.0; n],
        }
    }
}

/// Iterates the marginal together with its `bB` and `JB` derivatives.
///
/// Convergence requires the summed L1 change of all three quantities to drop to the
/// tolerance.
#[instrument(skip_all, name = "gradient_task")]
pub fn run(context: &SolveContext) -> Result<GradientSolution, EngineError> {
    let n = context.len();
    let max_iterations = context.convergence.max_iterations;
    let tolerance = context.convergence.tolerance;

    context.reporter.report(Progress::TaskStart {
        total: max_iterations as u64,
    });

    let mut marginals = DoubleBuffer::new(Marginal::uniform(n));
    let mut gradients = DoubleBuffer::new(MarginalGradient::uniform(n));
    let mut integrals = Integrals::new(n);
    let mut residual = f64::INFINITY;

    for iteration in 1..=max_iterations {
        let (previous, next) = marginals.split();
        let z = cavity_step(
            context,
            previous.values(),
            &mut integrals.value,
            next.values_mut(),
            SolverStage::Gradient,
            iteration,
        )?;

        let (previous_gradient, next_gradient) = gradients.split();
        gradient_step(
            context,
            previous,
            next,
            previous_gradient,
            next_gradient,
            &mut integrals,
            z,
            iteration,
        )?;

        residual = next.l1_distance(previous) + next_gradient.l1_distance(previous_gradient);
        marginals.swap();
        gradients.swap();

        trace!(iteration, residual, "Gradient iteration.");
        report_iteration(context, SolverStage::Gradient, iteration, residual);

        if residual <= tolerance {
            context.reporter.report(Progress::TaskFinish);
            debug!(iterations = iteration, residual, "Gradient iteration converged.");
            return Ok(GradientSolution {
                marginal: marginals.into_current(),
                gradient: gradients.into_current(),
                iterations: iteration,
                residual,
            });
        }
    }

    context.reporter.report(Progress::TaskFinish);
    Err(EngineError::NonConvergence {
        stage: SolverStage::Gradient,
        iterations: max_iterations,
        residual,
    })
}

#[allow(clippy::too_many_arguments)]
fn gradient_step(
    context: &SolveContext,
    previous: &Marginal,
    next: &Marginal,
    previous_gradient: &MarginalGradient,
    next_gradient: &mut MarginalGradient,
    integrals: &mut Integrals,
    z: f64,
    iteration: usize,
) -> Result<(), EngineError> {
    let kernel = context.kernel();
    kernel.apply(&previous_gradient.d_bb, &mut integrals.d_bb);
    kernel.apply_scaled(context.workspace.table(), previous.values(), &mut integrals.d_jb);
    kernel.apply(&previous_gradient.d_jb, &mut integrals.scratch);
    for (d, s) in integrals.d_jb.iter_mut().zip(&integrals.scratch) {
        *d += s;
    }

    let force = context.params.force;
    for i in 0..context.len() {
        let e = context.field()[i];
        let c = context.cos_thetas()[i];
        next_gradient.d_bb[i] = e * (force * c * integrals.value[i] + integrals.d_bb[i]);
        next_gradient.d_jb[i] = e * integrals.d_jb[i];
    }

    let z_bb = weighted_sum(context.weights(), &next_gradient.d_bb);
    let z_jb = weighted_sum(context.weights(), &next_gradient.d_jb);
    if !z_bb.is_finite() || !z_jb.is_finite() {
        return Err(EngineError::NonFinite {
            stage: SolverStage::Gradient,
            iteration,
        });
    }

    // `next` is already divided by z.
    for (i, &m) in next.values().iter().enumerate() {
        next_gradient.d_bb[i] = next_gradient.d_bb[i] / z - m * z_bb / z;
        next_gradient.d_jb[i] = next_gradient.d_jb[i] / z - m * z_jb / z;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{ConvergenceConfig, GridConfig};
    use crate::engine::progress::ProgressReporter;
    use crate::engine::state::CavityParams;
    use crate::engine::tasks::marginal;
    use crate::engine::workspace::CavityWorkspace;

    fn tight() -> ConvergenceConfig {
        ConvergenceConfig {
            tolerance: 1e-11,
            max_iterations: 2000,
        }
    }

    #[test]
    fn gradient_marginal_agrees_with_plain_marginal() {
        let workspace = CavityWorkspace::new(&GridConfig::default()).unwrap();
        let reporter = ProgressReporter::new();
        let convergence = tight();
        let context = SolveContext::new(
            &workspace,
            CavityParams::new(1.0, 1.0, 0.5),
            &convergence,
            &reporter,
        )
        .unwrap();

        let plain = marginal::run(&context).unwrap();
        let extended = run(&context).unwrap();
        assert!(plain.marginal.l1_distance(&extended.marginal) < 1e-10);
        assert!(extended.iterations >= plain.iterations);
    }

    #[test]
    fn marginal_derivatives_integrate_to_zero() {
        let workspace = CavityWorkspace::new(&GridConfig::default()).unwrap();
        let reporter = ProgressReporter::new();
        let convergence = tight();
        let context = SolveContext::new(
            &workspace,
            CavityParams::new(0.5, 1.0, 2.0),
            &convergence,
            &reporter,
        )
        .unwrap();

        let solution = run(&context).unwrap();
        let weights = workspace.grid().weights();
        assert!(weighted_sum(weights, &solution.gradient.d_bb).abs() < 1e-10);
        assert!(weighted_sum(weights, &solution.gradient.d_jb).abs() < 1e-10);
    }

    #[test]
    fn marginal_derivative_matches_finite_difference() {
        let workspace = CavityWorkspace::new(&GridConfig::default()).unwrap();
        let reporter = ProgressReporter::new();
        let convergence = tight();
        let (force, bb, jb, h) = (0.5, 1.0, 1.0, 1e-5);

        let solve_plain = |bb: f64, jb: f64| {
            let context =
                SolveContext::new(&workspace, CavityParams::new(force, bb, jb), &convergence, &reporter)
                    .unwrap();
            marginal::run(&context).unwrap().marginal
        };
        let context =
            SolveContext::new(&workspace, CavityParams::new(force, bb, jb), &convergence, &reporter)
                .unwrap();
        let solution = run(&context).unwrap();

        let (bb_plus, bb_minus) = (solve_plain(bb + h, jb), solve_plain(bb - h, jb));
        let (jb_plus, jb_minus) = (solve_plain(bb, jb + h), solve_plain(bb, jb - h));
        for i in [0, 17, 112, 224] {
            let numeric_bb = (bb_plus.values()[i] - bb_minus.values()[i]) / (2.0 * h);
            let numeric_jb = (jb_plus.values()[i] - jb_minus.values()[i]) / (2.0 * h);
            assert!((numeric_bb - solution.gradient.d_bb[i]).abs() < 1e-5);
            assert!((numeric_jb - solution.gradient.d_jb[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn single_iteration_cap_reports_gradient_non_convergence() {
        let workspace = CavityWorkspace::new(&GridConfig::default()).unwrap();
        let reporter = ProgressReporter::new();
        let convergence = ConvergenceConfig {
            tolerance: 1e-5,
            max_iterations: 1,
        };
        let context = SolveContext::new(
            &workspace,
            CavityParams::new(1.0, 1.0, 1.0),
            &convergence,
            &reporter,
        )
        .unwrap();

        assert!(matches!(
            run(&context),
            Err(EngineError::NonConvergence {
                stage: SolverStage::Gradient,
                iterations: 1,
                ..
            })
        ));
    }
}
