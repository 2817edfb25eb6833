use crate::engine::config::CavityConfig;
use crate::engine::context::SolveContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::CavityParams;
use crate::engine::tasks::{gradient, marginal, observables};
use crate::engine::workspace::CavityWorkspace;
use tracing::{info, instrument};

/// Elongation of the discrete chain and its response to the couplings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CavityResponse {
    pub elongation: f64,
    pub d_elongation_d_bb: f64,
    pub d_elongation_d_jb: f64,
    pub correlation_length: f64,
}

/// Relative elongation `rho(F)` of the discrete chain at the cavity fixed point.
///
/// # Errors
///
/// Fails on an invalid configuration or non-finite parameters, when the fixed-point
/// iteration does not converge within the configured cap, and when the partition
/// function overflows.
#[instrument(skip_all, name = "cavity_elongation_workflow")]
pub fn elongation(
    params: &CavityParams,
    config: &CavityConfig,
    reporter: &ProgressReporter,
) -> Result<f64, EngineError> {
    config.validate()?;
    params.validate()?;
    info!(
        force = params.force,
        bb = params.bb,
        jb = params.jb,
        "Solving cavity marginal."
    );

    reporter.report(Progress::PhaseStart { name: "Setup" });
    let workspace = CavityWorkspace::new(&config.grid)?;
    let context = SolveContext::new(&workspace, *params, &config.convergence, reporter)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Marginal" });
    let solution = marginal::run(&context)?;
    let rho = observables::elongation(&context, &solution.marginal)?;
    reporter.report(Progress::PhaseFinish);

    info!(
        rho,
        iterations = solution.iterations,
        "Cavity elongation complete."
    );
    Ok(rho)
}

/// Elongation, its derivatives in `bB` and `JB`, and the correlation length.
///
/// # Errors
///
/// As [`elongation`], plus a domain error when the correlation length is undefined
/// (for instance at zero force).
#[instrument(skip_all, name = "cavity_gradient_workflow")]
pub fn elongation_with_gradient(
    params: &CavityParams,
    config: &CavityConfig,
    reporter: &ProgressReporter,
) -> Result<CavityResponse, EngineError> {
    config.validate()?;
    params.validate()?;
    info!(
        force = params.force,
        bb = params.bb,
        jb = params.jb,
        "Solving cavity marginal with gradient."
    );

    reporter.report(Progress::PhaseStart { name: "Setup" });
    let workspace = CavityWorkspace::new(&config.grid)?;
    let context = SolveContext::new(&workspace, *params, &config.convergence, reporter)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart { name: "Gradient" });
    let solution = gradient::run(&context)?;
    let observed =
        observables::elongation_gradient(&context, &solution.marginal, &solution.gradient)?;
    let correlation_length = observables::correlation_length(params, &observed)?;
    reporter.report(Progress::PhaseFinish);

    let response = CavityResponse {
        elongation: observed.elongation,
        d_elongation_d_bb: observed.d_elongation_d_bb,
        d_elongation_d_jb: observed.d_elongation_d_jb,
        correlation_length,
    };
    info!(
        rho = response.elongation,
        xi = response.correlation_length,
        iterations = solution.iterations,
        "Cavity gradient complete."
    );
    Ok(response)
}

/// [`elongation`] with the default configuration and no progress reporting.
pub fn cavity_elongation(force: f64, bb: f64, jb: f64) -> Result<f64, EngineError> {
    elongation(
        &CavityParams::new(force, bb, jb),
        &CavityConfig::default(),
        &ProgressReporter::new(),
    )
}

/// [`elongation_with_gradient`] with the default configuration and no progress
/// reporting.
pub fn cavity_elongation_with_gradient(
    force: f64,
    bb: f64,
    jb: f64,
) -> Result<CavityResponse, EngineError> {
    elongation_with_gradient(
        &CavityParams::new(force, bb, jb),
        &CavityConfig::default(),
        &ProgressReporter::new(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::CavityConfigBuilder;
    use std::sync::Mutex;

    #[test]
    fn default_entry_points_agree() {
        let rho = cavity_elongation(1.0, 1.0, 0.5).unwrap();
        let response = cavity_elongation_with_gradient(1.0, 1.0, 0.5).unwrap();
        assert!((rho - response.elongation).abs() < 1e-5);
        assert!((rho - 0.4036).abs() < 1e-4);
    }

    #[test]
    fn invalid_configuration_is_rejected_before_solving() {
        let mut config = CavityConfig::default();
        config.grid.n_theta = 0;
        let result = elongation(
            &CavityParams::new(1.0, 1.0, 1.0),
            &config,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        assert!(matches!(
            cavity_elongation(f64::NAN, 1.0, 1.0),
            Err(EngineError::InvalidParameter { name: "force", .. })
        ));
    }

    #[test]
    fn gradient_at_zero_force_is_a_domain_error() {
        assert!(matches!(
            cavity_elongation_with_gradient(0.0, 1.0, 1.0),
            Err(EngineError::Domain { .. })
        ));
    }

    #[test]
    fn coarser_grid_still_yields_a_physical_elongation() {
        let config = CavityConfigBuilder::new().n_theta(6).n_phi(8).build().unwrap();
        let rho = elongation(
            &CavityParams::new(2.0, 1.0, 1.0),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(rho > 0.0 && rho < 1.0);
    }

    #[test]
    fn phases_are_reported_in_order() {
        let events = Mutex::new(Vec::new());
        {
            let reporter = ProgressReporter::with_callback(Box::new(|event| {
                if matches!(event, Progress::PhaseStart { .. } | Progress::PhaseFinish) {
                    events.lock().unwrap().push(event);
                }
            }));
            elongation(
                &CavityParams::new(1.0, 1.0, 1.0),
                &CavityConfig::default(),
                &reporter,
            )
            .unwrap();
        }
        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "Setup" },
                Progress::PhaseFinish,
                Progress::PhaseStart { name: "Marginal" },
                Progress::PhaseFinish,
            ]
        );
    }
}
