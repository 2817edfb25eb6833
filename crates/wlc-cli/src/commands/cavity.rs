use super::{CommandContext, render};
use crate::cli::CavityArgs;
use crate::config::build_cavity_config;
use crate::error::Result;
use tracing::{info, warn};
use wlc::engine::progress::ProgressReporter;
use wlc::engine::state::CavityParams;
use wlc::workflows::cavity;

fn prepare(args: &CavityArgs, context: &CommandContext) -> Result<(CavityParams, wlc::engine::config::CavityConfig)> {
    if context.temperature.is_some() {
        warn!("The cavity model works with a reduced force; ignoring the temperature option.");
    }
    let config = build_cavity_config(&args.solver, context.file_config)?;
    info!(
        n_theta = config.grid.n_theta,
        n_phi = config.grid.n_phi,
        tolerance = config.convergence.tolerance,
        max_iterations = config.convergence.max_iterations,
        "Resolved cavity solver configuration."
    );
    Ok((CavityParams::new(args.force, args.bb, args.jb), config))
}

pub fn rho_f(args: &CavityArgs, context: &CommandContext) -> Result<String> {
    let (params, config) = prepare(args, context)?;
    let reporter = ProgressReporter::with_callback(context.ui.callback());

    let rho = cavity::elongation(&params, &config, &reporter)?;
    Ok(render(
        context.verbose,
        &[("F", args.force), ("bB", args.bb), ("JB", args.jb)],
        &[("rho", rho)],
    ))
}

pub fn rho_f_and_gradient(args: &CavityArgs, context: &CommandContext) -> Result<String> {
    let (params, config) = prepare(args, context)?;
    let reporter = ProgressReporter::with_callback(context.ui.callback());

    let response = cavity::elongation_with_gradient(&params, &config, &reporter)?;
    Ok(render(
        context.verbose,
        &[("F", args.force), ("bB", args.bb), ("JB", args.jb)],
        &[
            ("rho", response.elongation),
            ("drho_dbB", response.d_elongation_d_bb),
            ("drho_dJB", response.d_elongation_d_jb),
            ("xi", response.correlation_length),
        ],
    ))
}
