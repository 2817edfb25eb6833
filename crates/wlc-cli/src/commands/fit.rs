use super::{CommandContext, render};
use crate::cli::FitArgs;
use crate::config::build_fit_settings;
use crate::error::Result;
use tracing::{debug, info};
use wlc::core::io::columns::Dataset;
use wlc::core::polymer::units;
use wlc::engine::progress::ProgressReporter;
use wlc::workflows::fit::marko_fit;

pub fn run(args: &FitArgs, context: &CommandContext) -> Result<String> {
    let temperature = context.temperature()?;
    let settings = build_fit_settings(args, context.file_config)?;

    let mut data = Dataset::load(&args.data)?;
    info!(points = data.len(), path = %args.data.display(), "Loaded force-extension data.");

    if let Some(t) = temperature {
        debug!(temperature = t, "Converting forces and uncertainties from pN.");
        for value in data.y.iter_mut().chain(data.sigma.iter_mut()) {
            *value = units::from_piconewton(*value, t);
        }
    }

    let reporter = ProgressReporter::with_callback(context.ui.callback());
    let report = marko_fit(
        &data,
        [args.lpb, args.contour_length],
        settings.variant,
        &settings.config,
        &reporter,
    )?;

    let mut results = vec![
        ("lpb", report.persistence_length),
        ("lpb_err", report.persistence_length_error),
        ("L", report.contour_length),
        ("L_err", report.contour_length_error),
    ];
    if context.verbose {
        results.push(("chi2_dof", report.result.reduced_chi_squared()));
    }

    Ok(render(
        context.verbose,
        &[("lpb0", args.lpb), ("L0", args.contour_length)],
        &results,
    ))
}
