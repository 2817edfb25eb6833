use super::{CommandContext, render};
use crate::cli::{FRhoArgs, RhoFArgs};
use crate::error::Result;
use tracing::info;
use wlc::core::polymer::{exact, units};

pub fn rho_f(args: &RhoFArgs, context: &CommandContext) -> Result<String> {
    let temperature = context.temperature()?;
    let force = match temperature {
        Some(t) => units::from_piconewton(args.force, t),
        None => args.force,
    };
    info!(force, lpb = args.lpb, "Computing exact elongation.");

    let rho = exact::elongation(force, args.lpb)?;
    Ok(render(
        context.verbose,
        &[("F", force), ("lpb", args.lpb)],
        &[("rho", rho)],
    ))
}

pub fn f_rho(args: &FRhoArgs, context: &CommandContext) -> Result<String> {
    let temperature = context.temperature()?;
    info!(rho = args.rho, lpb = args.lpb, "Computing exact force.");

    let mut force = exact::force(args.rho, args.lpb)?;
    if let Some(t) = temperature {
        force = units::to_piconewton(force, t);
    }
    Ok(render(
        context.verbose,
        &[("rho", args.rho), ("lpb", args.lpb)],
        &[("F", force)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::file::FileConfig;
    use crate::error::CliError;
    use crate::ui::UiManager;

    fn run_rho_f(force: f64, temperature: Option<f64>, verbose: bool) -> Result<String> {
        let file_config = FileConfig::default();
        let ui = UiManager::new(true);
        let context = CommandContext {
            verbose,
            temperature,
            file_config: &file_config,
            ui: &ui,
        };
        rho_f(&RhoFArgs { force, lpb: 50.0 }, &context)
    }

    fn run_f_rho(rho: f64, temperature: Option<f64>) -> Result<String> {
        let file_config = FileConfig::default();
        let ui = UiManager::new(true);
        let context = CommandContext {
            verbose: false,
            temperature,
            file_config: &file_config,
            ui: &ui,
        };
        f_rho(&FRhoArgs { rho, lpb: 50.0 }, &context)
    }

    #[test]
    fn rho_f_prints_reference_value() {
        assert_eq!(run_rho_f(10.0, None, false).unwrap(), "9.77639e-01");
    }

    #[test]
    fn rho_f_verbose_output_labels_inputs() {
        assert_eq!(
            run_rho_f(10.0, None, true).unwrap(),
            "F = 1.00000e+01 lpb = 5.00000e+01 rho = 9.77639e-01"
        );
    }

    #[test]
    fn temperature_converts_input_force_from_piconewton() {
        let kt = units::thermal_energy(298.0);
        let in_pn = run_rho_f(10.0 * kt, Some(298.0), false).unwrap();
        assert_eq!(in_pn, run_rho_f(10.0, None, false).unwrap());
    }

    #[test]
    fn f_rho_saturates_at_full_extension() {
        assert_eq!(run_f_rho(1.0, None).unwrap(), "2.55900e+02");
    }

    #[test]
    fn f_rho_reports_piconewton_with_temperature() {
        let in_kt: f64 = run_f_rho(0.9, None).unwrap().parse().unwrap();
        let in_pn: f64 = run_f_rho(0.9, Some(298.0)).unwrap().parse().unwrap();
        let expected = units::to_piconewton(in_kt, 298.0);
        assert!((in_pn - expected).abs() < 2e-5 * expected);
    }

    #[test]
    fn negative_force_is_a_model_error() {
        assert!(matches!(
            run_rho_f(-1.0, None, false),
            Err(CliError::Model(_))
        ));
    }
}
