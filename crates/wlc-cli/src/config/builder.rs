use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{FitArgs, ModelArg, SolverArgs};
use crate::error::{CliError, Result};
use std::path::Path;
use wlc::core::fit::{FitConfig, MarkoVariant};
use wlc::engine::config::{CavityConfig, CavityConfigBuilder};

/// Fit options after merging CLI flags, the config file and the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSettings {
    pub variant: MarkoVariant,
    pub config: FitConfig,
}

/// Reads the optional config file and applies the `--set` overrides.
pub fn load_file_config(path: Option<&Path>, set_values: &[String]) -> Result<FileConfig> {
    let mut file_config = match path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    file_config.apply_set_values(set_values)?;
    Ok(file_config)
}

/// Resolves the cavity solver configuration: CLI flag, then file, then default.
pub fn build_cavity_config(args: &SolverArgs, file_config: &FileConfig) -> Result<CavityConfig> {
    let defaults = DefaultsConfig::default();
    let grid = file_config.grid.clone().unwrap_or_default();
    let convergence = file_config.convergence.clone().unwrap_or_default();

    CavityConfigBuilder::new()
        .n_theta(args.n_theta.or(grid.n_theta).unwrap_or(defaults.n_theta))
        .n_phi(args.n_phi.or(grid.n_phi).unwrap_or(defaults.n_phi))
        .quadrature_tolerance(
            grid.quadrature_tolerance
                .unwrap_or(defaults.quadrature_tolerance),
        )
        .quadrature_max_iterations(
            grid.quadrature_max_iterations
                .unwrap_or(defaults.quadrature_max_iterations),
        )
        .tolerance(
            args.tolerance
                .or(convergence.tolerance)
                .unwrap_or(defaults.tolerance),
        )
        .max_iterations(
            args.max_iterations
                .or(convergence.max_iterations)
                .unwrap_or(defaults.max_iterations),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub fn build_fit_settings(args: &FitArgs, file_config: &FileConfig) -> Result<FitSettings> {
    let defaults = DefaultsConfig::default();
    let fit = file_config.fit.clone().unwrap_or_default();

    let variant = match (args.model, fit.model.as_deref()) {
        (Some(ModelArg::Exact), _) => MarkoVariant::Exact,
        (Some(ModelArg::Interp), _) => MarkoVariant::Interpolation,
        (None, Some(name)) => parse_model(name)?,
        (None, None) => defaults.fit_model,
    };

    let config = FitConfig {
        max_iterations: args
            .max_iterations
            .or(fit.max_iterations)
            .unwrap_or(defaults.fit_max_iterations),
        eps_abs: fit.eps_abs.unwrap_or(defaults.fit_eps_abs),
        eps_rel: fit.eps_rel.unwrap_or(defaults.fit_eps_rel),
    };
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(FitSettings { variant, config })
}

fn parse_model(name: &str) -> Result<MarkoVariant> {
    match name.trim().to_ascii_lowercase().as_str() {
        "exact" => Ok(MarkoVariant::Exact),
        "interp" | "interpolation" => Ok(MarkoVariant::Interpolation),
        other => Err(CliError::Config(format!(
            "Unknown fit model '{}'. Expected 'exact' or 'interp'.",
            other
        ))),
    }
}
