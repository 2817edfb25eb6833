use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileGridConfig {
    #[serde(rename = "n-theta")]
    pub n_theta: Option<usize>,
    #[serde(rename = "n-phi")]
    pub n_phi: Option<usize>,
    #[serde(rename = "quadrature-tolerance")]
    pub quadrature_tolerance: Option<f64>,
    #[serde(rename = "quadrature-max-iterations")]
    pub quadrature_max_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConvergenceConfig {
    pub tolerance: Option<f64>,
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileFitConfig {
    pub model: Option<String>,
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<usize>,
    #[serde(rename = "eps-abs")]
    pub eps_abs: Option<f64>,
    #[serde(rename = "eps-rel")]
    pub eps_rel: Option<f64>,
}

/// Solver settings as read from a TOML file; every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub grid: Option<FileGridConfig>,
    pub convergence: Option<FileConvergenceConfig>,
    pub fit: Option<FileFitConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CliError::FileParsing { source, .. } => CliError::FileParsing {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::FileParsing {
            path: "<inline>".into(),
            source: e.into(),
        })
    }

    /// Applies `KEY=VALUE` overrides on top of the file contents.
    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;

            match key {
                "grid.n-theta" => {
                    self.grid.get_or_insert_with(Default::default).n_theta =
                        Some(parse_value(key, value_str)?);
                }
                "grid.n-phi" => {
                    self.grid.get_or_insert_with(Default::default).n_phi =
                        Some(parse_value(key, value_str)?);
                }
                "grid.quadrature-tolerance" => {
                    self.grid
                        .get_or_insert_with(Default::default)
                        .quadrature_tolerance = Some(parse_value(key, value_str)?);
                }
                "grid.quadrature-max-iterations" => {
                    self.grid
                        .get_or_insert_with(Default::default)
                        .quadrature_max_iterations = Some(parse_value(key, value_str)?);
                }
                "convergence.tolerance" => {
                    self.convergence
                        .get_or_insert_with(Default::default)
                        .tolerance = Some(parse_value(key, value_str)?);
                }
                "convergence.max-iterations" => {
                    self.convergence
                        .get_or_insert_with(Default::default)
                        .max_iterations = Some(parse_value(key, value_str)?);
                }
                "fit.model" => {
                    self.fit.get_or_insert_with(Default::default).model =
                        Some(value_str.to_string());
                }
                "fit.max-iterations" => {
                    self.fit.get_or_insert_with(Default::default).max_iterations =
                        Some(parse_value(key, value_str)?);
                }
                "fit.eps-abs" => {
                    self.fit.get_or_insert_with(Default::default).eps_abs =
                        Some(parse_value(key, value_str)?);
                }
                "fit.eps-rel" => {
                    self.fit.get_or_insert_with(Default::default).eps_rel =
                        Some(parse_value(key, value_str)?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value_str))
    })
}
