pub mod cavity;
pub mod continuum;
pub mod fit;

use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use crate::ui::UiManager;

/// Settings shared by every sub-command.
pub struct CommandContext<'a> {
    pub verbose: bool,
    pub temperature: Option<f64>,
    pub file_config: &'a FileConfig,
    pub ui: &'a UiManager,
}

impl CommandContext<'_> {
    /// The temperature in kelvin, if forces are exchanged in pN.
    pub fn temperature(&self) -> Result<Option<f64>> {
        match self.temperature {
            Some(t) if !t.is_finite() || t <= 0.0 => Err(CliError::Argument(format!(
                "temperature must be a positive number of kelvin, got {}",
                t
            ))),
            other => Ok(other),
        }
    }
}

/// Formats like C's `%.5e`: five decimals and an exponent of at least two digits.
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.5e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

/// Terse mode prints the results only; verbose mode labels inputs and results.
pub fn render(verbose: bool, inputs: &[(&str, f64)], results: &[(&str, f64)]) -> String {
    if verbose {
        inputs
            .iter()
            .chain(results)
            .map(|(label, value)| format!("{} = {}", label, format_scientific(*value)))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        results
            .iter()
            .map(|(_, value)| format_scientific(*value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
