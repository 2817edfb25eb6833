use crate::core::fit::{FitConfig, FitResult, FitStatus, MarkoModel, MarkoVariant, fit};
use crate::core::io::columns::Dataset;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

/// Outcome of fitting the Marko relation to force-extension data.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkoFitReport {
    pub variant: MarkoVariant,
    pub persistence_length: f64,
    pub persistence_length_error: f64,
    pub contour_length: f64,
    pub contour_length_error: f64,
    pub result: FitResult,
}

impl MarkoFitReport {
    pub fn converged(&self) -> bool {
        self.result.status == FitStatus::Converged
    }
}

/// Fits `F(z) = force(z / L; lpb)` to `(z, F, sigma)` data, starting from
/// `initial = [lpb, L]`.
#[instrument(skip_all, name = "marko_fit_workflow")]
pub fn marko_fit(
    data: &Dataset,
    initial: [f64; 2],
    variant: MarkoVariant,
    config: &FitConfig,
    reporter: &ProgressReporter,
) -> Result<MarkoFitReport, EngineError> {
    info!(
        points = data.len(),
        %variant,
        lpb = initial[0],
        contour_length = initial[1],
        "Starting Marko fit."
    );
    reporter.report(Progress::PhaseStart { name: "Marko fit" });

    let model = MarkoModel::new(variant);
    let result = fit(&model, data, &initial, config)?;

    reporter.report(Progress::PhaseFinish);

    match result.status {
        FitStatus::Converged => info!(
            iterations = result.iterations,
            chi_squared = result.chi_squared,
            "Marko fit converged."
        ),
        FitStatus::MaxIterations => warn!(
            iterations = result.iterations,
            "Marko fit stopped at the iteration cap; parameters may be inaccurate."
        ),
        FitStatus::NoProgress => warn!(
            iterations = result.iterations,
            "Marko fit stalled before the step size criterion was met."
        ),
    }

    Ok(MarkoFitReport {
        variant,
        persistence_length: result.parameters[0],
        persistence_length_error: result.errors[0],
        contour_length: result.parameters[1],
        contour_length_error: result.errors[1],
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::polymer::interpolation;

    fn synthetic(lpb: f64, contour_length: f64) -> Dataset {
        let mut data = Dataset::new();
        for i in 0..14 {
            let z = 600.0 + 25.0 * i as f64;
            data.push(z, interpolation::force(z / contour_length, lpb).unwrap(), 1.0);
        }
        data
    }

    #[test]
    fn interpolation_fit_recovers_generating_parameters() {
        let report = marko_fit(
            &synthetic(50.0, 1000.0),
            [40.0, 1100.0],
            MarkoVariant::Interpolation,
            &FitConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(report.converged());
        assert_eq!(report.variant, MarkoVariant::Interpolation);
        assert!((report.persistence_length - 50.0).abs() < 1e-2);
        assert!((report.contour_length - 1000.0).abs() < 1e-1);
        assert!(report.persistence_length_error.is_finite());
        assert!(report.contour_length_error.is_finite());
    }

    #[test]
    fn too_few_points_are_reported_as_fit_errors() {
        let mut data = Dataset::new();
        data.push(500.0, 0.05, 1.0);
        let result = marko_fit(
            &data,
            [50.0, 1000.0],
            MarkoVariant::Exact,
            &FitConfig::default(),
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::Fit(_))));
    }
}
