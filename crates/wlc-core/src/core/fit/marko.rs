use super::levenberg_marquardt::FitModel;
use crate::core::polymer::{WlcError, exact, interpolation};
use nalgebra::DVector;
use std::fmt;

/// Which force-extension relation the fitted force is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkoVariant {
    #[default]
    Exact,
    Interpolation,
}

impl fmt::Display for MarkoVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Interpolation => write!(f, "interpolation"),
        }
    }
}

/// Force as a function of extension, `F(z) = F(z / L; lpb)`, with parameters
/// `[lpb, L]`.
///
/// The gradient always comes from the interpolation formula. It is exact for
/// [`MarkoVariant::Interpolation`] and a close approximation for the exact relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkoModel {
    pub variant: MarkoVariant,
}

impl MarkoModel {
    pub const PARAMETERS: [&'static str; 2] = ["lpb", "L"];

    pub fn new(variant: MarkoVariant) -> Self {
        Self { variant }
    }
}

impl FitModel for MarkoModel {
    type Error = WlcError;

    fn parameter_count(&self) -> usize {
        2
    }

    fn value(&self, z: f64, params: &DVector<f64>) -> Result<f64, WlcError> {
        let (lpb, contour_length) = (params[0], params[1]);
        let rho = z / contour_length;
        match self.variant {
            MarkoVariant::Exact => exact::force(rho, lpb),
            MarkoVariant::Interpolation => interpolation::force(rho, lpb),
        }
    }

    fn gradient(&self, z: f64, params: &DVector<f64>) -> Result<DVector<f64>, WlcError> {
        let (lpb, contour_length) = (params[0], params[1]);
        let rho = z / contour_length;
        let slack = 1.0 - rho;

        let d_lpb = -interpolation::reduced_force(rho) / (lpb * lpb);
        let d_contour_length =
            -rho / (contour_length * lpb) * (1.0 + 0.5 / (slack * slack * slack));
        Ok(DVector::from_vec(vec![d_lpb, d_contour_length]))
    }
}
