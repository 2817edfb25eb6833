//! # Curve Fitting
//!
//! Weighted nonlinear least squares ([`levenberg_marquardt`]) and the Marko
//! force-extension model ([`marko`]) fitted to measured `(z, F, sigma)` curves.

pub mod levenberg_marquardt;
pub mod marko;

pub use levenberg_marquardt::{FitConfig, FitError, FitModel, FitResult, FitStatus, fit};
pub use marko::{MarkoModel, MarkoVariant};
