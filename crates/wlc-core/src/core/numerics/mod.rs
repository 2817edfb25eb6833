//! Bracketing scalar solvers used by the continuum WLC formulae.
//!
//! Both solvers take a plain closure `Fn(f64) -> f64`, a bracket, and a validated
//! [`SolverConfig`]. A function value that is not finite aborts the solve with
//! [`NumericsError::NonFinite`] instead of steering the iteration.

mod config;
mod error;
mod minimize;
mod root;

pub use config::{ConfigError, SolverConfig};
pub use error::NumericsError;
pub use minimize::{Minimum, golden_section};
pub use root::{Root, brent};
