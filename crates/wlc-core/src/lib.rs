//! # WLC Core Library
//!
//! Force-extension observables of a semi-flexible polymer (worm-like chain), computed
//! both from the continuum model and from a discretized cavity-method mean-field model.
//!
//! ## Architectural Philosophy
//!
//! The library is organized in three layers, each depending only on the layers below it.
//!
//! - **[`core`]: The Foundation.** Stateless numerics: Gauss-Legendre quadrature, the
//!   orientation grid and its scalar product table, bracketing root finding and
//!   minimization, the continuum WLC formulae, column data input, and nonlinear least
//!   squares.
//!
//! - **[`engine`]: The Logic Core.** Solver configuration, typed errors, progress
//!   reporting, the per-solve workspace, and the fixed-point tasks that iterate the
//!   cavity marginal (and its parameter gradient) to convergence.
//!
//! - **[`workflows`]: The Public API.** Entry points that tie `engine` and `core`
//!   together: the cavity elongation queries and the Marko force-extension fit.
//!
//! ## Quick Start
//!
//! ```no_run
//! use wlc::workflows::cavity::{cavity_elongation, cavity_elongation_with_gradient};
//!
//! let rho = cavity_elongation(1.0, 1.0, 0.5)?;
//! let response = cavity_elongation_with_gradient(1.0, 1.0, 0.5)?;
//! assert!((rho - response.elongation).abs() < 1e-12);
//! # Ok::<(), wlc::engine::error::EngineError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;
