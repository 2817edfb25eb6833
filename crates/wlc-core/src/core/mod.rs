//! # Core Module
//!
//! Stateless numerical building blocks shared by the cavity solver, the continuum
//! model and the fitting workflow.
//!
//! ## Architecture
//!
//! - **Integration** ([`quadrature`]) - Gauss-Legendre abscissae and weights on arbitrary intervals
//! - **Orientation Sphere** ([`grid`], [`scalar_product`]) - The discretized (cos θ, φ) grid and
//!   the immutable table of pairwise tangent scalar products
//! - **Scalar Solvers** ([`numerics`]) - Bracketing root finding and minimization
//! - **Continuum Model** ([`polymer`]) - Exact, interpolated and high-force WLC formulae
//! - **Data Input** ([`io`]) - Whitespace/comma separated column files
//! - **Curve Fitting** ([`fit`]) - Levenberg-Marquardt least squares and the Marko model
//!
//! Nothing in this layer logs progress or holds state between calls; every fallible
//! operation returns a module-specific error type.

pub mod fit;
pub mod grid;
pub mod io;
pub mod numerics;
pub mod polymer;
pub mod quadrature;
pub mod scalar_product;
