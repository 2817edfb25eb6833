//! # Engine Module
//!
//! The stateful side of the cavity-method solver: everything needed to turn a
//! `(force, bB, JB)` query into a converged orientation marginal.
//!
//! ## Overview
//!
//! A solve builds a private [`workspace::CavityWorkspace`] (orientation grid and
//! scalar product table), precomputes the coupling kernel for the requested `JB`, and
//! then iterates the cavity fixed-point equation until successive marginals agree to
//! within the configured tolerance. The gradient variant carries the derivatives of
//! the marginal with respect to `bB` and `JB` through the same iteration.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Grid resolution, quadrature polishing and convergence criteria
//! - **Error Handling** ([`error`]) - The [`error::EngineError`] type shared by all solver stages
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Workspace** ([`workspace`]) - Grid, scalar product table and per-query kernels
//! - **Solve Context** ([`context`]) - The read-only inputs shared by the tasks of one query
//! - **State Tracking** ([`state`]) - Query parameters, marginals, gradients and double buffering
//! - **Tasks** (`tasks`) - The marginal and gradient fixed-point iterations and the
//!   reduction of converged states to observables
//!
//! Iteration counts are always capped; running into the cap is reported as
//! [`error::EngineError::NonConvergence`] together with the last residual.

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
pub mod workspace;
