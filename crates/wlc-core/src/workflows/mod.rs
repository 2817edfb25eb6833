//! # Workflows Module
//!
//! High-level entry points that tie the solver engine and the core numerics together.
//!
//! ## Overview
//!
//! Each workflow validates its inputs, builds whatever per-call state it needs,
//! reports its phases through a [`crate::engine::progress::ProgressReporter`] and
//! returns plain result structs. No state survives between calls, so independent
//! calls may run concurrently on separate threads.
//!
//! ## Architecture
//!
//! - **Cavity Workflow** ([`cavity`]) - Elongation of the discrete chain from the cavity
//!   fixed point, optionally with its `bB`/`JB` gradient and the correlation length
//! - **Fit Workflow** ([`fit`]) - Levenberg-Marquardt fit of the Marko force-extension
//!   relation to measured data

pub mod cavity;
pub mod fit;
