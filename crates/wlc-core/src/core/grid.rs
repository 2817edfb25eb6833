//! Discretization of the unit sphere of tangent orientations.
//!
//! The grid is the tensor product of a Gauss-Legendre rule in `cos θ` on `[-1, 1]` and
//! one in `φ` on `[0, 2π]`. Points are addressed by a flattened index in which the
//! φ index runs fastest; [`OrientationGrid::flatten`] and
//! [`OrientationGrid::unflatten`] are the only places that know this layout.

use super::quadrature::{GaussLegendre, QuadratureError, QuadratureOptions};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub theta: usize,
    pub phi: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrientationGrid {
    theta_rule: GaussLegendre,
    phi_rule: GaussLegendre,
    cos_thetas: Vec<f64>,
    sin_thetas: Vec<f64>,
    phis: Vec<f64>,
    weights: Vec<f64>,
}

impl OrientationGrid {
    pub fn new(
        n_theta: usize,
        n_phi: usize,
        options: &QuadratureOptions,
    ) -> Result<Self, QuadratureError> {
        let theta_rule = GaussLegendre::compute(-1.0, 1.0, n_theta, options)?;
        let phi_rule = GaussLegendre::compute(0.0, 2.0 * PI, n_phi, options)?;

        let len = n_theta * n_phi;
        let mut cos_thetas = Vec::with_capacity(len);
        let mut sin_thetas = Vec::with_capacity(len);
        let mut phis = Vec::with_capacity(len);
        let mut weights = Vec::with_capacity(len);

        for theta in theta_rule.points() {
            let sin_theta = (1.0 - theta.abscissa * theta.abscissa).max(0.0).sqrt();
            for phi in phi_rule.points() {
                cos_thetas.push(theta.abscissa);
                sin_thetas.push(sin_theta);
                phis.push(phi.abscissa);
                weights.push(theta.weight * phi.weight);
            }
        }

        Ok(Self {
            theta_rule,
            phi_rule,
            cos_thetas,
            sin_thetas,
            phis,
            weights,
        })
    }

    pub fn n_theta(&self) -> usize {
        self.theta_rule.len()
    }

    pub fn n_phi(&self) -> usize {
        self.phi_rule.len()
    }

    /// Number of flattened grid points, `n_theta * n_phi`.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn flatten(&self, point: GridPoint) -> usize {
        debug_assert!(point.theta < self.n_theta() && point.phi < self.n_phi());
        point.theta * self.n_phi() + point.phi
    }

    #[inline]
    pub fn unflatten(&self, index: usize) -> GridPoint {
        debug_assert!(index < self.len());
        GridPoint {
            theta: index / self.n_phi(),
            phi: index % self.n_phi(),
        }
    }

    #[inline]
    pub fn cos_theta(&self, index: usize) -> f64 {
        self.cos_thetas[index]
    }

    #[inline]
    pub fn sin_theta(&self, index: usize) -> f64 {
        self.sin_thetas[index]
    }

    #[inline]
    pub fn phi(&self, index: usize) -> f64 {
        self.phis[index]
    }

    /// Product quadrature weight of a flattened point.
    #[inline]
    pub fn weight(&self, index: usize) -> f64 {
        self.weights[index]
    }

    pub fn cos_thetas(&self) -> &[f64] {
        &self.cos_thetas
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn theta_rule(&self) -> &GaussLegendre {
        &self.theta_rule
    }

    pub fn phi_rule(&self) -> &GaussLegendre {
        &self.phi_rule
    }

    /// Integrates `f(index)` over the sphere with the product weights.
    pub fn integrate<F>(&self, f: F) -> f64
    where
        F: Fn(usize) -> f64,
    {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, &w)| w * f(i))
            .sum()
    }
}
