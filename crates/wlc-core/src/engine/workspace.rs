use super::config::GridConfig;
use super::error::EngineError;
use crate::core::grid::OrientationGrid;
use crate::core::scalar_product::ScalarProductTable;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-solve state that depends only on the grid resolution.
#[derive(Debug, Clone)]
pub struct CavityWorkspace {
    grid: OrientationGrid,
    table: ScalarProductTable,
}

impl CavityWorkspace {
    pub fn new(config: &GridConfig) -> Result<Self, EngineError> {
        let grid = OrientationGrid::new(config.n_theta, config.n_phi, &config.quadrature_options())?;
        let table = ScalarProductTable::new(&grid);
        debug!(
            n_theta = grid.n_theta(),
            n_phi = grid.n_phi(),
            points = grid.len(),
            "Built cavity workspace."
        );
        Ok(Self { grid, table })
    }

    pub fn grid(&self) -> &OrientationGrid {
        &self.grid
    }

    pub fn table(&self) -> &ScalarProductTable {
        &self.table
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Builds the weighted coupling kernel `M(i, j) = weight(j) exp(JB sp(i, j))`.
    pub fn coupling_kernel(&self, jb: f64) -> CouplingKernel {
        let n = self.len();
        let weights = self.grid.weights();
        let mut values = Vec::with_capacity(n * n);
        for i in 0..n {
            values.extend(
                self.table
                    .row(i)
                    .iter()
                    .zip(weights)
                    .map(|(&sp, &w)| w * (jb * sp).exp()),
            );
        }
        CouplingKernel { size: n, values }
    }

    /// `exp(f cos(theta_i) bB)` for every grid point.
    pub fn field_factors(&self, force: f64, bb: f64) -> Vec<f64> {
        self.grid
            .cos_thetas()
            .iter()
            .map(|&c| (force * c * bb).exp())
            .collect()
    }
}

/// Dense row-major kernel of the cavity integral at a fixed `JB`.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingKernel {
    size: usize,
    values: Vec<f64>,
}

impl CouplingKernel {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Whether every entry is finite. Large `JB` overflows the exponential.
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    /// `out(i) = sum_j M(i, j) v(j)`.
    pub fn apply(&self, v: &[f64], out: &mut [f64]) {
        #[cfg(not(feature = "parallel"))]
        let rows = out.iter_mut().enumerate();

        #[cfg(feature = "parallel")]
        let rows = out.par_iter_mut().enumerate();

        rows.for_each(|(i, o)| *o = dot(self.row(i), v));
    }

    /// `out(i) = sum_j M(i, j) sp(i, j) v(j)`, the `JB` derivative of [`Self::apply`].
    pub fn apply_scaled(&self, table: &ScalarProductTable, v: &[f64], out: &mut [f64]) {
        #[cfg(not(feature = "parallel"))]
        let rows = out.iter_mut().enumerate();

        #[cfg(feature = "parallel")]
        let rows = out.par_iter_mut().enumerate();

        rows.for_each(|(i, o)| {
            *o = self
                .row(i)
                .iter()
                .zip(table.row(i))
                .zip(v)
                .map(|((&m, &sp), &x)| m * sp * x)
                .sum();
        });
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_workspace() -> CavityWorkspace {
        let config = GridConfig {
            n_theta: 4,
            n_phi: 5,
            ..GridConfig::default()
        };
        CavityWorkspace::new(&config).unwrap()
    }

    #[test]
    fn workspace_matches_grid_resolution() {
        let ws = small_workspace();
        assert_eq!(ws.len(), 20);
        assert_eq!(ws.table().size(), 20);
        assert!(!ws.is_empty());
    }

    #[test]
    fn zero_coupling_kernel_rows_are_the_weights() {
        let ws = small_workspace();
        let kernel = ws.coupling_kernel(0.0);
        for i in 0..ws.len() {
            assert_eq!(kernel.row(i), ws.grid().weights());
        }
    }

    #[test]
    fn kernel_entries_follow_the_scalar_product() {
        let ws = small_workspace();
        let jb = 1.7;
        let kernel = ws.coupling_kernel(jb);
        for (i, j) in [(0, 0), (3, 11), (19, 2)] {
            let expected = ws.grid().weight(j) * (jb * ws.table().get(i, j)).exp();
            assert!((kernel.get(i, j) - expected).abs() < 1e-14 * expected.abs());
        }
    }

    #[test]
    fn apply_integrates_a_constant_over_the_sphere() {
        let ws = small_workspace();
        let kernel = ws.coupling_kernel(0.0);
        let ones = vec![1.0; ws.len()];
        let mut out = vec![0.0; ws.len()];
        kernel.apply(&ones, &mut out);
        for value in out {
            assert!((value - 4.0 * std::f64::consts::PI).abs() < 1e-10);
        }
    }

    #[test]
    fn apply_scaled_matches_a_finite_difference_in_jb() {
        let ws = small_workspace();
        let (jb, h) = (0.8, 1e-6);
        let v: Vec<f64> = (0..ws.len()).map(|i| 1.0 + 0.1 * i as f64).collect();
        let mut plus = vec![0.0; ws.len()];
        let mut minus = vec![0.0; ws.len()];
        let mut scaled = vec![0.0; ws.len()];

        ws.coupling_kernel(jb + h).apply(&v, &mut plus);
        ws.coupling_kernel(jb - h).apply(&v, &mut minus);
        ws.coupling_kernel(jb).apply_scaled(ws.table(), &v, &mut scaled);

        for i in 0..ws.len() {
            let numeric = (plus[i] - minus[i]) / (2.0 * h);
            assert!((numeric - scaled[i]).abs() < 1e-6 * scaled[i].abs().max(1.0));
        }
    }

    #[test]
    fn field_factors_are_one_without_force() {
        let ws = small_workspace();
        assert!(ws.field_factors(0.0, 3.0).iter().all(|&e| e == 1.0));
        let factors = ws.field_factors(2.0, 0.5);
        for (i, e) in factors.iter().enumerate() {
            assert_eq!(*e, ws.grid().cos_theta(i).exp());
        }
    }

    #[test]
    fn huge_coupling_overflows_the_kernel() {
        let ws = small_workspace();
        assert!(ws.coupling_kernel(1.0).is_finite());
        assert!(!ws.coupling_kernel(1e4).is_finite());
    }
}
