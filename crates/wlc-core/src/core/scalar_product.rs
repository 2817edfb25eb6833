use super::grid::OrientationGrid;

/// Dense table of tangent scalar products `t_i · t_j` over all pairs of grid points.
///
/// Row `i` holds `sin θ_i sin θ_j cos(φ_i - φ_j) + cos θ_i cos θ_j` for every `j`, so
/// the table has `len * len` entries. It depends only on the grid and is never
/// modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarProductTable {
    size: usize,
    values: Vec<f64>,
}

impl ScalarProductTable {
    pub fn new(grid: &OrientationGrid) -> Self {
        let size = grid.len();
        let mut values = Vec::with_capacity(size * size);

        for i in 0..size {
            let (sin_i, cos_i, phi_i) = (grid.sin_theta(i), grid.cos_theta(i), grid.phi(i));
            for j in 0..size {
                values.push(
                    sin_i * grid.sin_theta(j) * (phi_i - grid.phi(j)).cos()
                        + cos_i * grid.cos_theta(j),
                );
            }
        }

        Self { size, values }
    }

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

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
