use super::error::EngineError;
use std::f64::consts::FRAC_1_PI;
use std::mem;

/// Physical parameters of a single cavity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CavityParams {
    /// Reduced force `f`. Zero and negative values are allowed.
    pub force: f64,
    /// Force coupling `bB`.
    pub bb: f64,
    /// Segment-segment coupling `JB`.
    pub jb: f64,
}

impl CavityParams {
    pub fn new(force: f64, bb: f64, jb: f64) -> Self {
        Self { force, bb, jb }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [("force", self.force), ("bB", self.bb), ("JB", self.jb)] {
            if !value.is_finite() {
                return Err(EngineError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Orientation density over the flattened grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Marginal {
    values: Vec<f64>,
}

impl Marginal {
    /// The iteration seed, `1/π` at every point.
    pub fn uniform(len: usize) -> Self {
        Self {
            values: vec![FRAC_1_PI; len],
        }
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// `sum_i weight(i) marginal(i)`.
    pub fn normalization(&self, weights: &[f64]) -> f64 {
        weighted_sum(weights, &self.values)
    }

    pub fn l1_distance(&self, other: &Self) -> f64 {
        l1_distance(&self.values, &other.values)
    }
}

/// Derivatives of the marginal with respect to `bB` and `JB`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalGradient {
    pub d_bb: Vec<f64>,
    pub d_jb: Vec<f64>,
}

impl MarginalGradient {
    pub fn uniform(len: usize) -> Self {
        Self {
            d_bb: vec![FRAC_1_PI; len],
            d_jb: vec![FRAC_1_PI; len],
        }
    }

    pub fn len(&self) -> usize {
        self.d_bb.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d_bb.is_empty()
    }

    /// Summed L1 change of both components.
    pub fn l1_distance(&self, other: &Self) -> f64 {
        l1_distance(&self.d_bb, &other.d_bb) + l1_distance(&self.d_jb, &other.d_jb)
    }
}

/// A previous/next pair for fixed-point iteration.
///
/// Reads go to the previous iterate and writes to the next one; [`Self::swap`]
/// promotes the freshly written state.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    current: T,
    next: T,
}

impl<T: Clone> DoubleBuffer<T> {
    pub fn new(initial: T) -> Self {
        Self {
            next: initial.clone(),
            current: initial,
        }
    }
}

impl<T> DoubleBuffer<T> {
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Borrows the current state for reading and the next one for writing.
    pub fn split(&mut self) -> (&T, &mut T) {
        (&self.current, &mut self.next)
    }

    pub fn swap(&mut self) {
        mem::swap(&mut self.current, &mut self.next);
    }

    pub fn into_current(self) -> T {
        self.current
    }
}

#[inline]
pub(crate) fn weighted_sum(weights: &[f64], values: &[f64]) -> f64 {
    weights.iter().zip(values).map(|(w, v)| w * v).sum()
}

#[inline]
fn l1_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_reject_non_finite_values() {
        assert!(CavityParams::new(0.0, 1.0, -2.0).validate().is_ok());
        assert!(matches!(
            CavityParams::new(f64::NAN, 1.0, 1.0).validate(),
            Err(EngineError::InvalidParameter { name: "force", .. })
        ));
        assert!(matches!(
            CavityParams::new(1.0, f64::INFINITY, 1.0).validate(),
            Err(EngineError::InvalidParameter { name: "bB", .. })
        ));
        assert!(matches!(
            CavityParams::new(1.0, 1.0, f64::NEG_INFINITY).validate(),
            Err(EngineError::InvalidParameter { name: "JB", .. })
        ));
    }

    #[test]
    fn uniform_marginal_is_one_over_pi() {
        let m = Marginal::uniform(6);
        assert_eq!(m.len(), 6);
        assert!(m.values().iter().all(|&v| v == FRAC_1_PI));
        assert!((m.normalization(&[1.0; 6]) - 6.0 / std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn l1_distance_sums_absolute_differences() {
        let a = Marginal::from_values(vec![1.0, 2.0, 3.0]);
        let b = Marginal::from_values(vec![1.5, 1.0, 3.0]);
        assert_eq!(a.l1_distance(&b), 1.5);

        let g = MarginalGradient {
            d_bb: vec![0.0, 1.0],
            d_jb: vec![2.0, 2.0],
        };
        let h = MarginalGradient {
            d_bb: vec![0.5, 1.0],
            d_jb: vec![2.0, 0.0],
        };
        assert_eq!(g.l1_distance(&h), 2.5);
    }

    #[test]
    fn double_buffer_swaps_read_and_write_sides() {
        let mut buffer = DoubleBuffer::new(Marginal::uniform(2));
        {
            let (current, next) = buffer.split();
            assert_eq!(current.values(), next.values());
            next.values_mut()[0] = 5.0;
        }
        assert_eq!(buffer.current().values()[0], FRAC_1_PI);
        buffer.swap();
        assert_eq!(buffer.current().values()[0], 5.0);
        assert_eq!(buffer.into_current().into_values(), vec![5.0, FRAC_1_PI]);
    }
}
