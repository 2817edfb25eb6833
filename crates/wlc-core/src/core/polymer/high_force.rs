//! Asymptotic worm-like chain relations for `F lpb >> 1`, where transverse
//! fluctuations are small and the chain is nearly straight.

/// Free energy per unit length, `g(F) = -F + sqrt(F / lpb)`.
pub fn free_energy(force: f64, lpb: f64) -> f64 {
    -force + (force / lpb).sqrt()
}

/// `rho(F) = 1 - 1 / (2 lpb sqrt(F / lpb))`.
pub fn elongation(force: f64, lpb: f64) -> f64 {
    1.0 - 1.0 / (2.0 * lpb * (force / lpb).sqrt())
}

/// `F(rho) = 1 / (4 lpb (1 - rho)^2)`, the inverse of [`elongation`].
pub fn force(rho: f64, lpb: f64) -> f64 {
    let slack = 1.0 - rho;
    1.0 / (4.0 * lpb * slack * slack)
}

/// Free energy expressed through the extension, `-(2 rho - 1) / (4 lpb (1 - rho)^2)`.
pub fn free_energy_of_extension(rho: f64, lpb: f64) -> f64 {
    let slack = 1.0 - rho;
    -(2.0 * rho - 1.0) / (4.0 * lpb * slack * slack)
}

/// Derivative of [`free_energy_of_extension`] with respect to `rho`.
pub fn free_energy_of_extension_derivative(rho: f64, lpb: f64) -> f64 {
    -3.0 * rho / (4.0 * lpb * (1.0 - rho).powi(3))
}
