/// Boltzmann constant in J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Thermal energy `kT` in pN nm at `temperature` kelvin.
#[inline]
pub fn thermal_energy(temperature: f64) -> f64 {
    BOLTZMANN * temperature * 1e21
}

/// Converts a force in kT/nm to pN.
#[inline]
pub fn to_piconewton(force: f64, temperature: f64) -> f64 {
    force * thermal_energy(temperature)
}

/// Converts a force in pN to kT/nm.
#[inline]
pub fn from_piconewton(force: f64, temperature: f64) -> f64 {
    force / thermal_energy(temperature)
}
