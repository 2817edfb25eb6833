use wlc::core::fit::MarkoVariant;

pub struct DefaultsConfig {
    pub n_theta: usize,
    pub n_phi: usize,
    pub quadrature_tolerance: f64,
    pub quadrature_max_iterations: usize,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub fit_model: MarkoVariant,
    pub fit_max_iterations: usize,
    pub fit_eps_abs: f64,
    pub fit_eps_rel: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            n_theta: 15,
            n_phi: 15,
            quadrature_tolerance: 1e-14,
            quadrature_max_iterations: 100,
            tolerance: 1e-5,
            max_iterations: 2000,
            fit_model: MarkoVariant::Exact,
            fit_max_iterations: 400,
            fit_eps_abs: 1e-4,
            fit_eps_rel: 1e-4,
        }
    }
}
