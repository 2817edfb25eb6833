use crate::engine::context::SolveContext;
use crate::engine::error::{EngineError, SolverStage};
use crate::engine::state::{CavityParams, Marginal, MarginalGradient};
use tracing::{debug, instrument};

/// Elongation of a converged state together with its parameter derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElongationGradient {
    pub elongation: f64,
    pub d_elongation_d_bb: f64,
    pub d_elongation_d_jb: f64,
    /// `<cos^2 theta> - rho^2` under the segment distribution.
    pub self_correlation: f64,
}

/// `rho = sum_i cos(theta_i) q(i) / sum_i q(i)` with `q(i) = w(i) E(i) I(i)^2`.
#[instrument(skip_all, name = "elongation_task")]
pub fn elongation(context: &SolveContext, marginal: &Marginal) -> Result<f64, EngineError> {
    let mut integrals = vec![0.0; context.len()];
    context.kernel().apply(marginal.values(), &mut integrals);

    let mut z = 0.0;
    let mut numerator = 0.0;
    for (i, &integral) in integrals.iter().enumerate() {
        let q = context.weights()[i] * context.field()[i] * integral * integral;
        z += q;
        numerator += context.cos_thetas()[i] * q;
    }
    check_partition_function(z)?;

    // rho is odd in f, so it vanishes exactly at zero force.
    let rho = if context.params.force == 0.0 {
        0.0
    } else {
        numerator / z
    };
    debug!(rho, "Computed cavity elongation.");
    Ok(rho)
}

#[instrument(skip_all, name = "elongation_gradient_task")]
pub fn elongation_gradient(
    context: &SolveContext,
    marginal: &Marginal,
    gradient: &MarginalGradient,
) -> Result<ElongationGradient, EngineError> {
    let n = context.len();
    let kernel = context.kernel();

    let mut integrals = vec![0.0; n];
    let mut d_bb = vec![0.0; n];
    let mut d_jb = vec![0.0; n];
    let mut scratch = vec![0.0; n];
    kernel.apply(marginal.values(), &mut integrals);
    kernel.apply(&gradient.d_bb, &mut d_bb);
    kernel.apply_scaled(context.workspace.table(), marginal.values(), &mut d_jb);
    kernel.apply(&gradient.d_jb, &mut scratch);
    for (d, s) in d_jb.iter_mut().zip(&scratch) {
        *d += s;
    }

    let force = context.params.force;
    let mut sums = Sums::default();
    for i in 0..n {
        let c = context.cos_thetas()[i];
        let we = context.weights()[i] * context.field()[i];
        let integral = integrals[i];

        let q = we * integral * integral;
        let q_bb = we * (force * c * integral * integral + 2.0 * integral * d_bb[i]);
        let q_jb = we * 2.0 * integral * d_jb[i];

        sums.z += q;
        sums.cos += c * q;
        sums.cos_squared += c * c * q;
        sums.z_bb += q_bb;
        sums.cos_bb += c * q_bb;
        sums.z_jb += q_jb;
        sums.cos_jb += c * q_jb;
    }
    check_partition_function(sums.z)?;

    let result = if force == 0.0 {
        // rho vanishes for every bB and JB at zero force, and so do its derivatives.
        ElongationGradient {
            elongation: 0.0,
            d_elongation_d_bb: 0.0,
            d_elongation_d_jb: 0.0,
            self_correlation: sums.cos_squared / sums.z,
        }
    } else {
        let rho = sums.cos / sums.z;
        ElongationGradient {
            elongation: rho,
            d_elongation_d_bb: (sums.cos_bb - rho * sums.z_bb) / sums.z,
            d_elongation_d_jb: (sums.cos_jb - rho * sums.z_jb) / sums.z,
            self_correlation: sums.cos_squared / sums.z - rho * rho,
        }
    };
    debug!(
        rho = result.elongation,
        d_rho_d_bb = result.d_elongation_d_bb,
        d_rho_d_jb = result.d_elongation_d_jb,
        "Computed cavity elongation gradient."
    );
    Ok(result)
}

/// Relative size of `chi - zeta_0` below which the two are taken as equal.
const UNCORRELATED_TOLERANCE: f64 = 1e4 * f64::EPSILON;

/// Correlation length `xi = -bB / (ln(chi - zeta_0) - ln(chi + zeta_0))` with
/// `chi = (d rho / d bB) / f`.
pub fn correlation_length(
    params: &CavityParams,
    observables: &ElongationGradient,
) -> Result<f64, EngineError> {
    if params.force == 0.0 {
        return Err(domain(
            "the susceptibility (d rho / d bB) / f is undefined at zero force".to_string(),
        ));
    }

    let chi = observables.d_elongation_d_bb / params.force;
    let zeta = observables.self_correlation;
    let (lower, upper) = (chi - zeta, chi + zeta);
    if upper.is_finite() && upper > 0.0 && lower.abs() <= UNCORRELATED_TOLERANCE * upper {
        // chi == zeta_0 for uncoupled segments: the logarithm diverges and xi -> 0.
        return Ok(0.0);
    }
    if lower.is_nan() || lower <= 0.0 || upper.is_nan() || upper <= 0.0 {
        return Err(domain(format!(
            "logarithm of a non-positive argument (chi - zeta_0 = {lower:e}, chi + zeta_0 = {upper:e})"
        )));
    }

    let xi = -params.bb / (lower.ln() - upper.ln());
    if !xi.is_finite() {
        return Err(domain(format!("result is not finite ({xi})")));
    }
    Ok(xi)
}

#[derive(Default)]
struct Sums {
    z: f64,
    cos: f64,
    cos_squared: f64,
    z_bb: f64,
    cos_bb: f64,
    z_jb: f64,
    cos_jb: f64,
}

fn check_partition_function(z: f64) -> Result<(), EngineError> {
    if z.is_finite() && z > 0.0 {
        Ok(())
    } else {
        Err(EngineError::NonFinite {
            stage: SolverStage::Observables,
            iteration: 0,
        })
    }
}

fn domain(reason: String) -> EngineError {
    EngineError::Domain {
        quantity: "correlation length",
        reason,
    }
}
