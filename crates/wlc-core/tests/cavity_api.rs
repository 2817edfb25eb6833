use wlc::engine::config::CavityConfigBuilder;
use wlc::engine::error::EngineError;
use wlc::engine::progress::ProgressReporter;
use wlc::engine::state::CavityParams;
use wlc::workflows::cavity::{
    cavity_elongation, cavity_elongation_with_gradient, elongation, elongation_with_gradient,
};

fn rho_with_tolerance(force: f64, bb: f64, jb: f64, tolerance: f64) -> f64 {
    let config = CavityConfigBuilder::new()
        .tolerance(tolerance)
        .build()
        .unwrap();
    elongation(
        &CavityParams::new(force, bb, jb),
        &config,
        &ProgressReporter::new(),
    )
    .unwrap()
}

#[test]
fn zero_force_gives_zero_elongation() {
    assert_eq!(cavity_elongation(0.0, 1.0, 0.0).unwrap(), 0.0);
    for &(bb, jb) in &[(1.0, 3.0), (2.0, 1.5), (0.3, 0.7)] {
        assert_eq!(cavity_elongation(0.0, bb, jb).unwrap(), 0.0, "bB = {bb}, JB = {jb}");
    }
}

#[test]
fn uncoupled_gradient_query_succeeds_with_zero_correlation_length() {
    for &f in &[0.5, 1.0, 5.0] {
        let response = cavity_elongation_with_gradient(f, 1.0, 0.0).unwrap();
        let langevin = 1.0 / f.tanh() - 1.0 / f;
        assert!((response.elongation - langevin).abs() < 1e-8, "f = {f}");
        assert!(response.d_elongation_d_bb > 0.0);
        assert_eq!(response.correlation_length, 0.0);
    }
}

#[test]
fn moderate_force_gives_elongation_inside_unit_interval() {
    let rho = cavity_elongation(5.0, 1.0, 0.0).unwrap();
    assert!(rho > 0.0 && rho < 1.0, "rho = {rho}");
}

#[test]
fn elongation_increases_monotonically_with_force() {
    let rhos: Vec<f64> = [0.0, 1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|&f| cavity_elongation(f, 1.0, 0.0).unwrap())
        .collect();
    assert!(
        rhos.windows(2).all(|w| w[0] < w[1]),
        "elongations {rhos:?} are not increasing"
    );
}

#[test]
fn gradient_matches_finite_differences_across_coupling_regimes() {
    let h = 1e-4;
    let tolerance = 1e-10;
    for &(f, bb, jb) in &[(1.0, 1.0, 0.2), (0.5, 1.0, 1.0), (0.5, 1.0, 4.0)] {
        let config = CavityConfigBuilder::new()
            .tolerance(tolerance)
            .build()
            .unwrap();
        let response = elongation_with_gradient(
            &CavityParams::new(f, bb, jb),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();

        let numeric_bb = (rho_with_tolerance(f, bb + h, jb, tolerance)
            - rho_with_tolerance(f, bb - h, jb, tolerance))
            / (2.0 * h);
        let numeric_jb = (rho_with_tolerance(f, bb, jb + h, tolerance)
            - rho_with_tolerance(f, bb, jb - h, tolerance))
            / (2.0 * h);

        let relative_bb = (numeric_bb - response.d_elongation_d_bb).abs() / numeric_bb.abs();
        let relative_jb = (numeric_jb - response.d_elongation_d_jb).abs() / numeric_jb.abs();
        assert!(relative_bb < 0.02, "({f}, {bb}, {jb}): d/dbB off by {relative_bb}");
        assert!(relative_jb < 0.02, "({f}, {bb}, {jb}): d/dJB off by {relative_jb}");
    }
}

#[test]
fn default_gradient_call_reports_positive_correlation_length() {
    let response = cavity_elongation_with_gradient(0.5, 1.0, 1.0).unwrap();
    assert!(response.correlation_length > 0.0);
    assert!(response.elongation > 0.0 && response.elongation < 1.0);
    assert!(response.d_elongation_d_bb > 0.0);
}

#[test]
fn single_iteration_cap_fails_with_non_convergence() {
    let config = CavityConfigBuilder::new().max_iterations(1).build().unwrap();
    let result = elongation(
        &CavityParams::new(1.0, 1.0, 1.0),
        &config,
        &ProgressReporter::new(),
    );
    assert!(matches!(
        result,
        Err(EngineError::NonConvergence { iterations: 1, .. })
    ));
}

#[test]
fn independent_calls_may_run_concurrently() {
    let handles: Vec<_> = [0.5, 1.0, 2.0]
        .into_iter()
        .map(|f| std::thread::spawn(move || cavity_elongation(f, 1.0, 1.0).unwrap()))
        .collect();
    let concurrent: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for (rho, f) in concurrent.iter().zip([0.5, 1.0, 2.0]) {
        assert_eq!(*rho, cavity_elongation(f, 1.0, 1.0).unwrap());
    }
}
