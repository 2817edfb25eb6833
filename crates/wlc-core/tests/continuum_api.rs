use std::io::Write;
use tempfile::NamedTempFile;
use wlc::core::fit::{FitConfig, MarkoVariant};
use wlc::core::io::columns::Dataset;
use wlc::core::polymer::{exact, interpolation, units};
use wlc::engine::progress::ProgressReporter;
use wlc::workflows::fit::marko_fit;

#[test]
fn exact_force_and_elongation_are_inverse_relations() {
    let lpb = 50.0;
    for &force in &[0.02, 0.1, 1.0, 10.0] {
        let rho = exact::elongation(force, lpb).unwrap();
        let back = exact::force(rho, lpb).unwrap();
        assert!((back - force).abs() < 1e-6 * force, "F = {force}, back = {back}");
    }
}

#[test]
fn interpolation_formula_tracks_exact_relation() {
    let lpb = 50.0;
    for &rho in &[0.8, 0.95] {
        let exact_force = exact::force(rho, lpb).unwrap();
        let approximate = interpolation::force(rho, lpb).unwrap();
        assert!(
            (approximate - exact_force).abs() < 0.12 * exact_force,
            "rho = {rho}: {approximate} vs {exact_force}"
        );
    }
}

#[test]
fn piconewton_conversion_round_trips_at_room_temperature() {
    let force = 0.3;
    let pn = units::to_piconewton(force, 298.0);
    assert!((units::from_piconewton(pn, 298.0) - force).abs() < 1e-15);
}

#[test]
fn marko_fit_of_data_file_recovers_parameters() {
    let (lpb, contour_length) = (50.0, 1000.0);
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# z [nm]  F [kT/nm]").unwrap();
    for i in 0..14 {
        let z = 600.0 + 25.0 * i as f64;
        let force = interpolation::force(z / contour_length, lpb).unwrap();
        writeln!(file, "{z} {force:.17e}").unwrap();
    }
    file.flush().unwrap();

    let data = Dataset::load(file.path()).unwrap();
    assert_eq!(data.len(), 14);
    assert!(data.sigma.iter().all(|&s| s == 1.0));

    let report = marko_fit(
        &data,
        [40.0, 1100.0],
        MarkoVariant::Interpolation,
        &FitConfig::default(),
        &ProgressReporter::new(),
    )
    .unwrap();
    assert!(report.converged());
    assert!((report.persistence_length - lpb).abs() < 1e-2);
    assert!((report.contour_length - contour_length).abs() < 1e-1);
}
