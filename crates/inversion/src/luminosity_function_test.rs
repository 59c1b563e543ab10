use crate::error::ConfigError;
use crate::luminosity_function::ObservedLuminosityFunction;

fn centers() -> Vec<f64> {
    vec![12.25, 12.75, 13.25]
}

fn widths() -> Vec<f64> {
    vec![0.5; 3]
}

#[test]
fn valid_observation_exposes_its_range() {
    let lf = ObservedLuminosityFunction::new(
        centers(),
        widths(),
        vec![1.0e-4, 2.0e-4, 0.0],
        vec![1.0e-5, 2.0e-5, 1.0e-5],
    )
    .expect("valid luminosity function");

    assert_eq!(lf.len(), 3);
    assert_eq!(lf.magnitude_range(), (12.0, 13.5));
    assert_eq!(lf.histogram().len(), 3);
}

#[test]
fn mismatched_density_length_is_rejected() {
    let err = ObservedLuminosityFunction::new(centers(), widths(), vec![1.0; 2], vec![0.1; 3])
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::LengthMismatch {
            what: "observed luminosity function",
            field: "density",
            expected: 3,
            found: 2,
        }
    );
}

#[test]
fn negative_density_is_rejected() {
    let err = ObservedLuminosityFunction::new(
        centers(),
        widths(),
        vec![1.0, -0.5, 1.0],
        vec![0.1; 3],
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Negative { index: 1, field: "density", .. }));
}

#[test]
fn zero_width_is_rejected() {
    let err = ObservedLuminosityFunction::new(
        centers(),
        vec![0.5, 0.0, 0.5],
        vec![1.0; 3],
        vec![0.1; 3],
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveWidth { index: 1, .. }));
}

#[test]
fn json_input_is_validated_on_load() {
    let good = r#"{
        "binCenters": [10.5, 11.5],
        "binWidths": [1.0, 1.0],
        "density": [3.0e-5, 5.0e-5],
        "densityError": [1.0e-6, 2.0e-6]
    }"#;
    let lf: ObservedLuminosityFunction = serde_json::from_str(good).expect("valid json");
    assert_eq!(lf.magnitude_range(), (10.0, 12.0));

    let bad = r#"{
        "binCenters": [10.5, 11.5],
        "binWidths": [1.0, -1.0],
        "density": [3.0e-5, 5.0e-5],
        "densityError": [1.0e-6, 2.0e-6]
    }"#;
    let err = serde_json::from_str::<ObservedLuminosityFunction>(bad).unwrap_err();
    assert!(err.to_string().contains("non-positive width"));
}
