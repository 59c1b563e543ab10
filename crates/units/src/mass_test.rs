use approx::assert_relative_eq;

use crate::mass::Mass;

#[test]
fn mass_arithmetic() {
    let a = Mass::from_solar_masses(2.0);
    let b = Mass::from_solar_masses(0.5);

    assert_relative_eq!((a + b).to_solar_masses(), 2.5);
    assert_relative_eq!((a - b).to_solar_masses(), 1.5);
    assert_relative_eq!((b * 3.0).to_solar_masses(), 1.5);
    assert!(Mass::zero() < b);
}
