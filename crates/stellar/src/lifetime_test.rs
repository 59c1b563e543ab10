use approx::assert_relative_eq;
use units::Mass;

use crate::lifetime::{PowerLawLifetime, PreWdLifetime};

#[test]
fn solar_star_at_solar_composition() {
    let model = PowerLawLifetime::default();
    let t = model.lifetime(0.017, 0.27, Mass::from_solar_masses(1.0));
    assert_relative_eq!(t.to_gyr(), 11.0, epsilon = 1e-9);
}

#[test]
fn massive_stars_die_young() {
    let model = PowerLawLifetime::default();
    let light = model.lifetime(0.017, 0.27, Mass::from_solar_masses(1.2));
    let heavy = model.lifetime(0.017, 0.27, Mass::from_solar_masses(4.0));

    assert!(heavy < light);
    assert!(heavy.to_gyr() < 0.5, "4 M☉ lifetime {} Gyr", heavy.to_gyr());
}

#[test]
fn metallicity_and_helium_shift_lifetime() {
    let model = PowerLawLifetime::default();
    let m = Mass::from_solar_masses(1.5);
    let solar = model.lifetime(0.017, 0.27, m);

    assert!(model.lifetime(0.03, 0.27, m) > solar);
    assert!(model.lifetime(0.017, 0.35, m) < solar);
}
