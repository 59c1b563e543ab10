use approx::assert_relative_eq;
use units::{Mass, Time};

use crate::atmosphere::{Atmosphere, Filter};
use crate::cooling::{CoolingModel, MestelCooling};

fn typical_mass() -> Mass {
    Mass::from_solar_masses(0.6)
}

#[test]
fn white_dwarfs_fade_as_they_cool() {
    let model = MestelCooling::default();
    let mass = typical_mass();
    let (young, _) =
        model.magnitude(Time::from_gyr(0.5), mass, Atmosphere::H, Filter::Bolometric);
    let (old, _) = model.magnitude(Time::from_gyr(8.0), mass, Atmosphere::H, Filter::Bolometric);

    // Larger magnitude means fainter
    assert!(old > young);
}

#[test]
fn one_gyr_hydrogen_dwarf_is_near_mbol_twelve() {
    let model = MestelCooling::default();
    let (mbol, extrapolated) =
        model.magnitude(Time::from_gyr(1.0), typical_mass(), Atmosphere::H, Filter::Bolometric);

    assert!((12.0..13.5).contains(&mbol), "Mbol {} at 1 Gyr", mbol);
    assert!(!extrapolated);
}

#[test]
fn helium_atmospheres_are_fainter_at_fixed_age() {
    let model = MestelCooling::default();
    let age = Time::from_gyr(3.0);
    let (h, _) = model.magnitude(age, typical_mass(), Atmosphere::H, Filter::V);
    let (he, _) = model.magnitude(age, typical_mass(), Atmosphere::He, Filter::V);
    assert!(he > h);
}

#[test]
fn filter_offsets_are_constant() {
    let model = MestelCooling::default();
    let age = Time::from_gyr(2.0);
    let (bol, _) = model.magnitude(age, typical_mass(), Atmosphere::H, Filter::Bolometric);
    let (v, _) = model.magnitude(age, typical_mass(), Atmosphere::H, Filter::V);
    assert_relative_eq!(v - bol, 0.5, epsilon = 1e-12);
}

#[test]
fn queries_outside_calibration_are_flagged() {
    let model = MestelCooling::default();
    let (_, too_old) =
        model.magnitude(Time::from_gyr(20.0), typical_mass(), Atmosphere::H, Filter::V);
    let (_, too_heavy) = model.magnitude(
        Time::from_gyr(1.0),
        Mass::from_solar_masses(1.3),
        Atmosphere::H,
        Filter::V,
    );
    let (m, too_young) = model.magnitude(Time::zero(), typical_mass(), Atmosphere::H, Filter::V);

    assert!(too_old);
    assert!(too_heavy);
    assert!(too_young);
    assert!(m.is_finite());
}
