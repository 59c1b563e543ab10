use units::Mass;

/// Maps a progenitor's initial mass to its white-dwarf remnant mass.
pub trait InitialFinalMassRelation: Send + Sync {
    fn final_mass(&self, progenitor: Mass) -> Mass;
}

/// Linear IFMR, M_wd = slope × M_init + intercept.
///
/// Defaults to the Kalirai et al. (2008) cluster calibration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearIfmr {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearIfmr {
    /// Chandrasekhar mass; remnants are never heavier.
    const MAX_WD_MASS: f64 = 1.38;

    pub fn kalirai_2008() -> Self {
        Self {
            slope: 0.109,
            intercept: 0.394,
        }
    }
}

impl Default for LinearIfmr {
    fn default() -> Self {
        Self::kalirai_2008()
    }
}

impl InitialFinalMassRelation for LinearIfmr {
    fn final_mass(&self, progenitor: Mass) -> Mass {
        let m = self.slope * progenitor.to_solar_masses() + self.intercept;
        Mass::from_solar_masses(m.min(Self::MAX_WD_MASS))
    }
}
