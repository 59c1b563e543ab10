use std::fmt;

use serde::{Deserialize, Serialize};

/// Dominant element in a white dwarf's atmosphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atmosphere {
    /// Hydrogen-rich (spectral type DA)
    H,
    /// Helium-rich (spectral types DB/DC/DQ)
    He,
}

impl fmt::Display for Atmosphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match self {
            Atmosphere::H => "H",
            Atmosphere::He => "He",
        };
        write!(f, "{}", str)
    }
}

/// Photometric band in which magnitudes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Filter {
    /// Bolometric magnitude
    Bolometric,
    /// Johnson V
    V,
    /// Gaia G
    G,
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let str = match self {
            Filter::Bolometric => "Mbol",
            Filter::V => "V",
            Filter::G => "G",
        };
        write!(f, "{}", str)
    }
}
