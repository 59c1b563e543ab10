//! Stellar physics collaborators for white-dwarf population synthesis.
//!
//! Each stage of a star's life that a luminosity-function model needs is a
//! narrow trait with a pure `&self` method:
//!
//! - [`InitialMassFunction`]: draw a progenitor mass
//! - [`InitialFinalMassRelation`]: progenitor mass → white-dwarf mass
//! - [`PreWdLifetime`]: time from formation to the white-dwarf phase
//! - [`CoolingModel`]: cooling age → absolute magnitude
//!
//! Reference implementations of every trait live alongside them so that a
//! population can be simulated without external model tables.

pub mod atmosphere;
pub mod cooling;
pub mod ifmr;
pub mod imf;
pub mod lifetime;
pub mod sampling;

#[cfg(test)]
mod cooling_test;
#[cfg(test)]
mod lifetime_test;
#[cfg(test)]
mod sampling_test;

pub use atmosphere::{Atmosphere, Filter};
pub use cooling::{CoolingModel, MestelCooling};
pub use ifmr::{InitialFinalMassRelation, LinearIfmr};
pub use imf::{InitialMassFunction, KroupaImf, PowerLawImf};
pub use lifetime::{PowerLawLifetime, PreWdLifetime};
