pub mod mass;
pub mod time;

#[cfg(test)]
mod mass_test;

pub use mass::Mass;
pub use time::{GYR_TO_YEARS, MYR_TO_YEARS, Time};
