//! The grain-size statistics engine.
//!
//! Four pure stages, each consuming the previous stage's output by reference:
//!
//! - `cumulative`: sieving table -> percent fraction + percent passing
//! - `interpolate`: percent passing -> 401-point percentile curve
//! - `statistics`: percentile curve -> 19 named statistics
//! - `porosity`: statistics -> porosity estimators + Kozeny–Carman conductivity
//!
//! `pipeline` chains them for one sample or a batch of independent samples.

pub mod cumulative;
pub mod interpolate;
pub mod pipeline;
pub mod porosity;
pub mod statistics;

pub use pipeline::*;
