//! Mathematical utilities: linear interpolation and moment statistics.

pub mod interp;
pub mod moments;

pub use interp::*;
pub use moments::*;
