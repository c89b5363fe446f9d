//! Output helpers.
//!
//! - CSV tables for spreadsheets and the aggregate export (`export`)
//! - JSON bundle of a whole analysis (`json`)

pub mod export;
pub mod json;

pub use export::*;
pub use json::*;
