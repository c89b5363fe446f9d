//! Reporting utilities: cross-sample aggregation and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine stays free of presentation concerns
//! - output changes are localized

pub mod aggregate;
pub mod format;

pub use aggregate::*;
pub use format::*;
