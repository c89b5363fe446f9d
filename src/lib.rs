//! `sieve-stats` library crate.
//!
//! Grain-size statistics from laboratory sieving tables: cumulative curve,
//! percentile curve, characteristic diameters and sorting indices, porosity
//! estimators and Kozeny–Carman hydraulic conductivity.
//!
//! The binary (`sieve`) is a thin wrapper around this library so that:
//!
//! - the engine is testable without spawning processes
//! - ingestion and rendering front-ends can call the pipeline directly

pub mod analysis;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;

pub use analysis::{SampleAnalysis, SampleInput, analyze, analyze_batch};
pub use domain::{SampleMetadata, SieveRow, SievingSample};
pub use error::{AnalysisError, AppError, SampleError};
