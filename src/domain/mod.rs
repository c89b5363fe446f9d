//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the validated input table (`SievingSample`) and its `SampleMetadata`
//! - the per-stage outputs (`CumulativeCurve`, `InterpolatedCurve`)
//! - the named result tables (`StatisticSet`, `PorosityConductivityTable`)

pub mod types;

pub use types::*;
