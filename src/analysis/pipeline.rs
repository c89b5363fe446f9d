//! Shared "analysis pipeline" logic used by the library API and the CLI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sieving table -> cumulative -> interpolated -> statistics -> porosity/conductivity
//!
//! Front-ends can then focus on presentation (printing vs exporting).

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::analysis::{cumulative, interpolate, porosity, statistics};
use crate::domain::{
    CumulativeCurve, InterpolatedCurve, PorosityConductivityTable, SampleMetadata, SievingSample, StatisticSet,
};
use crate::error::{AnalysisError, SampleError};

/// All computed outputs for one sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleAnalysis {
    pub metadata: SampleMetadata,
    pub cumulative: CumulativeCurve,
    #[serde(skip)]
    pub interpolated: InterpolatedCurve,
    pub statistics: StatisticSet,
    pub porosity_conductivity: PorosityConductivityTable,
}

/// One entry of a batch: a sieving table and its metadata.
#[derive(Debug, Clone)]
pub struct SampleInput {
    pub sample: SievingSample,
    pub metadata: SampleMetadata,
}

/// Execute the full pipeline for one sample.
pub fn analyze(sample: &SievingSample, metadata: &SampleMetadata) -> Result<SampleAnalysis, SampleError> {
    let name = metadata.display_name();
    let _span = debug_span!("analyze", sample = name).entered();

    run_stages(sample, metadata).map_err(|e| SampleError::new(name, e))
}

fn run_stages(sample: &SievingSample, metadata: &SampleMetadata) -> Result<SampleAnalysis, AnalysisError> {
    // 1) Percent fraction + percent passing.
    let cumulative = cumulative::build(sample)?;

    // 2) Dense percentile curve backing every statistic.
    let interpolated = interpolate::interpolate(&cumulative);

    // 3) Characteristic diameters and derived indices.
    let statistics = statistics::compute(&cumulative, &interpolated)?;

    // 4) Porosity estimators and conductivities.
    let porosity_conductivity =
        porosity::estimate(&statistics, &cumulative, metadata.user_porosity, metadata.shape_factor)?;

    debug!(rows = sample.len(), "analysis complete");

    Ok(SampleAnalysis {
        metadata: metadata.clone(),
        cumulative,
        interpolated,
        statistics,
        porosity_conductivity,
    })
}

/// Analyse independent samples in parallel.
///
/// Returns one result per input, in input order. A failing sample does not
/// affect the others. Unnamed samples are identified by their 1-based position.
pub fn analyze_batch(inputs: &[SampleInput]) -> Vec<Result<SampleAnalysis, SampleError>> {
    inputs
        .par_iter()
        .enumerate()
        .map(|(idx, input)| {
            let result = if input.metadata.name.is_some() {
                analyze(&input.sample, &input.metadata)
            } else {
                let mut metadata = input.metadata.clone();
                metadata.name = Some(format!("sample #{}", idx + 1));
                analyze(&input.sample, &metadata)
            };
            if let Err(err) = &result {
                warn!(error = %err, "sample failed");
            }
            result
        })
        .collect()
}
