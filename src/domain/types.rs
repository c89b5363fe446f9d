//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages by value
//! - exported to JSON/CSV
//! - concatenated across samples into one aggregate table
//!
//! Every table is flat and ordered, and every column has a fixed name.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Shape factor for rounded sediment, used when the sample sheet gives none.
pub const DEFAULT_SHAPE_FACTOR: f64 = 6.10;

/// Number of abscissas in the interpolated percentile curve (0 %..=100 %).
pub const INTERPOLATION_POINTS: usize = 401;

/// Spacing of the interpolated percentile curve, in cumulative percent.
pub const INTERPOLATION_STEP: f64 = 0.25;

/// One sieve of a sieving table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieveRow {
    pub grain_size_mm: f64,
    pub fraction_mass_g: f64,
}

impl SieveRow {
    pub fn new(grain_size_mm: f64, fraction_mass_g: f64) -> Self {
        Self {
            grain_size_mm,
            fraction_mass_g,
        }
    }
}

/// A validated sieving table, coarsest sieve first.
///
/// Construction enforces:
/// - at least two rows (interpolation needs two support points)
/// - finite, non-negative grain sizes in strictly decreasing order
/// - finite, non-negative masses
///
/// Total mass is *not* checked here; a zero total is a `DivisionByZero`
/// raised by the cumulative stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SievingSample {
    rows: Vec<SieveRow>,
}

impl SievingSample {
    pub fn new(rows: Vec<SieveRow>) -> Result<Self, AnalysisError> {
        if rows.len() < 2 {
            return Err(AnalysisError::invalid(format!(
                "sieving table needs at least 2 rows, got {}",
                rows.len()
            )));
        }

        for (idx, row) in rows.iter().enumerate() {
            if !(row.grain_size_mm.is_finite() && row.grain_size_mm >= 0.0) {
                return Err(AnalysisError::invalid(format!(
                    "row {}: grain size {} mm must be finite and >= 0",
                    idx + 1,
                    row.grain_size_mm
                )));
            }
            if !(row.fraction_mass_g.is_finite() && row.fraction_mass_g >= 0.0) {
                return Err(AnalysisError::invalid(format!(
                    "row {}: fraction mass {} g must be finite and >= 0",
                    idx + 1,
                    row.fraction_mass_g
                )));
            }
        }

        for (idx, pair) in rows.windows(2).enumerate() {
            if pair[1].grain_size_mm >= pair[0].grain_size_mm {
                return Err(AnalysisError::invalid(format!(
                    "grain sizes must strictly decrease: row {} ({} mm) is not finer than row {} ({} mm)",
                    idx + 2,
                    pair[1].grain_size_mm,
                    idx + 1,
                    pair[0].grain_size_mm
                )));
            }
        }

        Ok(Self { rows })
    }

    /// Build from `(grain_size_mm, fraction_mass_g)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, AnalysisError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(size, mass)| SieveRow::new(size, mass))
                .collect(),
        )
    }

    pub fn rows(&self) -> &[SieveRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_mass(&self) -> f64 {
        self.rows.iter().map(|r| r.fraction_mass_g).sum()
    }
}

/// Descriptive information that travels with a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    pub name: Option<String>,
    /// Collection date as written on the sample sheet.
    pub collection_date: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Porosity measured by other means (e.g. photogrammetry), as a fraction.
    pub user_porosity: Option<f64>,
    /// Grain sphericity correction for Kozeny–Carman.
    pub shape_factor: f64,
}

impl Default for SampleMetadata {
    fn default() -> Self {
        Self {
            name: None,
            collection_date: None,
            latitude: None,
            longitude: None,
            user_porosity: None,
            shape_factor: DEFAULT_SHAPE_FACTOR,
        }
    }
}

impl SampleMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Identity used in errors and logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }

    /// Parse the collection date if it uses one of the common sheet formats.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        const FORMATS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];

        let raw = self.collection_date.as_deref()?.trim();
        // Spreadsheet exports often carry a midnight time component.
        let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
    }

    /// Collection date for exports: ISO form when parseable, verbatim otherwise.
    pub fn export_date(&self) -> Option<String> {
        match self.parsed_date() {
            Some(date) => Some(date.format("%Y-%m-%d").to_string()),
            None => self.collection_date.clone(),
        }
    }
}

/// One row of the cumulative curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativeRow {
    pub grain_size_mm: f64,
    pub fraction_mass_g: f64,
    pub percent_fraction: f64,
    pub percent_cumulative: f64,
}

/// Percent-passing curve, same row order as the sieving table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeCurve {
    pub(crate) rows: Vec<CumulativeRow>,
}

impl CumulativeCurve {
    pub fn rows(&self) -> &[CumulativeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn grain_sizes(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.grain_size_mm)
    }

    pub fn percent_cumulative(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.percent_cumulative)
    }

    /// Row whose grain size is nearest to `size_mm`; ties go to the coarser row.
    pub fn nearest_row(&self, size_mm: f64) -> Option<&CumulativeRow> {
        let mut best: Option<&CumulativeRow> = None;
        for row in &self.rows {
            let dist = (row.grain_size_mm - size_mm).abs();
            match best {
                Some(b) if (b.grain_size_mm - size_mm).abs() <= dist => {}
                _ => best = Some(row),
            }
        }
        best
    }
}

/// Dense percentile curve: grain size at every 0.25 % of cumulative mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolatedCurve {
    pub(crate) cumulative_percent: Vec<f64>,
    pub(crate) grain_size_mm: Vec<f64>,
}

impl InterpolatedCurve {
    pub fn cumulative_percent(&self) -> &[f64] {
        &self.cumulative_percent
    }

    pub fn grain_sizes(&self) -> &[f64] {
        &self.grain_size_mm
    }

    pub fn len(&self) -> usize {
        self.grain_size_mm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grain_size_mm.is_empty()
    }

    /// Grain size at exactly `percent` cumulative.
    ///
    /// Fails with `MissingPercentile` when `percent` is not a grid member or the
    /// interpolated value there is not finite.
    pub fn percentile(&self, percent: f64) -> Result<f64, AnalysisError> {
        self.cumulative_percent
            .iter()
            .position(|&p| p == percent)
            .map(|idx| self.grain_size_mm[idx])
            .filter(|v| v.is_finite())
            .ok_or(AnalysisError::MissingPercentile(percent))
    }
}

/// Key of the fixed 19-entry statistic catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    D10,
    D16,
    D25,
    D30,
    D50,
    D60,
    D75,
    D84,
    D90,
    MeanGrainSize,
    GeometricMean,
    SortingIndex,
    FredleIndex,
    StandardDeviation,
    GeometricStandardDeviation,
    Skewness,
    Kurtosis,
    UniformityCoefficient,
    CurvatureCoefficient,
}

impl Statistic {
    pub const COUNT: usize = 19;

    /// Catalogue order, which is also the column order of every export.
    pub const ALL: [Statistic; Self::COUNT] = [
        Statistic::D10,
        Statistic::D16,
        Statistic::D25,
        Statistic::D30,
        Statistic::D50,
        Statistic::D60,
        Statistic::D75,
        Statistic::D84,
        Statistic::D90,
        Statistic::MeanGrainSize,
        Statistic::GeometricMean,
        Statistic::SortingIndex,
        Statistic::FredleIndex,
        Statistic::StandardDeviation,
        Statistic::GeometricStandardDeviation,
        Statistic::Skewness,
        Statistic::Kurtosis,
        Statistic::UniformityCoefficient,
        Statistic::CurvatureCoefficient,
    ];

    /// The characteristic diameters, finest percentile first.
    pub const DIAMETERS: [Statistic; 9] = [
        Statistic::D10,
        Statistic::D16,
        Statistic::D25,
        Statistic::D30,
        Statistic::D50,
        Statistic::D60,
        Statistic::D75,
        Statistic::D84,
        Statistic::D90,
    ];

    /// Stable column name.
    pub fn name(self) -> &'static str {
        match self {
            Statistic::D10 => "d10",
            Statistic::D16 => "d16",
            Statistic::D25 => "d25",
            Statistic::D30 => "d30",
            Statistic::D50 => "d50",
            Statistic::D60 => "d60",
            Statistic::D75 => "d75",
            Statistic::D84 => "d84",
            Statistic::D90 => "d90",
            Statistic::MeanGrainSize => "Mean Grain Size dm [mm]",
            Statistic::GeometricMean => "Geometrical mean dg [mm]",
            Statistic::SortingIndex => "Sorting Index 1 ds",
            Statistic::FredleIndex => "Fredle - Index",
            Statistic::StandardDeviation => "Grain Size std",
            Statistic::GeometricStandardDeviation => "Geometric Standard Deviation",
            Statistic::Skewness => "Skewness",
            Statistic::Kurtosis => "Kurtosis",
            Statistic::UniformityCoefficient => "Coefficient of uniformity - Cu",
            Statistic::CurvatureCoefficient => "Curvature coefficient - Cc",
        }
    }

    /// Cumulative percent for characteristic diameters, `None` for derived statistics.
    pub fn percentile(self) -> Option<f64> {
        match self {
            Statistic::D10 => Some(10.0),
            Statistic::D16 => Some(16.0),
            Statistic::D25 => Some(25.0),
            Statistic::D30 => Some(30.0),
            Statistic::D50 => Some(50.0),
            Statistic::D60 => Some(60.0),
            Statistic::D75 => Some(75.0),
            Statistic::D84 => Some(84.0),
            Statistic::D90 => Some(90.0),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Statistic> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The full statistic catalogue of one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticSet {
    values: [f64; Statistic::COUNT],
}

impl StatisticSet {
    pub(crate) fn from_values(values: [f64; Statistic::COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, stat: Statistic) -> f64 {
        self.values[stat.index()]
    }

    pub fn by_name(&self, name: &str) -> Option<f64> {
        Statistic::from_name(name).map(|s| self.get(s))
    }

    /// `(statistic, value)` pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (Statistic, f64)> + '_ {
        Statistic::ALL.into_iter().map(|s| (s, self.get(s)))
    }
}

/// Serialized as an ordered list of `{ "name": ..., "value": ... }` entries.
impl Serialize for StatisticSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Entry {
            name: &'static str,
            value: f64,
        }

        serializer.collect_seq(self.iter().map(|(s, value)| Entry {
            name: s.name(),
            value,
        }))
    }
}

/// Porosity estimators, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estimator {
    CarlingReader,
    WuWang,
    Wooster,
    Frings,
    User,
}

impl Estimator {
    pub const ALL: [Estimator; 5] = [
        Estimator::CarlingReader,
        Estimator::WuWang,
        Estimator::Wooster,
        Estimator::Frings,
        Estimator::User,
    ];

    /// Stable row name.
    pub fn name(self) -> &'static str {
        match self {
            Estimator::CarlingReader => "Carling and Reader (1982)",
            Estimator::WuWang => "Wu and Wang (2006)",
            Estimator::Wooster => "Wooster et al. (2008)",
            Estimator::Frings => "Frings et al. (2011)",
            Estimator::User => "User input",
        }
    }
}

/// One estimator's porosity and the matching hydraulic conductivity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PorosityConductivityRow {
    #[serde(serialize_with = "serialize_estimator_name")]
    pub estimator: Estimator,
    /// Fraction 0–1; NaN when undefined.
    pub porosity: f64,
    /// Kozeny–Carman conductivity; NaN when the porosity is undefined.
    pub hydraulic_conductivity_m_per_s: f64,
}

impl PorosityConductivityRow {
    /// Porosity, or `UndefinedPorosity` when the row carries none.
    pub fn checked_porosity(&self) -> Result<f64, AnalysisError> {
        if self.porosity.is_nan() {
            Err(AnalysisError::UndefinedPorosity(self.estimator.name()))
        } else {
            Ok(self.porosity)
        }
    }
}

fn serialize_estimator_name<S: serde::Serializer>(
    estimator: &Estimator,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(estimator.name())
}

/// Porosity estimates and conductivities, one row per `Estimator::ALL` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PorosityConductivityTable {
    pub(crate) rows: Vec<PorosityConductivityRow>,
}

impl PorosityConductivityTable {
    pub fn rows(&self) -> &[PorosityConductivityRow] {
        &self.rows
    }

    pub fn get(&self, estimator: Estimator) -> Option<&PorosityConductivityRow> {
        self.rows.iter().find(|r| r.estimator == estimator)
    }

    pub fn by_name(&self, name: &str) -> Option<&PorosityConductivityRow> {
        self.rows.iter().find(|r| r.estimator.name() == name)
    }
}
