//! Cross-sample aggregate table.
//!
//! One row per successfully analysed sample:
//!
//! `sample name, date, lat, lon, <19 statistics>, <estimator> [Porosity] x5,
//! <estimator> [Estimated kf] x5, <percent passing per grain size>`
//!
//! The grain-size columns are the union of every sample's sieve set, coarsest
//! first, so samples sieved with different sets still line up. Failed samples
//! are kept aside with their errors and never contribute a row.

use tracing::warn;

use crate::analysis::SampleAnalysis;
use crate::domain::{Estimator, Statistic};
use crate::error::SampleError;

/// Leading metadata columns.
pub const METADATA_COLUMNS: [&str; 4] = ["sample name", "date", "lat", "lon"];

/// A text or numeric cell; `Empty` for missing values.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    fn from_opt_text(v: Option<String>) -> Self {
        v.map(Cell::Text).unwrap_or(Cell::Empty)
    }

    fn from_opt_number(v: Option<f64>) -> Self {
        v.map(Cell::Number).unwrap_or(Cell::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Render for CSV: numbers at full precision, NaN as `NaN`.
    pub fn render(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(v) => format!("{v}"),
            Cell::Empty => String::new(),
        }
    }
}

/// Multi-sample table keyed by sample name.
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub failures: Vec<SampleError>,
}

impl AggregateTable {
    /// Build from batch results, preserving input order.
    pub fn from_results(results: &[Result<SampleAnalysis, SampleError>]) -> Self {
        let analyses: Vec<&SampleAnalysis> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let failures: Vec<SampleError> = results.iter().filter_map(|r| r.as_ref().err().cloned()).collect();
        for failure in &failures {
            warn!(sample = %failure.sample, "excluded from aggregate table");
        }

        let sizes = grain_size_columns(&analyses);
        let mut columns = fixed_columns();
        columns.extend(sizes.iter().map(|s| format_size(*s)));

        let rows = analyses.iter().map(|a| build_row(a, &sizes)).collect();

        Self {
            columns,
            rows,
            failures,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(row, column name)`.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }
}

/// Column names that do not depend on the sieve sets: metadata, statistics,
/// porosities, conductivities.
pub fn fixed_columns() -> Vec<String> {
    let mut columns: Vec<String> = METADATA_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(Statistic::ALL.iter().map(|s| s.name().to_string()));
    columns.extend(Estimator::ALL.iter().map(|e| porosity_column(*e)));
    columns.extend(Estimator::ALL.iter().map(|e| conductivity_column(*e)));
    columns
}

pub fn porosity_column(estimator: Estimator) -> String {
    format!("{} [Porosity]", estimator.name())
}

pub fn conductivity_column(estimator: Estimator) -> String {
    format!("{} [Estimated kf]", estimator.name())
}

fn grain_size_columns(analyses: &[&SampleAnalysis]) -> Vec<f64> {
    // `-0.0` pans share the `0` column.
    let mut sizes: Vec<f64> = analyses
        .iter()
        .flat_map(|a| a.cumulative.grain_sizes())
        .map(|s| if s == 0.0 { 0.0 } else { s })
        .collect();
    sizes.sort_by(|a, b| b.total_cmp(a));
    sizes.dedup();
    sizes
}

fn format_size(size: f64) -> String {
    format!("{size}")
}

fn build_row(analysis: &SampleAnalysis, sizes: &[f64]) -> Vec<Cell> {
    let meta = &analysis.metadata;
    let mut row = vec![
        Cell::from_opt_text(meta.name.clone()),
        Cell::from_opt_text(meta.export_date()),
        Cell::from_opt_number(meta.latitude),
        Cell::from_opt_number(meta.longitude),
    ];

    row.extend(analysis.statistics.iter().map(|(_, v)| Cell::Number(v)));

    let table = &analysis.porosity_conductivity;
    row.extend(Estimator::ALL.iter().map(|e| Cell::from_opt_number(table.get(*e).map(|r| r.porosity))));
    row.extend(
        Estimator::ALL
            .iter()
            .map(|e| Cell::from_opt_number(table.get(*e).map(|r| r.hydraulic_conductivity_m_per_s))),
    );

    row.extend(sizes.iter().map(|&size| {
        let value = analysis
            .cumulative
            .rows()
            .iter()
            .find(|r| r.grain_size_mm == size)
            .map(|r| r.percent_cumulative);
        Cell::from_opt_number(value)
    }));

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::domain::{SampleMetadata, SievingSample};
    use crate::error::AnalysisError;

    fn analysis(name: &str, pairs: &[(f64, f64)]) -> SampleAnalysis {
        let sample = SievingSample::from_pairs(pairs.iter().copied()).unwrap();
        analyze(&sample, &SampleMetadata::named(name)).unwrap()
    }

    #[test]
    fn fixed_column_count() {
        assert_eq!(fixed_columns().len(), 4 + 19 + 5 + 5);
        assert_eq!(fixed_columns()[4], "d10");
        assert_eq!(fixed_columns()[23], "Carling and Reader (1982) [Porosity]");
        assert_eq!(fixed_columns()[28], "Carling and Reader (1982) [Estimated kf]");
    }

    #[test]
    fn union_of_sieve_sets_coarsest_first() {
        let results = vec![
            Ok(analysis("a", &[(20.0, 10.0), (10.0, 20.0), (5.0, 20.0)])),
            Ok(analysis("b", &[(16.0, 10.0), (10.0, 20.0), (2.0, 30.0)])),
        ];
        let table = AggregateTable::from_results(&results);
        let size_columns: Vec<&str> = table.columns[fixed_columns().len()..].iter().map(String::as_str).collect();
        assert_eq!(size_columns, vec!["20", "16", "10", "5", "2"]);

        assert_eq!(table.cell(0, "16"), Some(&Cell::Empty));
        assert_eq!(table.cell(0, "20").and_then(Cell::as_number), Some(100.0));
        assert_eq!(table.cell(1, "sample name"), Some(&Cell::Text("b".to_string())));
    }

    #[test]
    fn signed_zero_pans_share_one_column() {
        let results = vec![
            Ok(analysis("a", &[(4.0, 1.0), (2.0, 1.0), (1.0, 0.0), (0.0, 0.0)])),
            Ok(analysis("b", &[(4.0, 1.0), (2.0, 1.0), (1.0, 0.0), (-0.0, 0.0)])),
        ];
        let table = AggregateTable::from_results(&results);
        let size_columns: Vec<&str> = table.columns[fixed_columns().len()..].iter().map(String::as_str).collect();
        assert_eq!(size_columns, vec!["4", "2", "1", "0"]);
        assert_eq!(table.cell(0, "0").and_then(Cell::as_number), Some(0.0));
        assert_eq!(table.cell(1, "0").and_then(Cell::as_number), Some(0.0));
    }

    #[test]
    fn failed_samples_are_excluded() {
        let results = vec![
            Ok(analysis("ok", &[(20.0, 10.0), (10.0, 20.0)])),
            Err(SampleError::new("bad", AnalysisError::DivisionByZero("total sample mass is zero"))),
        ];
        let table = AggregateTable::from_results(&results);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.failures.len(), 1);
        assert_eq!(table.failures[0].sample, "bad");
        for row in &table.rows {
            assert_eq!(row.len(), table.columns.len());
        }
    }
}
