//! Formatted terminal output for one analysis and for batch failures.

use crate::analysis::SampleAnalysis;
use crate::domain::{CumulativeCurve, PorosityConductivityTable, StatisticSet};
use crate::error::SampleError;

/// Format the full sample summary (metadata + cumulative curve + statistics + porosity).
pub fn format_summary(analysis: &SampleAnalysis) -> String {
    let meta = &analysis.metadata;
    let mut out = String::new();

    out.push_str("=== sieve - grain size statistics ===\n");
    out.push_str(&format!("Sample: {}\n", meta.display_name()));
    if let Some(date) = meta.export_date() {
        out.push_str(&format!("Date: {date}\n"));
    }
    if let (Some(lat), Some(lon)) = (meta.latitude, meta.longitude) {
        out.push_str(&format!("Coordinates: {lat:.6}, {lon:.6}\n"));
    }
    out.push_str(&format!("Shape factor: {:.2}\n", meta.shape_factor));

    out.push_str("\nCumulative curve:\n");
    out.push_str(&format_cumulative(&analysis.cumulative));

    out.push_str("\nStatistics:\n");
    out.push_str(&format_statistics(&analysis.statistics));

    out.push_str("\nPorosity and hydraulic conductivity:\n");
    out.push_str(&format_porosity(&analysis.porosity_conductivity));

    out
}

pub fn format_cumulative(curve: &CumulativeCurve) -> String {
    let mut out = String::new();
    push_line(
        &mut out,
        format!("{:>10} {:>12} {:>10} {:>12}", "size [mm]", "mass [g]", "frac [%]", "cum [%]"),
    );
    push_line(&mut out, format!("{:-<10} {:-<12} {:-<10} {:-<12}", "", "", "", ""));
    for r in curve.rows() {
        push_line(
            &mut out,
            format!(
                "{:>10.3} {:>12.2} {:>10.2} {:>12.2}",
                r.grain_size_mm, r.fraction_mass_g, r.percent_fraction, r.percent_cumulative
            ),
        );
    }
    out
}

pub fn format_statistics(stats: &StatisticSet) -> String {
    let mut out = String::new();
    for (stat, value) in stats.iter() {
        push_line(&mut out, format!("{:<32} {:>12}", truncate(stat.name(), 32), fmt_value(value)));
    }
    out
}

pub fn format_porosity(table: &PorosityConductivityTable) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("{:<28} {:>10} {:>14}", "estimator", "porosity", "kf [m/s]"));
    push_line(&mut out, format!("{:-<28} {:-<10} {:-<14}", "", "", ""));
    for r in table.rows() {
        push_line(
            &mut out,
            format!(
                "{:<28} {:>10} {:>14}",
                truncate(r.estimator.name(), 28),
                fmt_value(r.porosity),
                fmt_kf(r.hydraulic_conductivity_m_per_s)
            ),
        );
    }
    out
}

/// Format the failures of a batch, one line per sample.
pub fn format_failures(failures: &[SampleError]) -> String {
    let mut out = String::new();
    if failures.is_empty() {
        return out;
    }
    out.push_str(&format!("Failed samples ({}):\n", failures.len()));
    for f in failures {
        out.push_str(&format!("- {}: {}\n", f.sample, f.source));
    }
    out
}

fn push_line(out: &mut String, line: String) {
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        return "n/a".to_string();
    }
    format!("{v:.4}")
}

fn fmt_kf(v: f64) -> String {
    if v.is_nan() {
        return "n/a".to_string();
    }
    format!("{v:.3e}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
