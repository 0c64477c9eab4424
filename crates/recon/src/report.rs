use std::fmt::Write;

use crate::model::{CompareOutcome, LengthStats, Statistics};

/// Summary for a full outcome, stamped with its own run timestamp.
pub fn render_outcome_summary(outcome: &CompareOutcome) -> String {
    render_summary(
        &outcome.statistics,
        &outcome.match_key_lengths,
        &outcome.non_match_key_lengths,
        &outcome.meta.run_at,
    )
}

/// Render the plain-text comparison summary: `key: value` lines, UTF-8.
/// The caller supplies the run timestamp so rendering stays deterministic.
pub fn render_summary(
    statistics: &Statistics,
    match_key_lengths: &LengthStats,
    non_match_key_lengths: &LengthStats,
    run_at: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "comparison summary");
    let _ = writeln!(out, "date: {run_at}");
    let _ = writeln!(out);
    let _ = writeln!(out, "total records: {}", statistics.total_records);
    let _ = writeln!(out, "total unique records: {}", statistics.total_unique);
    let _ = writeln!(out, "unique matches: {}", statistics.unique_matches);
    let _ = writeln!(out, "unique non-matches: {}", statistics.unique_non_matches);
    let _ = writeln!(out, "duplicate matches: {}", statistics.duplicate_matches);
    let _ = writeln!(
        out,
        "duplicate non-matches: {}",
        statistics.duplicate_non_matches
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "key length in unique matches:");
    write_lengths(&mut out, match_key_lengths);
    let _ = writeln!(out);
    let _ = writeln!(out, "key length in unique non-matches:");
    write_lengths(&mut out, non_match_key_lengths);
    out
}

fn write_lengths(out: &mut String, lengths: &LengthStats) {
    let _ = writeln!(out, "  min: {} characters", lengths.min);
    let _ = writeln!(out, "  max: {} characters", lengths.max);
    let _ = writeln!(out, "  mean: {} characters", lengths.mean);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_statistic() {
        let statistics = Statistics {
            total_records: 10,
            total_unique: 8,
            unique_matches: 5,
            unique_non_matches: 3,
            duplicate_matches: 2,
            duplicate_non_matches: 1,
        };
        let matches = LengthStats { min: 7, max: 9, mean: 8.25 };
        let non_matches = LengthStats { min: 0, max: 0, mean: 0.0 };

        let summary = render_summary(&statistics, &matches, &non_matches, "2026-08-06T00:00:00Z");

        assert!(summary.contains("date: 2026-08-06T00:00:00Z"));
        assert!(summary.contains("total records: 10"));
        assert!(summary.contains("total unique records: 8"));
        assert!(summary.contains("unique matches: 5"));
        assert!(summary.contains("unique non-matches: 3"));
        assert!(summary.contains("duplicate matches: 2"));
        assert!(summary.contains("duplicate non-matches: 1"));
        assert!(summary.contains("mean: 8.25 characters"));
    }
}
