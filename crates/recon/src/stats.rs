use keycomp_table::Table;

use crate::model::{LengthStats, NORMALIZED_KEY};

/// Character-length statistics over a sequence of strings. Empty input
/// yields all zeros; the mean is rounded to 2 decimal places.
pub fn length_stats<S: AsRef<str>>(values: &[S]) -> LengthStats {
    if values.is_empty() {
        return LengthStats::default();
    }

    let mut min = usize::MAX;
    let mut max = 0usize;
    let mut total = 0usize;
    for value in values {
        let len = value.as_ref().chars().count();
        min = min.min(len);
        max = max.max(len);
        total += len;
    }

    LengthStats {
        min,
        max,
        mean: round2(total as f64 / values.len() as f64),
    }
}

/// Length statistics of a table's `normalized_key` column.
pub fn key_length_stats(table: &Table) -> LengthStats {
    let keys: Vec<String> = table
        .column(NORMALIZED_KEY)
        .map(|column| column.values.iter().map(|v| v.render_text()).collect())
        .unwrap_or_default();
    length_stats(&keys)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
