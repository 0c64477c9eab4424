use keycomp_table::Table;
use serde::{Deserialize, Serialize};

use crate::stats::key_length_stats;

/// Name of the derived join-key column added to every normalized table.
pub const NORMALIZED_KEY: &str = "normalized_key";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Character trimming applied to a value's text form before digit
/// extraction. When disabled, both offsets are treated as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrimSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub trim_start: usize,
    #[serde(default)]
    pub trim_end: usize,
}

impl TrimSpec {
    pub fn effective(&self) -> (usize, usize) {
        if self.enabled {
            (self.trim_start, self.trim_end)
        } else {
            (0, 0)
        }
    }
}

/// Per-dataset comparison inputs: which column is the join key, which
/// columns ride along into the output, and how the key is trimmed.
#[derive(Debug, Clone, Default)]
pub struct SideSpec {
    pub key_column: String,
    pub extra_columns: Vec<String>,
    pub trim: TrimSpec,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Unique matches and unique non-matches of one comparison run.
///
/// Both tables carry `normalized_key` first, then dataset-2 extras
/// (suffixed `_dataset2`), then dataset-1 extras (suffixed `_dataset1`).
/// Every cell is rendered as accent-stripped text; `normalized_key` values
/// are unique within each table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub matches: Table,
    pub non_matches: Table,
}

/// Counts derived from one comparison run. `total_records` and
/// `total_unique` describe the raw dataset 2; the duplicate counts are the
/// rows dropped by the first-wins dedup of matches / non-matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total_records: usize,
    pub total_unique: usize,
    pub unique_matches: usize,
    pub unique_non_matches: usize,
    pub duplicate_matches: usize,
    pub duplicate_non_matches: usize,
}

/// Character-length statistics over a set of strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CompareMeta {
    pub job_name: String,
    pub engine_version: String,
    pub run_at: String,
}

/// Everything one comparison run produces, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutcome {
    pub meta: CompareMeta,
    pub statistics: Statistics,
    pub match_key_lengths: LengthStats,
    pub non_match_key_lengths: LengthStats,
    pub matches: Table,
    pub non_matches: Table,
}

impl CompareOutcome {
    /// Wrap a comparison result with run metadata and key-length stats.
    pub fn new(job_name: &str, result: MatchResult, statistics: Statistics) -> Self {
        CompareOutcome {
            meta: CompareMeta {
                job_name: job_name.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            statistics,
            match_key_lengths: key_length_stats(&result.matches),
            non_match_key_lengths: key_length_stats(&result.non_matches),
            matches: result.matches,
            non_matches: result.non_matches,
        }
    }
}
