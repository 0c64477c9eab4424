//! `keycomp-recon` — key-based dataset comparison engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns unique matches,
//! unique non-matches, and statistics. No CLI or IO dependencies.

pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;
pub mod stats;

pub use config::{CompareConfig, RowFilter, SourceConfig};
pub use error::CompareError;
pub use matcher::{compare, deduplicate};
pub use model::{
    CompareMeta, CompareOutcome, LengthStats, MatchResult, SideSpec, Statistics, TrimSpec,
    NORMALIZED_KEY,
};
pub use normalize::{normalize_column, normalize_value, strip_accents};
pub use report::{render_outcome_summary, render_summary};
pub use stats::length_stats;
