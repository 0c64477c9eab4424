use serde::Deserialize;

use crate::error::CompareError;
use crate::model::{SideSpec, TrimSpec};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// One comparison job: two sources, a key column each, and output options.
/// Dataset 2 is compared against dataset 1.
#[derive(Debug, Deserialize)]
pub struct CompareConfig {
    pub name: String,
    pub dataset1: SourceConfig,
    pub dataset2: SourceConfig,
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where one dataset comes from and how its key is prepared.
///
/// Exactly one of `file` (CSV/Excel) or `db` (SQLite) must be set. `sheet`
/// selects an Excel worksheet; `query` overrides the default SQL for
/// database sources.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub sheet: Option<String>,
    pub key_column: String,
    #[serde(default)]
    pub extra_columns: Vec<String>,
    #[serde(default)]
    pub trim: TrimSpec,
    #[serde(default)]
    pub filter: Option<RowFilter>,
}

/// Keep only rows whose `column` value is one of `values`.
#[derive(Debug, Clone, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, CompareError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| CompareError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        self.dataset1.validate("dataset1")?;
        self.dataset2.validate("dataset2")?;
        Ok(())
    }
}

impl SourceConfig {
    fn validate(&self, label: &str) -> Result<(), CompareError> {
        let invalid =
            |msg: String| -> Result<(), CompareError> { Err(CompareError::ConfigValidation(msg)) };

        match (&self.file, &self.db) {
            (Some(_), Some(_)) => {
                return invalid(format!("{label}: set either 'file' or 'db', not both"))
            }
            (None, None) => return invalid(format!("{label}: one of 'file' or 'db' is required")),
            _ => {}
        }
        if self.query.is_some() && self.db.is_none() {
            return invalid(format!("{label}: 'query' applies to db sources only"));
        }
        if self.sheet.is_some() && self.file.is_none() {
            return invalid(format!("{label}: 'sheet' applies to file sources only"));
        }
        if self.key_column.is_empty() {
            return invalid(format!("{label}: 'key_column' must not be empty"));
        }
        if self.extra_columns.iter().any(|c| *c == self.key_column) {
            return invalid(format!(
                "{label}: key column '{}' repeated in 'extra_columns'",
                self.key_column
            ));
        }
        for (i, extra) in self.extra_columns.iter().enumerate() {
            if self.extra_columns[..i].contains(extra) {
                return invalid(format!("{label}: duplicate extra column '{extra}'"));
            }
        }
        if let Some(ref filter) = self.filter {
            if filter.values.is_empty() {
                return invalid(format!("{label}: filter 'values' must not be empty"));
            }
        }
        Ok(())
    }

    /// The comparison inputs this source contributes.
    pub fn side_spec(&self) -> SideSpec {
        SideSpec {
            key_column: self.key_column.clone(),
            extra_columns: self.extra_columns.clone(),
            trim: self.trim,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
