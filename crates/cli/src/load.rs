//! Dataset loading: route each configured source to the right reader and
//! apply its optional row filter.

use std::path::Path;

use keycomp_io::{csv, sqlite, xlsx};
use keycomp_recon::SourceConfig;
use keycomp_table::{Table, TableError};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_MISSING_COLUMN, EXIT_QUERY};
use crate::CliError;

/// Load one dataset per its config. File paths are resolved relative to
/// the job config's directory.
pub fn load_source(source: &SourceConfig, base_dir: &Path, dataset: u8) -> Result<Table, CliError> {
    let table = if let Some(ref file) = source.file {
        let path = base_dir.join(file);
        load_file(&path, source.sheet.as_deref(), dataset)?
    } else if let Some(ref db) = source.db {
        let sql = source.query.as_deref().unwrap_or(sqlite::DEFAULT_QUERY);
        sqlite::load_query(&base_dir.join(db), sql).map_err(|e| CliError {
            code: EXIT_QUERY,
            message: format!("dataset {dataset}: {e}"),
        })?
    } else {
        // validate() guarantees one of file/db; reachable only on misuse
        return Err(CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("dataset {dataset}: no source configured"),
        });
    };

    match source.filter {
        Some(ref filter) => table
            .filter_rows(&filter.column, &filter.values)
            .map_err(|e| filter_error(e, dataset)),
        None => Ok(table),
    }
}

fn load_file(path: &Path, sheet: Option<&str>, dataset: u8) -> Result<Table, CliError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let result = match extension.as_str() {
        "xlsx" | "xls" | "xlsb" | "ods" => xlsx::import(path, sheet),
        _ => csv::import(path),
    };

    result.map_err(|e| CliError {
        code: EXIT_LOAD,
        message: format!("dataset {dataset}: {} ({})", e, path.display()),
    })
}

fn filter_error(error: TableError, dataset: u8) -> CliError {
    match error {
        TableError::ColumnNotFound(column) => CliError {
            code: EXIT_MISSING_COLUMN,
            message: format!("dataset {dataset}: filter column '{column}' not found"),
        },
        other => CliError {
            code: EXIT_LOAD,
            message: format!("dataset {dataset}: {other}"),
        },
    }
}
