// SQLite sources: run a SELECT, materialize the rows as a Table

use std::path::Path;

use keycomp_table::{Table, TableError, Value};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use crate::error::QueryError;

/// Query used when a database source does not specify one.
pub const DEFAULT_QUERY: &str = "SELECT * FROM ConsolidatedData;";

/// Integers beyond f64 precision stay text so exact digits survive.
const MAX_SAFE_INTEGER: i64 = 1 << 53;

/// Open the database read-only, run `sql`, and materialize the full result
/// set. The connection lives only for the duration of this call.
pub fn load_query(path: &Path, sql: &str) -> Result<Table, QueryError> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| QueryError::Connection(e.to_string()))?;

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| QueryError::Sql(e.to_string()))?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
    let width = column_names.len();

    let mut table = Table::with_names(column_names.clone());
    let mut rows = stmt.query([]).map_err(|e| QueryError::Sql(e.to_string()))?;
    let mut row_idx = 0usize;
    while let Some(row) = rows.next().map_err(|e| QueryError::Sql(e.to_string()))? {
        let mut values: Vec<Value> = Vec::with_capacity(width);
        for (i, name) in column_names.iter().enumerate() {
            let value_ref = row
                .get_ref(i)
                .map_err(|e| QueryError::Sql(e.to_string()))?;
            values.push(map_value(value_ref, name, row_idx)?);
        }
        table.push_row(values).map_err(shape_error)?;
        row_idx += 1;
    }

    Ok(table)
}

fn map_value(value: ValueRef<'_>, column: &str, row: usize) -> Result<Value, QueryError> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(n) => {
            if n.unsigned_abs() <= MAX_SAFE_INTEGER as u64 {
                Ok(Value::Number(n as f64))
            } else {
                Ok(Value::Text(n.to_string()))
            }
        }
        ValueRef::Real(x) => Ok(Value::Number(x)),
        ValueRef::Text(bytes) => Ok(Value::Text(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Blob(_) => Err(QueryError::UnsupportedValue {
            column: column.to_string(),
            row,
        }),
    }
}

fn shape_error(error: TableError) -> QueryError {
    QueryError::Sql(error.to_string())
}
