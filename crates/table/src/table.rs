use serde::Serialize;

use crate::error::TableError;
use crate::value::Value;

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// An ordered collection of equal-length named columns. Row *i* across all
/// columns forms one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table with the given column names, ready for `push_row`.
    pub fn with_names<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Table {
            columns: names
                .into_iter()
                .map(|name| Column {
                    name: name.into(),
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(TableError::ShapeMismatch {
                        expected,
                        actual: column.values.len(),
                    });
                }
            }
        }
        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn cell(&self, column: &str, row: usize) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Replace the named column, or append it if absent.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), TableError> {
        if !self.columns.is_empty() && values.len() != self.row_count() {
            return Err(TableError::ShapeMismatch {
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::ShapeMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
        Ok(())
    }

    /// A new table holding only the named columns, in the given order.
    pub fn project(&self, names: &[&str]) -> Result<Table, TableError> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self
                .column(name)
                .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))?;
            columns.push(column.clone());
        }
        Ok(Table { columns })
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<(), TableError> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == from)
            .ok_or_else(|| TableError::ColumnNotFound(from.to_string()))?;
        column.name = to.to_string();
        Ok(())
    }

    /// A new table holding the given rows (by index), in the given order.
    /// Out-of-range indices are skipped.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let row_count = self.row_count();
        let rows: Vec<usize> = rows.iter().copied().filter(|&r| r < row_count).collect();
        Table {
            columns: self
                .columns
                .iter()
                .map(|column| Column {
                    name: column.name.clone(),
                    values: rows.iter().map(|&r| column.values[r].clone()).collect(),
                })
                .collect(),
        }
    }

    /// Keep rows whose rendered `column` value appears in `allowed`,
    /// preserving original order.
    pub fn filter_rows(&self, column: &str, allowed: &[String]) -> Result<Table, TableError> {
        let target = self
            .column(column)
            .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;
        let keep: Vec<usize> = target
            .values
            .iter()
            .enumerate()
            .filter(|(_, value)| {
                let text = value.render_text();
                allowed.iter().any(|a| *a == text)
            })
            .map(|(row, _)| row)
            .collect();
        Ok(self.select_rows(&keep))
    }
}
