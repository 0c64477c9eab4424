// Excel import (calamine) and result export (rust_xlsxwriter)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use keycomp_table::{Table, Value};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::error::{LoadError, WriteError};

/// List the worksheets of an Excel file, in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, LoadError> {
    let workbook = open_workbook_auto(path)
        .map_err(|e| LoadError::Io(format!("failed to open Excel file: {e}")))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Import one worksheet of an Excel file (xlsx, xls, xlsb, ods). The first
/// row supplies the column names; `sheet` defaults to the first worksheet.
pub fn import(path: &Path, sheet: Option<&str>) -> Result<Table, LoadError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| LoadError::Io(format!("failed to open Excel file: {e}")))?;

    let names = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err(LoadError::Malformed("Excel file contains no sheets".into()));
    }
    let sheet_name = match sheet {
        Some(requested) => {
            if !names.iter().any(|n| n == requested) {
                return Err(LoadError::SheetNotFound(requested.to_string()));
            }
            requested.to_string()
        }
        None => names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Malformed(format!("failed to read sheet '{sheet_name}': {e}")))?;

    table_from_range(&range, &sheet_name)
}

fn table_from_range(range: &Range<Data>, sheet_name: &str) -> Result<Table, LoadError> {
    let mut rows = range.rows();

    let header_row = rows
        .next()
        .ok_or_else(|| LoadError::Malformed(format!("sheet '{sheet_name}' is empty")))?;
    let names: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = render_data(cell).render_text();
            if name.trim().is_empty() {
                format!("column_{i}")
            } else {
                name.trim().to_string()
            }
        })
        .collect();
    let width = names.len();

    let mut table = Table::with_names(names);
    for row in rows {
        let mut values: Vec<Value> = Vec::with_capacity(width);
        for i in 0..width {
            values.push(row.get(i).map_or(Value::Null, render_data));
        }
        table
            .push_row(values)
            .map_err(|e| LoadError::Malformed(e.to_string()))?;
    }
    Ok(table)
}

fn render_data(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(n) => Value::Number(*n),
        Data::Int(n) => Value::Number(*n as f64),
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Value::Text(format!("#{e:?}")),
        // Date cells pass through as their raw serial number
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

/// Export the comparison result as a two-sheet workbook. Sheet names embed
/// the row counts; every cell is written as a string so numeric keys never
/// reformat into scientific notation.
pub fn export_result(matches: &Table, non_matches: &Table, path: &Path) -> Result<(), WriteError> {
    let mut workbook = XlsxWorkbook::new();

    write_sheet(
        &mut workbook,
        &format!("Unique_matches_{}", matches.row_count()),
        matches,
    )?;
    write_sheet(
        &mut workbook,
        &format!("Unique_non_matches_{}", non_matches.row_count()),
        non_matches,
    )?;

    workbook
        .save(path)
        .map_err(|e| WriteError::Io(format!("failed to save XLSX file: {e}")))?;
    Ok(())
}

fn write_sheet(workbook: &mut XlsxWorkbook, name: &str, table: &Table) -> Result<(), WriteError> {
    let worksheet = workbook
        .add_worksheet()
        .set_name(name)
        .map_err(|e| WriteError::Format(format!("failed to create sheet '{name}': {e}")))?;

    for (col, column_name) in table.column_names().enumerate() {
        worksheet
            .write_string(0, col as u16, column_name)
            .map_err(|e| WriteError::Format(e.to_string()))?;
    }
    for (col, column) in table.columns().iter().enumerate() {
        for (row, value) in column.values.iter().enumerate() {
            worksheet
                .write_string(row as u32 + 1, col as u16, value.render_text())
                .map_err(|e| WriteError::Format(e.to_string()))?;
        }
    }
    Ok(())
}
